use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;

use crate::config::RegressionConfig;
use crate::error::{AnalysisError, Result};

/// One observation: feature values and the target
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<const N: usize> {
    pub features: [f64; N],
    pub target: f64,
}

/// Ordinary least squares fit with an intercept
#[derive(Debug, Clone)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn fit<const N: usize>(samples: &[&Sample<N>]) -> Result<Self> {
        if samples.len() < N + 1 {
            return Err(AnalysisError::Regression(format!(
                "{} samples cannot determine {} parameters",
                samples.len(),
                N + 1
            )));
        }

        let design = DMatrix::from_fn(samples.len(), N + 1, |row, col| match col {
            0 => 1.0,
            _ => samples[row].features[col - 1],
        });
        let targets = DVector::from_iterator(samples.len(), samples.iter().map(|s| s.target));

        // SVD gives the minimum-norm solution when features are collinear
        let solution = design
            .svd(true, true)
            .solve(&targets, 1e-10)
            .map_err(|e| AnalysisError::Regression(e.to_string()))?;

        Ok(Self {
            intercept: solution[0],
            coefficients: solution.iter().skip(1).copied().collect(),
        })
    }

    pub fn predict(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(coef, value)| coef * value)
                .sum::<f64>()
    }
}

/// Splits `samples` into (train, test) after a seeded shuffle. The test side
/// gets `ceil(n * test_fraction)` samples.
pub fn train_test_split<'a, T>(
    samples: &'a [T],
    test_fraction: f64,
    seed: u64,
) -> (Vec<&'a T>, Vec<&'a T>) {
    let mut order: Vec<usize> = (0..samples.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let test_len = ((samples.len() as f64) * test_fraction).ceil() as usize;
    let test_len = test_len.min(samples.len());
    let (test, train) = order.split_at(test_len);
    (
        train.iter().map(|&i| &samples[i]).collect(),
        test.iter().map(|&i| &samples[i]).collect(),
    )
}

pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64
}

/// Outcome of a hold-out regression run
#[derive(Debug, Clone)]
pub struct RegressionReport {
    pub feature_names: Vec<String>,
    pub model: LinearModel,
    pub mse: f64,
    pub train_size: usize,
    pub test_size: usize,
}

/// Fits on the training split and scores on the held-out split
pub fn fit_and_evaluate<const N: usize>(
    samples: &[Sample<N>],
    feature_names: [&str; N],
    config: &RegressionConfig,
) -> Result<RegressionReport> {
    let (train, test) = train_test_split(samples, config.test_fraction, config.seed);
    if test.is_empty() {
        return Err(AnalysisError::Regression("no samples left to test on".to_string()));
    }

    let model = LinearModel::fit(&train)?;
    let actual: Vec<f64> = test.iter().map(|s| s.target).collect();
    let predicted: Vec<f64> = test.iter().map(|s| model.predict(&s.features)).collect();

    Ok(RegressionReport {
        feature_names: feature_names.iter().map(|name| name.to_string()).collect(),
        mse: mean_squared_error(&actual, &predicted),
        train_size: train.len(),
        test_size: test.len(),
        model,
    })
}

impl fmt::Display for RegressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Linear regression ({} train / {} test positions)",
            self.train_size, self.test_size
        )?;
        writeln!(f, "Mean squared error: {:.4}", self.mse)?;
        writeln!(f, "{:<16} {:>14}", "", "Coefficient")?;
        for (name, coef) in self.feature_names.iter().zip(&self.model.coefficients) {
            writeln!(f, "{:<16} {:>14.6}", name, coef)?;
        }
        write!(f, "{:<16} {:>14.6}", "intercept", self.model.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn synthetic(n: usize) -> Vec<Sample<3>> {
        let mut rng = StdRng::seed_from_u64(7);
        (0..n)
            .map(|_| {
                let features = [
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-40.0..40.0),
                    rng.gen_range(-5.0..5.0),
                ];
                let target = 7.0 + 2.0 * features[0] - 0.5 * features[1] + 3.0 * features[2];
                Sample { features, target }
            })
            .collect()
    }

    #[test]
    fn test_recovers_exact_linear_relation() {
        let samples = synthetic(200);
        let report = fit_and_evaluate(&samples, ["a", "b", "c"], &RegressionConfig::default()).unwrap();

        assert!((report.model.intercept - 7.0).abs() < 1e-6);
        let expected = [2.0, -0.5, 3.0];
        for (coef, want) in report.model.coefficients.iter().zip(expected) {
            assert!((coef - want).abs() < 1e-6, "{coef} vs {want}");
        }
        assert!(report.mse < 1e-9);
        assert_eq!(report.test_size, 40);
        assert_eq!(report.train_size, 160);
    }

    #[test]
    fn test_split_is_seeded() {
        let data: Vec<u32> = (0..11).collect();
        let (train_a, test_a) = train_test_split(&data, 0.2, 42);
        let (train_b, test_b) = train_test_split(&data, 0.2, 42);
        assert_eq!(test_a, test_b);
        assert_eq!(train_a, train_b);
        // ceil(11 * 0.2) = 3
        assert_eq!(test_a.len(), 3);
        assert_eq!(train_a.len(), 8);
    }

    #[test]
    fn test_too_few_samples() {
        let samples = synthetic(3);
        let err = fit_and_evaluate(&samples, ["a", "b", "c"], &RegressionConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::Regression(_)));
    }

    #[test]
    fn test_mean_squared_error() {
        assert_eq!(mean_squared_error(&[1.0, 3.0], &[2.0, 1.0]), 2.5);
        assert_eq!(mean_squared_error(&[], &[]), 0.0);
    }

    #[test]
    fn test_report_lists_every_feature() {
        let report = fit_and_evaluate(&synthetic(50), ["material", "mobility", "king"], &RegressionConfig::default())
            .unwrap();
        let text = report.to_string();
        assert!(text.contains("material"));
        assert!(text.contains("intercept"));
        assert!(text.contains("Mean squared error"));
    }
}
