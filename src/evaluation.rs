use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

/// Marker that introduces a mate-in-N evaluation, e.g. `#+4` or `#-3`
pub const MATE_MARKER: char = '#';

/// Synthetic score a mate evaluation is mapped onto, minus the mate distance
pub const MATE_SCORE_BASE: f64 = 1000.0;

/// Engine evaluation attached to a position in the input dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Evaluation {
    /// Plain numeric score, white-relative
    Centipawns(f64),
    /// Forced mate; positive when white mates, negative when black mates
    Mate(i32),
}

impl Evaluation {
    pub fn is_mate(&self) -> bool {
        matches!(self, Evaluation::Mate(_))
    }

    /// Score used by the analysis.
    ///
    /// A mate in N maps to `1000 - N` using the distance only, so `#+3` and `#-3`
    /// both score 997. The sign is kept in the `Mate` payload for callers that need
    /// to know which side mates.
    pub fn score(&self) -> f64 {
        match *self {
            Evaluation::Centipawns(value) => value,
            Evaluation::Mate(moves) => MATE_SCORE_BASE - moves.unsigned_abs() as f64,
        }
    }
}

impl FromStr for Evaluation {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || AnalysisError::InvalidEvaluation(s.to_string());

        if let Some(tail) = text.strip_prefix(MATE_MARKER) {
            return tail.parse::<i32>().map(Evaluation::Mate).map_err(|_| invalid());
        }

        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Evaluation::Centipawns(value)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Centipawns(value) => write!(f, "{}", value),
            Evaluation::Mate(moves) => write!(f, "{}{:+}", MATE_MARKER, moves),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_evaluations() {
        assert_eq!("+56".parse::<Evaluation>().unwrap(), Evaluation::Centipawns(56.0));
        assert_eq!("-1.5".parse::<Evaluation>().unwrap(), Evaluation::Centipawns(-1.5));
        assert_eq!(" 0 ".parse::<Evaluation>().unwrap().score(), 0.0);
    }

    #[test]
    fn test_mate_for_black_scores_by_distance() {
        let eval: Evaluation = "#-3".parse().unwrap();
        assert!(eval.is_mate());
        assert_eq!(eval, Evaluation::Mate(-3));
        assert_eq!(eval.score(), 997.0);
    }

    #[test]
    fn test_mate_for_white() {
        let eval: Evaluation = "#+5".parse().unwrap();
        assert_eq!(eval.score(), 995.0);
        assert_eq!(eval.to_string(), "#+5");
    }

    #[test]
    fn test_malformed_evaluations() {
        for text in ["", "abc", "#", "#x", "#+", "NaN", "inf"] {
            let err = text.parse::<Evaluation>().unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidEvaluation(_)), "{text}");
        }
    }
}
