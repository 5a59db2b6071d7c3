use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{AnalysisError, Result};

/// One input row: a position and the engine's evaluation of it, as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionRow {
    pub fen: String,
    pub evaluation: String,
}

/// Streams `(FEN, evaluation)` rows from a CSV with a header line.
///
/// Column 0 holds the FEN and column 1 the evaluation; further columns are
/// ignored. Undecodable records come back as row errors so the caller can skip
/// them; I/O failures are fatal.
pub struct PositionReader<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
}

impl PositionReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        Ok(Self {
            records: reader.into_records(),
        })
    }
}

impl<R: Read> PositionReader<R> {
    pub fn from_reader(input: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);
        Self {
            records: reader.into_records(),
        }
    }
}

fn convert_error(error: csv::Error) -> AnalysisError {
    if error.is_io_error() {
        return AnalysisError::Csv(error);
    }
    AnalysisError::MalformedRow {
        line: error.position().map(|p| p.line()).unwrap_or(0),
        reason: error.to_string(),
    }
}

impl<R: Read> Iterator for PositionReader<R> {
    type Item = Result<PositionRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(convert_error(e))),
        };

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row = match (record.get(0), record.get(1)) {
            (Some(fen), Some(evaluation)) if !fen.trim().is_empty() => Ok(PositionRow {
                fen: fen.trim().to_string(),
                evaluation: evaluation.trim().to_string(),
            }),
            _ => Err(AnalysisError::MalformedRow {
                line,
                reason: "expected a FEN and an evaluation".to_string(),
            }),
        };
        Some(row)
    }
}
