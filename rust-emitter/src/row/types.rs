//! The data row carried through the stream.

use csv::StringRecord;
use serde::Deserialize;

use crate::error::StreamError;

/// Number of fields every data row must carry.
pub const FIELD_COUNT: usize = 6;

/// One data line of the SAT school results file.
///
/// All fields stay text; numeric columns are never coerced because the
/// message format passes them through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Row {
    /// School identifier (DBN)
    pub dbn: String,
    pub school_name: String,
    pub num_test_takers: String,
    pub critical_reading_mean: String,
    pub mathematics_mean: String,
    pub writing_mean: String,
}

impl Row {
    /// Build a row from a raw record, rejecting any other field count.
    ///
    /// `line` is only used for the error report.
    pub fn from_record(record: &StringRecord, line: u64) -> Result<Self, StreamError> {
        if record.len() != FIELD_COUNT {
            return Err(StreamError::MalformedRow {
                line,
                expected: FIELD_COUNT,
                found: record.len(),
            });
        }

        Ok(record.deserialize(None)?)
    }

    /// Fields in file order.
    pub fn fields(&self) -> [&str; FIELD_COUNT] {
        [
            self.dbn.as_str(),
            self.school_name.as_str(),
            self.num_test_takers.as_str(),
            self.critical_reading_mean.as_str(),
            self.mathematics_mean.as_str(),
            self.writing_mean.as_str(),
        ]
    }
}
