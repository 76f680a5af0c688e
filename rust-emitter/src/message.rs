//! Text message built from a row.
//!
//! The wire format is the bracketed list `[f1, f2, f3, f4, f5, f6]` encoded as
//! UTF-8. Field values are not escaped, so a comma or bracket inside a field
//! cannot be told apart from the separators by a receiver.

use std::fmt;

use tracing::debug;

use crate::row::Row;

/// A formatted row, ready to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    body: String,
}

impl Message {
    /// Format a row into its bracketed text form.
    pub fn from_row(row: &Row) -> Self {
        let body = format!(
            "[{}, {}, {}, {}, {}, {}]",
            row.dbn,
            row.school_name,
            row.num_test_takers,
            row.critical_reading_mean,
            row.mathematics_mean,
            row.writing_mean
        );

        debug!(message = %body, "message_prepared");

        Self { body }
    }

    /// Payload bytes as published.
    pub fn as_bytes(&self) -> &[u8] {
        self.body.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.body
    }

    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}
