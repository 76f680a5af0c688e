//! Row input module.
//!
//! This module provides:
//! - The six-field `Row` record
//! - A lazy CSV reader that skips the header and validates field counts
//!
//! ## Flow
//!
//! ```text
//! CSV file → RowReader (header skipped) → Row, Row, ... → message formatter
//! ```

pub mod reader;
pub mod types;

pub use reader::RowReader;
pub use types::{Row, FIELD_COUNT};
