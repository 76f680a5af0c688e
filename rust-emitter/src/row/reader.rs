//! Lazy CSV row reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use tracing::info;

use super::types::{Row, FIELD_COUNT};
use crate::error::StreamError;

/// Reads data rows from comma-delimited input, one at a time.
///
/// The header record is consumed on construction. Iteration yields one
/// `Result<Row, _>` per remaining record and cannot be restarted.
pub struct RowReader<R> {
    records: StringRecordsIntoIter<R>,
    header: StringRecord,
}

impl RowReader<File> {
    /// Open a CSV file and skip its header line.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StreamError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| StreamError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "input_opened");

        Self::from_reader(file, &path.display().to_string())
    }
}

impl<R: Read> RowReader<R> {
    /// Wrap any reader. `source_name` only appears in logs and errors.
    pub fn from_reader(input: R, source_name: &str) -> Result<Self, StreamError> {
        // Field counts are checked per row, so the parser itself stays flexible.
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let mut header = StringRecord::new();
        if !reader.read_record(&mut header)? {
            return Err(StreamError::EndOfInput {
                source_name: source_name.to_string(),
            });
        }

        Ok(Self {
            records: reader.into_records(),
            header,
        })
    }

    /// The discarded header record.
    pub fn header(&self) -> &StringRecord {
        &self.header
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<Row, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };

        let line = record.position().map(|p| p.line()).unwrap_or(0);

        // The parser drops empty lines silently. A record consumes one line
        // break of its own, plus any inside quoted fields; anything beyond
        // that was a skipped empty line, which counts as a row with no fields.
        let consumed = self.records.reader().position().line().saturating_sub(line);
        let embedded: u64 = record.iter().map(|f| f.matches('\n').count() as u64).sum();
        if consumed.saturating_sub(embedded) > 1 {
            return Some(Err(StreamError::MalformedRow {
                line,
                expected: FIELD_COUNT,
                found: 0,
            }));
        }

        Some(Row::from_record(&record, line))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "DBN,School Name,Number of Test Takers,Critical Reading Mean,Mathematics Mean,Writing Mean\n";

    fn reader_for(input: &str) -> Result<RowReader<&[u8]>, StreamError> {
        RowReader::from_reader(input.as_bytes(), "inline")
    }

    #[test]
    fn test_header_is_skipped() {
        let input = format!(
            "{HEADER}01M292,HENRY STREET SCHOOL,29,355,404,363\n01M448,UNIVERSITY NEIGHBORHOOD HIGH SCHOOL,91,383,423,366\n"
        );
        let reader = reader_for(&input).unwrap();
        assert_eq!(reader.header().get(0), Some("DBN"));

        let rows: Vec<Row> = reader.map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].dbn, "01M292");
        assert_eq!(rows[1].school_name, "UNIVERSITY NEIGHBORHOOD HIGH SCHOOL");
    }

    #[test]
    fn test_header_only_yields_nothing() {
        let mut reader = reader_for(HEADER).unwrap();
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_empty_input_is_end_of_input() {
        assert!(matches!(
            reader_for(""),
            Err(StreamError::EndOfInput { .. })
        ));
    }

    #[test]
    fn test_quoted_field_keeps_comma() {
        let input = format!("{HEADER}01M999,\"A, B School\",10,400,410,420\n");
        let row = reader_for(&input).unwrap().next().unwrap().unwrap();
        assert_eq!(row.school_name, "A, B School");
    }

    #[test]
    fn test_malformed_row_reports_line() {
        let input = format!("{HEADER}01M292,HENRY STREET SCHOOL,29,355,404,363\n01M448,SHORT ROW,91\n");
        let mut reader = reader_for(&input).unwrap();

        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(StreamError::MalformedRow { line, found, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(found, 3);
            }
            other => panic!("Expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_line_between_rows_is_malformed() {
        let input = format!(
            "{HEADER}01M292,HENRY STREET SCHOOL,29,355,404,363\n\n01M448,UNIVERSITY NEIGHBORHOOD HIGH SCHOOL,91,383,423,366\n"
        );
        let mut reader = reader_for(&input).unwrap();

        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(StreamError::MalformedRow { line, found, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(found, 0);
            }
            other => panic!("Expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_line_after_header_is_malformed() {
        let input = format!("{HEADER}\n01M292,HENRY STREET SCHOOL,29,355,404,363\n");
        let mut reader = reader_for(&input).unwrap();

        assert!(matches!(
            reader.next().unwrap(),
            Err(StreamError::MalformedRow { found: 0, .. })
        ));
    }

    #[test]
    fn test_crlf_empty_line_is_malformed() {
        let input = "h1,h2,h3,h4,h5,h6\r\na,b,c,d,e,f\r\n\r\ng,h,i,j,k,l\r\n";
        let results: Vec<_> = reader_for(input).unwrap().collect();

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(StreamError::MalformedRow { found: 0, .. })));
    }

    #[test]
    fn test_crlf_rows_read_cleanly() {
        let input = "h1,h2,h3,h4,h5,h6\r\na,b,c,d,e,f\r\ng,h,i,j,k,l\r\n";
        let results: Vec<_> = reader_for(input).unwrap().collect();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn test_multiline_quoted_field_is_one_row() {
        let input = format!(
            "{HEADER}01M292,\"HENRY STREET\nSCHOOL\",29,355,404,363\n01M448,UNIVERSITY NEIGHBORHOOD HIGH SCHOOL,91,383,423,366\n"
        );
        let rows: Vec<Row> = reader_for(&input).unwrap().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].school_name, "HENRY STREET\nSCHOOL");
    }

    #[test]
    fn test_trailing_empty_lines_are_ignored() {
        let input = format!("{HEADER}01M292,HENRY STREET SCHOOL,29,355,404,363\n\n\n");
        let rows: Vec<_> = reader_for(&input).unwrap().collect();

        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_ok());
    }

    #[test]
    fn test_open_missing_file() {
        let err = RowReader::open("/nonexistent/emitter/input.csv").err().unwrap();
        assert!(matches!(err, StreamError::FileAccess { .. }));
    }

    #[test]
    fn test_open_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{HEADER}01M292,HENRY STREET SCHOOL,29,355,404,363\n").unwrap();
        file.flush().unwrap();

        let rows: Vec<_> = RowReader::open(file.path()).unwrap().collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_ok());
    }
}
