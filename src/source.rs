//! Log data sources.
//!
//! The pipeline never reads files itself; it is handed a [`LogTable`] by
//! something implementing [`LogSource`].

use crate::core::{LogRecord, LogTable};
use crate::error::{BandError, Result};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Produces the full log table.
pub trait LogSource {
    fn fetch(&self) -> Result<LogTable>;
}

/// Reads newline-delimited JSON, one [`LogRecord`] per line.
///
/// Blank lines are skipped.
#[derive(Debug, Clone)]
pub struct JsonLinesSource {
    path: PathBuf,
}

impl JsonLinesSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse records from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<LogTable> {
        let mut records = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: LogRecord =
                serde_json::from_str(&line).map_err(|e| BandError::Parse {
                    line: idx + 1,
                    message: e.to_string(),
                })?;
            records.push(record);
        }

        Ok(LogTable::new(records))
    }
}

impl LogSource for JsonLinesSource {
    fn fetch(&self) -> Result<LogTable> {
        let file = File::open(&self.path)
            .map_err(|e| BandError::Io(format!("{}: {}", self.path.display(), e)))?;
        let table = Self::from_reader(BufReader::new(file))?;
        debug!(
            "loaded {} log records from {}",
            table.len(),
            self.path.display()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = r#"{"date":"2018-01-26 09:55:03","endpoint":"/","user_id":1,"cohort_id":8,"source_ip":"97.105.19.61"}

{"date":"2018-01-26 09:56:02","endpoint":"java-ii","user_id":1,"cohort_id":8,"source_ip":"97.105.19.61"}
{"date":"2018-01-27 10:01:44","endpoint":"/","user_id":2,"cohort_id":null,"source_ip":"97.105.19.61"}
"#;

    #[test]
    fn reads_records_and_skips_blank_lines() {
        let table = JsonLinesSource::from_reader(Cursor::new(SAMPLE)).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.user_ids(), vec![1, 2]);
        assert_eq!(table.records()[1].endpoint, "java-ii");
        assert_eq!(table.records()[2].cohort_id, None);
    }

    #[test]
    fn reports_the_offending_line() {
        let input = "{\"date\":\"2018-01-26\",\"endpoint\":\"/\",\"user_id\":1,\"source_ip\":\"x\"}\nnot json\n";
        let err = JsonLinesSource::from_reader(Cursor::new(input)).unwrap_err();

        assert!(matches!(err, BandError::Parse { line: 2, .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = JsonLinesSource::new("/definitely/not/here.jsonl");
        assert!(matches!(source.fetch(), Err(BandError::Io(_))));
    }
}
