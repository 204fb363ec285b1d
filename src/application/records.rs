//! Record file loading
//!
//! A record file is TOML with one `[[records]]` table per row:
//!
//! ```toml
//! [[records]]
//! id = "electronics"
//! label = "Electronics"
//!
//! [[records]]
//! id = "phones"
//! parent_id = "electronics"
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Record;

/// Rows of a record file, ids as strings.
pub type StringRecord = Record<String>;

#[derive(Debug, Deserialize)]
struct RecordFile {
    #[serde(default)]
    records: Vec<StringRecord>,
}

/// Parse record rows from TOML content, keeping file order.
pub fn parse_records(content: &str) -> Result<Vec<StringRecord>, toml::de::Error> {
    let file: RecordFile = toml::from_str(content)?;
    Ok(file.records)
}

/// Read and parse a record file.
#[instrument(level = "debug")]
pub fn load_records(path: &Path) -> ApplicationResult<Vec<StringRecord>> {
    let content = std::fs::read_to_string(path).with_path_context("read record file", path)?;
    let records = parse_records(&content).map_err(|e| ApplicationError::InvalidRecords {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FlatRecord;

    #[test]
    fn given_empty_content_when_parsing_then_returns_no_records() {
        assert!(parse_records("").unwrap().is_empty());
    }

    #[test]
    fn given_rows_when_parsing_then_keeps_file_order() {
        let records = parse_records(
            r#"
            [[records]]
            id = "b"
            parent_id = "a"

            [[records]]
            id = "a"
            "#,
        )
        .unwrap();

        let ids: Vec<&str> = records.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn given_integer_id_when_parsing_then_fails() {
        let result = parse_records("[[records]]\nid = 1\n");
        assert!(result.is_err());
    }
}
