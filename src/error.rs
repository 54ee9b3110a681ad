//! Error types for lookups and data loading.

use crate::index::Namespace;
use crate::tables::Table;
use std::path::PathBuf;
use thiserror::Error;

/// The input did not match any key in the namespace(s) searched.
///
/// This is an ordinary outcome of a lookup, not a defect. It always carries
/// the input exactly as given so the caller can report it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
#[error("{input:?} isn't an ISO language code or name")]
pub struct LanguageNotFound {
    input: String,
}

impl LanguageNotFound {
    /// Create the error for a lookup of `input`.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// The lookup input, verbatim.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Failure to build the language data. Always fatal: there is no partial
/// or degraded dataset.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read {table} table from {}: {source}", path.display())]
    Io {
        table: Table,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{table} table is missing column {column:?}")]
    MissingColumn { table: Table, column: &'static str },

    #[error("{table} table, line {line}: {message}")]
    Malformed {
        table: Table,
        line: usize,
        message: String,
    },

    #[error("duplicate key {key:?} in {namespace} namespace")]
    DuplicateKey { namespace: Namespace, key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_input_verbatim() {
        let err = LanguageNotFound::new("  Fra ");
        assert_eq!(err.input(), "  Fra ");
    }

    #[test]
    fn test_not_found_message() {
        let err = LanguageNotFound::new("unknown language");
        assert_eq!(
            err.to_string(),
            "\"unknown language\" isn't an ISO language code or name"
        );
    }

    #[test]
    fn test_data_error_messages() {
        let err = DataError::MissingColumn {
            table: Table::Codes,
            column: "Ref_Name",
        };
        assert_eq!(err.to_string(), "codes table is missing column \"Ref_Name\"");

        let err = DataError::Malformed {
            table: Table::Retirements,
            line: 4,
            message: "bad date".to_string(),
        };
        assert_eq!(err.to_string(), "retirements table, line 4: bad date");

        let err = DataError::DuplicateKey {
            namespace: Namespace::Part1,
            key: "fr".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate key \"fr\" in part1 namespace");
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error as _;

        let err = DataError::Io {
            table: Table::NameIndex,
            path: PathBuf::from("/missing/iso-639-3_Name_Index.tab"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("name index"));
        assert!(err.source().is_some());
    }
}
