//! Full record identifiers.
//!
//! Write operations answer with the full id (`person:8f3k2`), while reads
//! and deletes take the bare key (`8f3k2`).

use crate::{Result, TetherError};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId {
    table: Option<String>,
    key: String,
}

impl RecordId {
    /// Parse `table:key` or a bare `key`.
    ///
    /// Only the first `:` separates the table, so keys may contain colons.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |message: &str| TetherError::Validation {
            field: "id".to_string(),
            message: format!("{}: {:?}", message, raw),
        };

        match raw.split_once(':') {
            Some((table, key)) => {
                if table.is_empty() || key.is_empty() {
                    return Err(invalid("malformed record id"));
                }
                Ok(Self {
                    table: Some(table.to_string()),
                    key: key.to_string(),
                })
            }
            None if raw.is_empty() => Err(invalid("empty record id")),
            None => Ok(Self {
                table: None,
                key: raw.to_string(),
            }),
        }
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl FromStr for RecordId {
    type Err = TetherError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}:{}", table, self.key),
            None => f.write_str(&self.key),
        }
    }
}
