use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Storage-level errors. `Connect` is fatal at bootstrap; the rest are local to one stream or lookup.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connect to {}: {source}", path.display())]
    Connect {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("query {what}: {source}")]
    Query {
        what: &'static str,
        source: rusqlite::Error,
    },

    #[error("decode {table} row: {source}")]
    Decode {
        table: &'static str,
        source: rusqlite::Error,
    },

    #[error("galaxy with ugc_number {ugc_number:?} not found")]
    NotFound { ugc_number: String },

    #[error("write {what}: {source}")]
    Write {
        what: &'static str,
        source: rusqlite::Error,
    },

    #[error("no pooled connection free after {0:?}")]
    PoolTimeout(Duration),

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, StoreError::Decode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_the_key() {
        let err = StoreError::NotFound {
            ugc_number: "not_an_ugc_number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "galaxy with ugc_number \"not_an_ugc_number\" not found"
        );
        assert!(err.is_not_found());
        assert!(!err.is_decode());
    }

    #[test]
    fn decode_display_names_the_table() {
        let err = StoreError::Decode {
            table: "stars",
            source: rusqlite::Error::InvalidColumnIndex(9),
        };
        assert!(err.to_string().starts_with("decode stars row:"));
        assert!(err.is_decode());
    }
}
