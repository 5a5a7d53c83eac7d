use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid cell {value:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, value: String },
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} has {found} columns, expected {expected}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error)]
pub enum ScoreStoreError {
    #[error("score file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize score table: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("name must contain at least one letter or digit")]
    EmptyName,
}
