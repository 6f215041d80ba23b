//! FILENAME: table-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("A column id could not be resolved (depth {depth}, index {index})")]
    MissingColumnId { depth: usize, index: usize },

    #[error("Columns require an id when using an accessor function (depth {depth}, index {index})")]
    AccessorFnWithoutId { depth: usize, index: usize },

    #[error("Duplicate column id: {0}")]
    DuplicateColumnId(String),

    #[error("Row not found: {0}")]
    RowNotFound(String),
}

pub type TableResult<T> = Result<T, TableError>;
