use section3_core::ContractKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing tables have not been created yet.
    #[error("Database tables not initialized: table `{0}` does not exist")]
    SchemaMissing(String),

    #[error("table `{table}` is missing column `{column}`")]
    SchemaMismatch { table: String, column: String },

    #[error("contract already exists: {0}")]
    Duplicate(ContractKey),

    #[error("no contract with id {0}")]
    UnknownContract(i64),

    #[error("no task with id {0}")]
    UnknownTask(i64),

    #[error("no results for query")]
    NoResults,

    #[cfg(feature = "duckdb")]
    #[error("duckdb error: {0}")]
    DuckDb(#[from] ::duckdb::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// True when the caller should run schema setup before importing.
    pub fn is_schema_missing(&self) -> bool {
        matches!(self, Self::SchemaMissing(_))
    }
}
