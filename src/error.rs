#[derive(Debug, thiserror::Error)]
pub enum SalesError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Division undefined: {0}")]
    DivisionUndefined(String),

    #[error("Missing optional dimension: {0}")]
    MissingOptionalDimension(String),
}

pub type Result<T> = std::result::Result<T, SalesError>;
