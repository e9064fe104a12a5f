use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgroSmartError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unknown region: {0}")]
    UnknownRegion(String),
}

pub type Result<T> = std::result::Result<T, AgroSmartError>;
