use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid sensor reading data")]
    InvalidReading,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
