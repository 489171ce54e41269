use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid bucket name '{0}': {1}")]
    InvalidBucket(String, &'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error uploading {file} to s3://{bucket}/{key}: {message}")]
    Upload {
        file: String,
        bucket: String,
        key: String,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
