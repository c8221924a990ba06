use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrismError {
    #[error("Invalid buffer length: {len} is not a multiple of 4")]
    InvalidBufferLength { len: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid hex color: {0:?}")]
    InvalidHex(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PrismError>;
