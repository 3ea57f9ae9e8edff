use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChordLabError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),
}

pub type ClResult<T> = Result<T, ChordLabError>;
