use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenkyoError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No task with id {0}")]
    NotFound(i64),

    #[error("Import error: {0}")]
    MalformedImport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for BenkyoError {
    fn from(e: serde_json::Error) -> Self {
        BenkyoError::Json(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BenkyoError>;
