use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    /// Malformed or inconsistent charge data. Raised before any computation.
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Invalid Sampling Region: {0}")]
    InvalidRegion(String),
}

impl FieldError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, FieldError::InvalidInput(_))
    }
}

pub type FieldResult<T> = Result<T, FieldError>;
