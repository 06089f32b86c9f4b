use thiserror::Error;

/// Errors produced while decoding, summarizing, or mapping source records.
#[derive(Debug, Error)]
pub enum PrepError {
    /// A record or phrase is missing a field, or the field has the wrong type
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A literal-encoded field could not be decoded
    #[error("malformed literal at offset {offset}: {message}")]
    Literal { offset: usize, message: String },

    /// A record in a batch failed to map; `index` is its position in the input
    #[error("record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: Box<PrepError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PrepError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn literal(offset: usize, msg: impl Into<String>) -> Self {
        Self::Literal { offset, message: msg.into() }
    }
}

pub type Result<T> = std::result::Result<T, PrepError>;
