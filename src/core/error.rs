use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("malformed model response: {reason}\n--- response text ---\n{text}")]
    MalformedResponse { reason: String, text: String },

    #[error("model error: {0}")]
    ModelError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;
