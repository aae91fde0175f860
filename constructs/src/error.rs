/// Failures raised while synthesizing constructs
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or inconsistent construct configuration
    #[error("{0}")]
    Config(String),

    #[error("Failed to serialize resource properties: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
