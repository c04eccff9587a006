use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The knowledge source is missing, unreadable or structurally invalid.
    #[error("Failed to load knowledge base '{origin}': {reason}")]
    DataLoad { origin: String, reason: String },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn data_load(origin: impl Into<String>, reason: impl ToString) -> Self {
        Self::DataLoad { origin: origin.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
