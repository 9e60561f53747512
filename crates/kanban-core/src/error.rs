use thiserror::Error;

#[derive(Error, Debug)]
pub enum KanbanError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl KanbanError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The message without the variant prefix, suitable for showing to a user.
    pub fn message(&self) -> String {
        match self {
            Self::Connection(msg)
            | Self::Database(msg)
            | Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Serialization(msg)
            | Self::Config(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::Io(e) => e.to_string(),
        }
    }

    /// True for failures caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Validation(_))
    }
}
