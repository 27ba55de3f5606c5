use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record '{id}' not found")]
    RecordNotFound { id: String },

    #[error("Duplicate record id '{id}' in record set")]
    DuplicateRecordId { id: String },

    #[error("Patch changed record id from '{from}' to '{to}'")]
    IdChanged { from: String, to: String },

    #[error("View '{name}' not found")]
    UnknownView { name: String },

    #[error("View '{view}' has no field '{field}'")]
    UnknownField { view: String, field: String },

    #[error("'{status}' is not a valid status for {view}")]
    InvalidStatus { view: String, status: String },

    #[error("Cannot move {view} record '{id}' from {from} to {to}")]
    InvalidTransition {
        view: String,
        id: String,
        from: String,
        to: String,
    },

    #[error("Record source '{source_name}' unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
