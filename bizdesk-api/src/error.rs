use thiserror::Error;

/// Failure talking to the backend. Always distinct from an empty result.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown column {column} on {table}")]
    UnknownColumn { table: String, column: String },

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("No {table} row with id {id}")]
    NotFound { table: String, id: String },

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A field value rejected by strict validation
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("A submit is already in flight")]
    Busy,

    #[error("The form is not open")]
    FormClosed,

    #[error("No loaded {noun} with id {id}")]
    NotFound { noun: &'static str, id: String },
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("No signed-in session")]
    Unauthenticated,
}
