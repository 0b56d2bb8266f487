use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field '{field}' in {feed} record #{index}")]
    MissingField {
        feed: String,
        index: usize,
        field: String,
    },

    #[error("Invalid {feed} feed: {reason}")]
    InvalidFeed { feed: String, reason: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

impl From<rusqlite::Error> for EtlError {
    fn from(e: rusqlite::Error) -> Self {
        EtlError::Database {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
