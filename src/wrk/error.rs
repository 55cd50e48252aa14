use thiserror::Error;

#[derive(Error, Debug)]
pub enum WrkError {
    /// The token is neither a wrk id nor a Trello id.
    #[error("Invalid id format: {0}")]
    InvalidFormat(String),

    /// Wrong number or shape of arguments, or an id of the wrong kind.
    #[error("{0}")]
    Validation(String),

    /// A raw Trello id whose kind cannot be narrowed to a single type.
    #[error("Ambiguous id type: {0}")]
    AmbiguousType(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, WrkError>;
