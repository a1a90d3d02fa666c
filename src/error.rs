use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("failed to encode preference value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("catalog line {line}: {message}")]
    Catalog { line: usize, message: String },

    #[error("catalog is empty")]
    EmptyCatalog,

    #[error("a preference listener is already registered")]
    ListenerAlreadyRegistered,

    #[error("quiz has not been configured")]
    NotConfigured,

    #[error("no question is in progress")]
    NotInProgress,
}

pub type Result<T> = std::result::Result<T, Error>;
