// taskd: Error types

use thiserror::Error;

/// Server result type
pub type ServerResult<T> = Result<T, ServerError>;

/// Fatal startup errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to read task catalog at {path}: {source}")]
    CatalogUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("task catalog at {path} contains no valid records")]
    CatalogEmpty { path: String },

    #[error("failed to bind listener on port {port}: {source}")]
    BindFailed {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

/// Per-command parse failure, confined to the connection handler — never
/// escapes to the process level, only ever produces a reply.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected exactly two whitespace-separated tokens")]
    WrongTokenCount,

    #[error("action is not an integer")]
    ActionNotInteger,

    #[error("task name exceeds 19 characters")]
    NameTooLong,

    #[error("payload is not valid ASCII")]
    NotAscii,
}
