use thiserror::Error;

/// Errors that can occur while resolving parameters or managing connections
#[derive(Error, Debug)]
pub enum DbError {
    /// A required parameter was missing from the explicit arguments, the URL,
    /// and the config file alike.
    #[error("could not resolve `{0}` from arguments, URL, or config file")]
    Resolution(&'static str),
    #[error("invalid connection URL: {0}")]
    InvalidUrl(String),
    #[error("invalid port value: {0}")]
    InvalidPort(String),
    /// Driver load, connect, or close failure. Only the cause text survives;
    /// the underlying error type is not preserved.
    #[error("connection `{alias}` failed: {cause}")]
    Connection { alias: String, cause: String },
    #[error("no connection registered under alias `{0}`")]
    UnknownAlias(String),
    #[error("no connection created")]
    NoConnection,
}

pub type Result<T> = std::result::Result<T, DbError>;
