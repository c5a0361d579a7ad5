//! Error types for the record-store client.
//!
//! # Design
//! `InvalidArgument` is produced before any request is built. `RemoteFault`
//! keeps the service's response body verbatim so callers can inspect its
//! diagnostics. Delete operations collapse every failure into `Unknown`,
//! which still exposes the original failure through `source()`.
//!
//! A single-record fetch that fails is not an error at all: it yields
//! `None`. See `DatabaseClient::parse_record`.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, DbError>;

/// Errors returned by `DatabaseClient` and `Database` operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// A required argument was empty or `data` was not a JSON object.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The service answered with a 5xx status.
    #[error("remote fault (HTTP {status}): {body}")]
    RemoteFault { status: u16, body: String },

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A delete failed. The underlying failure is kept as the source.
    #[error("an unknown error occurred")]
    Unknown(#[source] Box<DbError>),
}

impl DbError {
    pub(crate) fn invalid(msg: &str) -> Self {
        DbError::InvalidArgument(msg.to_string())
    }

    /// Wrap `cause` in `Unknown` unless it already is one.
    pub(crate) fn unknown(cause: DbError) -> Self {
        match cause {
            DbError::Unknown(_) => cause,
            other => DbError::Unknown(Box::new(other)),
        }
    }
}

/// A failure below HTTP: connection refused, DNS, timeout, unreadable body.
///
/// Opaque so any transport implementation can report its own error type.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct TransportError(Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

#[cfg(feature = "ureq")]
impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        TransportError::new(err)
    }
}
