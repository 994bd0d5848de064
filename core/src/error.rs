//! Error types for the content client.
//!
//! # Design
//! Two families of failure exist and they travel differently. A
//! `ValidationError` is raised before any network I/O and aborts the call
//! that triggered it. A `FetchError` describes what went wrong during or after
//! the round-trip and is always handed back as a value inside `FetchResult`,
//! so callers never have to unwind from a failed request.

use thiserror::Error;

/// Which precondition a `ValidationError` reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationKind {
    /// A slug subject was given for a content type that is not queryable by slug.
    InvalidSlugQuery,

    /// A list subject contained entries that are not numeric ids.
    InvalidIdentifierList { offending: Vec<String> },

    /// A content-type descriptor is malformed.
    InvalidContentType,

    /// A content type with the same canonical name is already registered.
    DuplicateContentType,

    /// No content type is registered under the requested name.
    UnknownContentType,
}

/// A violated precondition, carrying a human-readable message that names the
/// value under test.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub kind: ValidationKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// The transport could not complete the round-trip (connect, send, or read).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

/// Failures captured by the fetch executor and returned as values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The response parsed but does not have the documented shape.
    #[error("protocol mismatch: {0}")]
    ProtocolMismatch(String),

    /// A slug query matched no entity.
    #[error("no entity found for slug \"{slug}\"")]
    NotFound { slug: String },
}

/// Invalid client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must not be empty")]
    Empty { name: &'static str },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
