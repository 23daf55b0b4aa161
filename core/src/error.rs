//! Error types for the connection.
//!
//! # Design
//! Every failure, whether detected before the request leaves (bad URL, body
//! that will not serialize) or reported afterwards by the transport, is a
//! `NetworkError` delivered through the same completion. Transport errors
//! are wrapped, never swallowed.

use thiserror::Error;

/// Error reported by a transport. Opaque to the connection.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors delivered to a request's completion.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The URL string could not be parsed. No request was sent.
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// The request body could not be encoded as JSON. No request was sent.
    #[error("serialization error: {details}")]
    Serialization { details: String },

    /// The server answered with a status outside 200..=299.
    #[error("HTTP error with status code: {status_code}")]
    Http { status_code: u16 },

    /// The transport failed before producing a response.
    #[error("system error: {0}")]
    System(#[source] TransportError),

    /// The transport reported neither an error nor a usable response.
    #[error("unknown error")]
    Unknown,
}

/// Errors raised by the ureq-backed default session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("request was cancelled")]
    Cancelled,

    #[error(transparent)]
    Request(#[from] ureq::Error),

    #[error("failed to start worker thread: {0}")]
    Spawn(std::io::Error),
}
