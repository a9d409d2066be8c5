//! Error types for the octopage execution engine.
//!
//! All failure modes surface through a single [`Error`] enum. Construction
//! errors (bad bindings, shape mismatches) are detected before any network
//! activity; transport errors abort the in-flight operation.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all engine operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed at the connection level
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote returned a non-success status
    #[error("API error: status={status}, message={message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Human-readable error message extracted from the body
        message: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// Response body could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Wrong number of arguments bound to an endpoint descriptor
    #[error("endpoint `{endpoint}` declares {declared} parameters, {supplied} supplied")]
    Arity {
        /// Endpoint name from the catalog
        endpoint: String,
        /// Number of parameters the descriptor declares
        declared: usize,
        /// Number of arguments actually supplied
        supplied: usize,
    },

    /// Endpoint has a different terminal shape than the caller expected
    #[error("endpoint `{endpoint}` is {actual}, expected {expected}")]
    Shape {
        /// Endpoint name from the catalog
        endpoint: String,
        /// Shape the caller asked for
        expected: &'static str,
        /// Shape the descriptor declares
        actual: &'static str,
    },

    /// Path template references a parameter the descriptor does not declare
    #[error("endpoint `{endpoint}` path template references undeclared parameter `{placeholder}`")]
    Template {
        /// Endpoint name from the catalog
        endpoint: String,
        /// The offending `{placeholder}` name
        placeholder: String,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if this error was detected while binding or
    /// converting an endpoint, before any request was sent.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Error::Arity { .. } | Error::Shape { .. } | Error::Template { .. } | Error::Config(_)
        )
    }

    /// Returns `true` if this error came from executing a request.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Status { .. } | Error::Decode(_) | Error::UrlParse(_)
        )
    }

    /// Returns `true` if the remote rejected the request (4xx status).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Status { status, .. } if (400..500).contains(status))
    }

    /// Returns `true` if the remote failed to serve the request (5xx status).
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Status { status, .. } if *status >= 500)
    }

    /// Create a status error from a response body.
    pub(crate) fn from_status(status: u16, body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown API error")
            .to_string();

        Error::Status {
            status,
            message,
            body,
        }
    }
}
