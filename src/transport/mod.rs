//! Transport abstraction: one primitive for sending a request and getting
//! back a response with headers.
//!
//! The engine depends only on the [`Transport`] trait; connection
//! management, TLS, and redirects belong to the implementation. The
//! default implementation is [`HttpTransport`] over `reqwest`; tests
//! substitute scripted in-memory transports.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};

use crate::Result;

/// A request as handed to the transport, after header and parameter
/// injection.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the transport's base URL.
    pub path: String,
    /// Query pairs, declared parameters first, then injected pagination
    /// parameters.
    pub query: Vec<(String, String)>,
    /// Fully-injected request headers.
    pub headers: HeaderMap,
    /// Optional JSON body.
    pub body: Option<serde_json::Value>,
}

/// A response as returned by the transport, with status and headers
/// preserved so the executor can inspect continuation metadata.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Vec<u8>,
}

/// The single primitive the engine requires of an HTTP stack.
///
/// Cancellation and timeouts are the implementation's responsibility;
/// they surface to the engine as ordinary errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return its response, headers included.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}
