//! # octopage
//!
//! A session-scoped execution engine for GitHub-style REST APIs whose
//! endpoints come in two shapes: single-resource and paginated-list.
//!
//! The engine is generic over the endpoint catalog and the payload types:
//! callers declare endpoints as [`EndpointDescriptor`]s (path template,
//! ordered parameters, terminal shape), bind concrete arguments to them,
//! and run the resulting actions inside an [`ApiSession`]. The session
//! injects cross-cutting headers (`User-Agent`, `Authorization`), threads
//! pagination state across calls, and follows `Link`-header continuation
//! hints to accumulate multi-page results.
//!
//! ## Features
//!
//! - **Arity-generic binding**: descriptors of any parameter count bind
//!   via recursive partial application; mismatches fail before any I/O
//! - **Two terminal shapes**: single-resource and paginated-list, checked
//!   at action-construction time
//! - **Automatic pagination**: lenient `Link`-header parsing drives
//!   multi-page accumulation, with a per-session recursion toggle
//! - **Pluggable transport**: one async `send` primitive; `reqwest` by
//!   default, scripted transports in tests
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use octopage::endpoint::EndpointDescriptor;
//! use octopage::{ApiSession, AuthCredential, SessionConfig};
//! use reqwest::Method;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Repo {
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> octopage::Result<()> {
//!     // Catalog data, typically declared once at startup.
//!     let user_repos =
//!         EndpointDescriptor::paginated("user-repos", Method::GET, "/users/{login}/repos")
//!             .path_param("login");
//!
//!     let credential = std::env::var("API_TOKEN").ok().map(AuthCredential::new);
//!     let session = ApiSession::connect(SessionConfig::default(), credential)?;
//!
//!     let repos: Vec<Repo> = session
//!         .run(|session| {
//!             Box::pin(async move {
//!                 session.set_page_size(50);
//!                 let action = user_repos.bind(["octocat"])?.into_paginated()?;
//!                 session.paginated(&action).await
//!             })
//!         })
//!         .await?;
//!
//!     println!("{} repos", repos.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Pagination semantics
//!
//! With recursion enabled (the default), a paginated call resets the page
//! cursor, fetches page after page while each response's `Link` header
//! carries a `next` relation, and returns the concatenation of all pages'
//! items. A failure on any page aborts the whole call; no partial result
//! is returned. With recursion disabled, exactly one page is fetched at
//! the current cursor.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod link;
pub mod transport;

// Re-export primary types at crate root for convenience
pub use auth::AuthCredential;
pub use client::{ApiSession, BoxFuture, SessionConfig, DEFAULT_PAGE_SIZE, DEFAULT_USER_AGENT};
pub use error::{Error, Result};
pub use link::{LinkSet, RelLink};

/// Prelude module for convenient imports.
///
/// ```rust
/// use octopage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::AuthCredential;
    pub use crate::client::{ApiSession, SessionConfig, DEFAULT_PAGE_SIZE};
    pub use crate::endpoint::{
        BoundOperation, EndpointDescriptor, PagedAction, Shape, SingleAction,
    };
    pub use crate::error::{Error, Result};
    pub use crate::link::{parse_link_header, LinkSet, RelLink};
    pub use crate::transport::{Transport, TransportRequest, TransportResponse};
}
