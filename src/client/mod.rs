//! Session driver, execution context, and pagination accumulator.
//!
//! This module provides the main entry point [`ApiSession`] for running
//! sequences of engine operations against a remote API.

mod config;
mod context;
mod paginate;
mod session;

pub use config::{SessionConfig, DEFAULT_PAGE_SIZE, DEFAULT_USER_AGENT};
pub use session::{ApiSession, BoxFuture};
