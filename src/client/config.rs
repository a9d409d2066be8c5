//! Session configuration options.

use std::time::Duration;

/// Default number of items requested per page.
///
/// The remote contract caps pages at 100 items; larger values are accepted
/// locally and left to the remote to enforce.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default `User-Agent` value sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("octopage/", env!("CARGO_PKG_VERSION"));

/// Configuration for an API session.
///
/// # Example
///
/// ```
/// use octopage::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig::new("https://api.github.com")
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL all request paths are resolved against.
    pub base_url: String,
    /// Request timeout applied by the default transport.
    pub timeout: Duration,
    /// Initial `User-Agent` header value.
    pub user_agent: String,
    /// Initial page size for paginated endpoints.
    pub page_size: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SessionConfig {
    /// Create a configuration for the given base URL with default values.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the `User-Agent` header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the initial page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}
