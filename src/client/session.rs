//! Session driver: the outer entry point for running engine operations.

use std::future::Future;
use std::pin::Pin;

use serde::de::DeserializeOwned;

use crate::auth::AuthCredential;
use crate::endpoint::{PagedAction, SingleAction};
use crate::link::LinkSet;
use crate::transport::{HttpTransport, Transport};
use crate::Result;

use super::config::SessionConfig;
use super::context::ExecutionContext;
use super::paginate;

/// Type alias for a boxed future used by [`ApiSession::run`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One bounded session run against a remote API.
///
/// A session owns its execution context and transport handle exclusively;
/// pagination state and the credential are threaded sequentially through
/// the operations issued against it. Dropping the session releases the
/// transport, on success and failure paths alike.
///
/// # Example
///
/// ```no_run
/// use octopage::endpoint::EndpointDescriptor;
/// use octopage::{ApiSession, SessionConfig};
/// use reqwest::Method;
///
/// # async fn example() -> octopage::Result<()> {
/// let emojis = EndpointDescriptor::single("emojis", Method::GET, "/emojis");
///
/// let session = ApiSession::connect(SessionConfig::default(), None)?;
/// let all: serde_json::Value = session
///     .run(|session| {
///         Box::pin(async move {
///             let action = emojis.bind(Vec::<String>::new())?.into_single()?;
///             session.single(&action).await
///         })
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ApiSession {
    ctx: ExecutionContext,
}

impl ApiSession {
    /// Create a session with a fresh `reqwest`-backed transport.
    pub fn connect(config: SessionConfig, credential: Option<AuthCredential>) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(Box::new(transport), credential, config))
    }

    /// Create a session over any transport implementation.
    pub fn with_transport(
        transport: Box<dyn Transport>,
        credential: Option<AuthCredential>,
        config: SessionConfig,
    ) -> Self {
        Self {
            ctx: ExecutionContext::new(transport, credential, &config),
        }
    }

    /// Run a caller-supplied sequence of engine operations against this
    /// session, returning the first error encountered or the final value.
    ///
    /// The session is consumed; its transport handle is released when the
    /// run completes, whether it succeeds or fails.
    pub async fn run<A, F>(mut self, operations: F) -> Result<A>
    where
        F: for<'s> FnOnce(&'s mut ApiSession) -> BoxFuture<'s, Result<A>>,
    {
        operations(&mut self).await
    }

    /// Execute a single-resource action.
    pub async fn single<T: DeserializeOwned>(&mut self, action: &SingleAction<T>) -> Result<T> {
        self.ctx.execute_single(action).await
    }

    /// Execute a paginated action, accumulating pages per the current
    /// recursion setting.
    pub async fn paginated<T: DeserializeOwned>(
        &mut self,
        action: &PagedAction<T>,
    ) -> Result<Vec<T>> {
        paginate::fetch_all(&mut self.ctx, action).await
    }

    /// Override the `User-Agent` value sent with subsequent requests.
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.ctx.set_user_agent(user_agent);
    }

    /// Set the page size requested from paginated endpoints.
    ///
    /// No upper bound is enforced locally; the remote applies its own
    /// limit.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.ctx.set_page_size(page_size);
    }

    /// Current page size.
    pub fn page_size(&self) -> u32 {
        self.ctx.page_size()
    }

    /// Current 1-based page cursor.
    pub fn current_page(&self) -> u32 {
        self.ctx.current_page()
    }

    /// Reset the page cursor to 1 and clear the continuation set.
    pub fn reset_pagination(&mut self) {
        self.ctx.reset_pagination();
    }

    /// Follow continuation hints and merge all pages (the default).
    pub fn enable_recursion(&mut self) {
        self.ctx.set_recurse(true);
    }

    /// Fetch only the page at the current cursor.
    pub fn disable_recursion(&mut self) {
        self.ctx.set_recurse(false);
    }

    /// Whether pagination recursion is enabled.
    pub fn recursion_enabled(&self) -> bool {
        self.ctx.recurse()
    }

    /// Continuation set from the most recent list response, if any.
    pub fn continuation(&self) -> Option<&LinkSet> {
        self.ctx.continuation()
    }
}

impl std::fmt::Debug for ApiSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSession")
            .field("current_page", &self.ctx.current_page())
            .field("page_size", &self.ctx.page_size())
            .field("recurse", &self.ctx.recurse())
            .finish_non_exhaustive()
    }
}
