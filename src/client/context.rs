//! Mutable session state and the request executor.
//!
//! An [`ExecutionContext`] is created once per session run, owns the
//! transport handle for the run's lifetime, and is mutated in place after
//! every HTTP call. It is threaded by exclusive reference through the
//! sequential call chain and never shared between runs.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, LINK, USER_AGENT};
use serde::de::DeserializeOwned;

use crate::auth::AuthCredential;
use crate::endpoint::{BoundOperation, PagedAction, SingleAction};
use crate::link::{parse_link_header, LinkSet};
use crate::transport::{Transport, TransportRequest, TransportResponse};
use crate::{Error, Result};

use super::config::SessionConfig;

pub(crate) struct ExecutionContext {
    transport: Box<dyn Transport>,
    credential: Option<AuthCredential>,
    user_agent: String,
    page_size: u32,
    current_page: u32,
    continuation: Option<LinkSet>,
    recurse: bool,
}

impl ExecutionContext {
    pub(crate) fn new(
        transport: Box<dyn Transport>,
        credential: Option<AuthCredential>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            transport,
            credential,
            user_agent: config.user_agent.clone(),
            page_size: config.page_size,
            current_page: 1,
            continuation: None,
            recurse: true,
        }
    }

    pub(crate) fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = user_agent.into();
    }

    pub(crate) fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size;
    }

    pub(crate) fn page_size(&self) -> u32 {
        self.page_size
    }

    pub(crate) fn current_page(&self) -> u32 {
        self.current_page
    }

    pub(crate) fn advance_page(&mut self) {
        self.current_page += 1;
    }

    pub(crate) fn reset_pagination(&mut self) {
        self.current_page = 1;
        self.continuation = None;
    }

    pub(crate) fn set_recurse(&mut self, recurse: bool) {
        self.recurse = recurse;
    }

    pub(crate) fn recurse(&self) -> bool {
        self.recurse
    }

    pub(crate) fn continuation(&self) -> Option<&LinkSet> {
        self.continuation.as_ref()
    }

    /// Execute a single-resource action: one call, one payload.
    pub(crate) async fn execute_single<T: DeserializeOwned>(
        &mut self,
        action: &SingleAction<T>,
    ) -> Result<T> {
        let response = self.dispatch(&action.op, Vec::new()).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Execute one page of a paginated action, returning the page's items
    /// and the continuation set parsed from the `Link` response header.
    ///
    /// The context's continuation is replaced with the parsed set (or
    /// cleared when the header is absent).
    pub(crate) async fn execute_page<T: DeserializeOwned>(
        &mut self,
        action: &PagedAction<T>,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<T>, Option<LinkSet>)> {
        let paging = vec![
            ("page".to_string(), page.to_string()),
            ("per_page".to_string(), per_page.to_string()),
        ];
        let response = self.dispatch(&action.op, paging).await?;

        let links = response
            .headers
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(parse_link_header);

        let items = serde_json::from_slice(&response.body)?;
        self.continuation = links.clone();

        Ok((items, links))
    }

    /// Inject headers and pagination parameters, send, and check status.
    async fn dispatch(
        &mut self,
        op: &BoundOperation,
        paging: Vec<(String, String)>,
    ) -> Result<TransportResponse> {
        let headers = self.build_headers()?;

        let mut query = op.query.clone();
        query.extend(paging);

        tracing::debug!(
            endpoint = %op.endpoint,
            method = %op.method,
            path = %op.path,
            "dispatching request"
        );

        let response = self
            .transport
            .send(TransportRequest {
                method: op.method.clone(),
                path: op.path.clone(),
                query,
                headers,
                body: None,
            })
            .await?;

        if !response.status.is_success() {
            let body = serde_json::from_slice(&response.body).unwrap_or_default();
            return Err(Error::from_status(response.status.as_u16(), body));
        }

        Ok(response)
    }

    /// Build cross-cutting request headers: identification always,
    /// authorization iff a credential was supplied.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|_| Error::Config(format!("invalid user agent: {}", self.user_agent)))?,
        );

        if let Some(credential) = &self.credential {
            let mut value = HeaderValue::from_str(&credential.header_value())
                .map_err(|_| Error::Config("invalid credential value".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}
