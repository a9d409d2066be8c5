//! Integration tests for the octopage execution engine.
//!
//! Every test runs against a scripted in-memory transport that records the
//! requests it receives, so header injection, pagination parameters, and
//! continuation handling can be asserted without a network.
//!
//! Run with: cargo test --test engine_tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use octopage::endpoint::EndpointDescriptor;
use octopage::prelude::*;

static INIT: Once = Once::new();

/// Initialize logging for tests
fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Scripted responses plus a log of every request sent.
#[derive(Default)]
struct Script {
    responses: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl Script {
    fn new(responses: Vec<TransportResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

struct ScriptedTransport(Arc<Script>);

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> octopage::Result<TransportResponse> {
        self.0.requests.lock().unwrap().push(request);
        self.0
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Config("scripted transport exhausted".to_string()))
    }
}

fn session_with(script: &Arc<Script>, credential: Option<AuthCredential>) -> ApiSession {
    init_logging();
    ApiSession::with_transport(
        Box::new(ScriptedTransport(script.clone())),
        credential,
        SessionConfig::default(),
    )
}

fn response(status: u16, body: serde_json::Value, link: Option<&str>) -> TransportResponse {
    let mut headers = HeaderMap::new();
    if let Some(link) = link {
        headers.insert(LINK, HeaderValue::from_str(link).unwrap());
    }
    TransportResponse {
        status: StatusCode::from_u16(status).unwrap(),
        headers,
        body: serde_json::to_vec(&body).unwrap(),
    }
}

fn next_link(page: u32) -> String {
    format!("<https://api.example/items?page={page}>; rel=\"next\"")
}

fn last_link(page: u32) -> String {
    format!("<https://api.example/items?page={page}>; rel=\"last\"")
}

#[derive(Debug, Deserialize, PartialEq)]
struct Item {
    id: u32,
}

fn items(ids: &[u32]) -> serde_json::Value {
    json!(ids.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>())
}

fn item_list() -> EndpointDescriptor {
    EndpointDescriptor::paginated("items", Method::GET, "/items")
}

fn one_item() -> EndpointDescriptor {
    EndpointDescriptor::single("item", Method::GET, "/items/{id}").path_param("id")
}

fn query_value<'a>(request: &'a TransportRequest, name: &str) -> Option<&'a str> {
    request
        .query
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

// ============================================================================
// HEADER INJECTION TESTS
// ============================================================================

mod header_injection_tests {
    use super::*;

    #[tokio::test]
    async fn test_identification_header_always_present() {
        let script = Script::new(vec![response(200, json!({ "id": 1 }), None)]);
        let mut session = session_with(&script, None);

        let action = one_item().bind(["1"]).unwrap().into_single::<Item>().unwrap();
        session.single(&action).await.unwrap();

        let requests = script.requests();
        assert_eq!(requests.len(), 1);
        let user_agent = requests[0].headers.get(USER_AGENT).unwrap();
        assert!(user_agent.to_str().unwrap().starts_with("octopage/"));
    }

    #[tokio::test]
    async fn test_authorization_header_verbatim_with_credential() {
        let script = Script::new(vec![response(200, json!({ "id": 1 }), None)]);
        let mut session = session_with(&script, Some(AuthCredential::new("s3cret")));

        let action = one_item().bind(["1"]).unwrap().into_single::<Item>().unwrap();
        session.single(&action).await.unwrap();

        let requests = script.requests();
        let auth = requests[0].headers.get(AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "token s3cret");
    }

    #[tokio::test]
    async fn test_no_authorization_header_without_credential() {
        let script = Script::new(vec![response(200, json!({ "id": 1 }), None)]);
        let mut session = session_with(&script, None);

        let action = one_item().bind(["1"]).unwrap().into_single::<Item>().unwrap();
        session.single(&action).await.unwrap();

        let requests = script.requests();
        assert!(requests[0].headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_user_agent_override_applies_to_later_requests() {
        let script = Script::new(vec![
            response(200, json!({ "id": 1 }), None),
            response(200, json!({ "id": 2 }), None),
        ]);
        let mut session = session_with(&script, None);
        let action = one_item().bind(["1"]).unwrap().into_single::<Item>().unwrap();

        session.single(&action).await.unwrap();
        session.set_user_agent("custom-agent/9.9");
        session.single(&action).await.unwrap();

        let requests = script.requests();
        assert!(requests[0]
            .headers
            .get(USER_AGENT)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("octopage/"));
        assert_eq!(
            requests[1].headers.get(USER_AGENT).unwrap().to_str().unwrap(),
            "custom-agent/9.9"
        );
    }

    #[tokio::test]
    async fn test_pagination_params_only_on_list_shapes() {
        let script = Script::new(vec![
            response(200, json!({ "id": 1 }), None),
            response(200, items(&[1]), None),
        ]);
        let mut session = session_with(&script, None);

        let single = one_item().bind(["1"]).unwrap().into_single::<Item>().unwrap();
        session.single(&single).await.unwrap();

        let paged = item_list()
            .bind(Vec::<String>::new())
            .unwrap()
            .into_paginated::<Item>()
            .unwrap();
        session.paginated(&paged).await.unwrap();

        let requests = script.requests();
        assert!(query_value(&requests[0], "page").is_none());
        assert!(query_value(&requests[0], "per_page").is_none());
        assert_eq!(query_value(&requests[1], "page"), Some("1"));
        assert_eq!(query_value(&requests[1], "per_page"), Some("100"));
    }
}

// ============================================================================
// PAGINATION TESTS
// ============================================================================

mod pagination_tests {
    use super::*;

    #[tokio::test]
    async fn test_accumulates_all_pages_in_order() {
        let script = Script::new(vec![
            response(200, items(&[1, 2]), Some(&next_link(2))),
            response(200, items(&[3, 4]), Some(&next_link(3))),
            response(200, items(&[5]), None),
        ]);
        let mut session = session_with(&script, None);

        let action = item_list()
            .bind(Vec::<String>::new())
            .unwrap()
            .into_paginated::<Item>()
            .unwrap();
        let all = session.paginated(&action).await.unwrap();

        let ids: Vec<u32> = all.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        let requests = script.requests();
        assert_eq!(requests.len(), 3);
        let pages: Vec<&str> = requests
            .iter()
            .map(|request| query_value(request, "page").unwrap())
            .collect();
        assert_eq!(pages, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_recursion_off_issues_exactly_one_request() {
        let script = Script::new(vec![response(200, items(&[1, 2]), Some(&next_link(2)))]);
        let mut session = session_with(&script, None);
        session.disable_recursion();

        let action = item_list()
            .bind(Vec::<String>::new())
            .unwrap()
            .into_paginated::<Item>()
            .unwrap();
        let page = session.paginated(&action).await.unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(script.requests().len(), 1);
        // Cursor is not advanced when recursion is off.
        assert_eq!(session.current_page(), 1);
    }

    #[tokio::test]
    async fn test_reset_starts_from_page_one() {
        let script = Script::new(vec![
            response(200, items(&[1, 2]), Some(&next_link(2))),
            response(200, items(&[3]), None),
            response(200, items(&[1, 2]), Some(&next_link(2))),
            response(200, items(&[3]), None),
        ]);
        let mut session = session_with(&script, None);

        let action = item_list()
            .bind(Vec::<String>::new())
            .unwrap()
            .into_paginated::<Item>()
            .unwrap();

        session.paginated(&action).await.unwrap();
        assert_eq!(session.current_page(), 2);

        session.reset_pagination();
        assert_eq!(session.current_page(), 1);
        assert!(session.continuation().is_none());

        session.paginated(&action).await.unwrap();
        let requests = script.requests();
        assert_eq!(query_value(&requests[2], "page"), Some("1"));
    }

    #[tokio::test]
    async fn test_failure_discards_partial_accumulation() {
        let script = Script::new(vec![
            response(200, items(&[1, 2]), Some(&next_link(2))),
            response(200, items(&[3, 4]), Some(&next_link(3))),
            response(500, json!({ "message": "server on fire" }), None),
        ]);
        let mut session = session_with(&script, None);

        let action = item_list()
            .bind(Vec::<String>::new())
            .unwrap()
            .into_paginated::<Item>()
            .unwrap();
        let err = session.paginated(&action).await.unwrap_err();

        assert!(err.is_transport_error());
        assert!(err.is_server_error());
        assert_eq!(script.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_continuation_tracks_latest_response() {
        let script = Script::new(vec![
            response(200, items(&[1]), Some(&next_link(2))),
            response(200, items(&[2]), Some(&last_link(1))),
        ]);
        let mut session = session_with(&script, None);

        let action = item_list()
            .bind(Vec::<String>::new())
            .unwrap()
            .into_paginated::<Item>()
            .unwrap();
        session.paginated(&action).await.unwrap();

        let continuation = session.continuation().unwrap();
        assert!(!continuation.has_next());
        assert!(continuation.get("last").is_some());
    }

    #[tokio::test]
    async fn test_five_items_across_three_pages() {
        let script = Script::new(vec![
            response(200, items(&[10, 11]), Some(&next_link(2))),
            response(200, items(&[12, 13]), Some(&next_link(3))),
            response(200, items(&[14]), Some(&last_link(3))),
        ]);
        let mut session = session_with(&script, None);
        session.set_page_size(2);

        let action = item_list()
            .bind(Vec::<String>::new())
            .unwrap()
            .into_paginated::<Item>()
            .unwrap();
        let all = session.paginated(&action).await.unwrap();

        let ids: Vec<u32> = all.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![10, 11, 12, 13, 14]);
        assert_eq!(session.current_page(), 3);
        assert!(!session.continuation().unwrap().has_next());

        for request in script.requests() {
            assert_eq!(query_value(&request, "per_page"), Some("2"));
        }
    }
}

// ============================================================================
// BINDER / ARITY TESTS
// ============================================================================

mod binder_tests {
    use super::*;

    #[tokio::test]
    async fn test_zero_one_and_five_parameter_endpoints_execute_identically() {
        let script = Script::new(vec![
            response(200, json!({ "id": 1 }), None),
            response(200, json!({ "id": 2 }), None),
            response(200, json!({ "id": 3 }), None),
        ]);
        let mut session = session_with(&script, None);

        let zero = EndpointDescriptor::single("meta", Method::GET, "/meta");
        let one = one_item();
        let five = EndpointDescriptor::single(
            "deep",
            Method::GET,
            "/orgs/{org}/repos/{repo}/issues/{number}",
        )
        .path_param("org")
        .path_param("repo")
        .path_param("number")
        .query_param("state")
        .query_param("sort");

        let actions = vec![
            zero.bind(Vec::<String>::new()).unwrap(),
            one.bind(["42"]).unwrap(),
            five.bind(["octo-org", "octo-repo", "7", "open", "created"]).unwrap(),
        ];
        for action in actions {
            let action = action.into_single::<Item>().unwrap();
            session.single(&action).await.unwrap();
        }

        let requests = script.requests();
        assert_eq!(requests[0].path, "/meta");
        assert_eq!(requests[1].path, "/items/42");
        assert_eq!(requests[2].path, "/orgs/octo-org/repos/octo-repo/issues/7");
        assert_eq!(query_value(&requests[2], "state"), Some("open"));
        assert_eq!(query_value(&requests[2], "sort"), Some("created"));
    }

    #[tokio::test]
    async fn test_construction_errors_send_no_requests() {
        let script = Script::new(vec![]);
        let session = session_with(&script, None);

        // Too many arguments.
        assert!(one_item().bind(["1", "2"]).unwrap_err().is_construction_error());
        // Shape mismatch.
        assert!(item_list()
            .bind(Vec::<String>::new())
            .unwrap()
            .into_single::<Item>()
            .unwrap_err()
            .is_construction_error());

        drop(session);
        assert!(script.requests().is_empty());
    }
}

// ============================================================================
// SESSION DRIVER TESTS
// ============================================================================

mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_run_threads_state_across_operations() {
        let script = Script::new(vec![
            response(200, json!({ "id": 1 }), None),
            response(200, items(&[2, 3]), Some(&next_link(2))),
            response(200, items(&[4]), None),
        ]);
        let session = session_with(&script, Some(AuthCredential::new("s3cret")));

        let single = one_item().bind(["1"]).unwrap().into_single::<Item>().unwrap();
        let paged = item_list()
            .bind(Vec::<String>::new())
            .unwrap()
            .into_paginated::<Item>()
            .unwrap();

        let total = session
            .run(|session| {
                Box::pin(async move {
                    let first = session.single(&single).await?;
                    let rest = session.paginated(&paged).await?;
                    Ok(first.id + rest.iter().map(|item| item.id).sum::<u32>())
                })
            })
            .await
            .unwrap();

        assert_eq!(total, 1 + 2 + 3 + 4);
        assert_eq!(script.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_run_returns_first_error() {
        let script = Script::new(vec![response(404, json!({ "message": "Not Found" }), None)]);
        let session = session_with(&script, None);

        let action = one_item().bind(["9"]).unwrap().into_single::<Item>().unwrap();
        let err = session
            .run(|session| Box::pin(async move { session.single(&action).await }))
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        match err {
            Error::Status { status, message, .. } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_decode_failure_is_transport_error() {
        let script = Script::new(vec![response(200, json!("not an item"), None)]);
        let mut session = session_with(&script, None);

        let action = one_item().bind(["1"]).unwrap().into_single::<Item>().unwrap();
        let err = session.single(&action).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(err.is_transport_error());
    }
}

// ============================================================================
// LINK PARSER TESTS
// ============================================================================

mod link_parser_tests {
    use super::*;

    #[test]
    fn test_single_next_entry() {
        let set = parse_link_header("<https://api.example/x?page=2>; rel=\"next\"");
        assert_eq!(set.len(), 1);
        assert!(set.has_next());
    }

    #[test]
    fn test_garbage_is_not_an_error() {
        let set = parse_link_header("garbage, also garbage");
        assert!(set.is_empty());
        assert!(!set.has_next());
    }
}
