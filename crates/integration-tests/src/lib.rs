//! An in-process stand-in for the Zoom OAuth and Phone analytics endpoints.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use analytics::{Credentials, FetchWindow, Orchestrator};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use indoc::formatdoc;
use jiff::civil::date;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const ACCOUNT_ID: &str = "mock-account";
pub const CLIENT_ID: &str = "mock-client";
pub const CLIENT_SECRET: &str = "mock-secret";

/// Credentials the mock accepts.
pub fn credentials() -> Credentials {
    Credentials::new(ACCOUNT_ID, CLIENT_ID, &SecretString::from(CLIENT_SECRET.to_string()))
}

/// A window inside which the mock's data is valid; the mock ignores dates.
pub fn window() -> FetchWindow {
    FetchWindow::new(date(2024, 9, 1), date(2024, 9, 7), 100)
}

/// Builder for the mock provider.
pub struct ZoomMock {
    pages: Vec<Vec<Value>>,
    list_key: String,
    token_error: Option<(StatusCode, String)>,
    analytics_error: Option<(usize, StatusCode, String)>,
    analytics_delay: Duration,
    endless_cursor: bool,
}

impl Default for ZoomMock {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoomMock {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            list_key: "analytics".to_string(),
            token_error: None,
            analytics_error: None,
            analytics_delay: Duration::ZERO,
            endless_cursor: false,
        }
    }

    /// Records served page by page. Every page but the last carries a cursor.
    pub fn with_pages(mut self, pages: Vec<Vec<Value>>) -> Self {
        self.pages = pages;
        self
    }

    /// Key the record list is served under.
    pub fn with_list_key(mut self, key: &str) -> Self {
        self.list_key = key.to_string();
        self
    }

    /// Answers every token request with this status and body.
    pub fn with_token_error(mut self, status: StatusCode, body: &str) -> Self {
        self.token_error = Some((status, body.to_string()));
        self
    }

    /// Answers the analytics request for page `page` (zero-based) with this status and body.
    pub fn with_analytics_error(mut self, page: usize, status: StatusCode, body: &str) -> Self {
        self.analytics_error = Some((page, status, body.to_string()));
        self
    }

    /// Delays every analytics response.
    pub fn with_analytics_delay(mut self, delay: Duration) -> Self {
        self.analytics_delay = delay;
        self
    }

    /// Keeps returning the same cursor forever.
    pub fn with_endless_cursor(mut self) -> Self {
        self.endless_cursor = true;
        self
    }

    pub async fn spawn(self) -> MockZoom {
        let state = Arc::new(MockState {
            mock: self,
            issued_tokens: Mutex::new(Vec::new()),
            token_requests: AtomicUsize::new(0),
            analytics_queries: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/oauth/token", post(token))
            .route("/v2/phone/call_queue_analytics", get(call_queue_analytics))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                log::error!("Mock Zoom server stopped: {e}");
            }
        });

        MockZoom { address, state }
    }
}

struct MockState {
    mock: ZoomMock,
    issued_tokens: Mutex<Vec<String>>,
    token_requests: AtomicUsize,
    analytics_queries: Mutex<Vec<HashMap<String, String>>>,
}

/// A running mock provider.
pub struct MockZoom {
    address: SocketAddr,
    state: Arc<MockState>,
}

impl MockZoom {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// Configuration pointing at this mock, with `extra_fetch` appended to `[fetch]`.
    pub fn config(&self, extra_fetch: &str) -> config::Config {
        let base_url = self.base_url();

        let toml = formatdoc! {r#"
            [zoom]
            token_url = "{base_url}/oauth/token"
            api_url = "{base_url}/v2"

            [fetch]
            page_delay = "0s"
            {extra_fetch}
        "#, base_url = base_url, extra_fetch = extra_fetch};

        config::Config::from_toml(&toml).unwrap()
    }

    /// An orchestrator talking to this mock over `reqwest`.
    pub fn orchestrator(&self, extra_fetch: &str) -> Orchestrator {
        Orchestrator::from_config(&self.config(extra_fetch)).unwrap()
    }

    pub fn token_requests(&self) -> usize {
        self.state.token_requests.load(Ordering::SeqCst)
    }

    /// Query parameters of every analytics request received so far.
    pub fn analytics_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.analytics_queries.lock().unwrap().clone()
    }
}

async fn token(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let count = state.token_requests.fetch_add(1, Ordering::SeqCst) + 1;

    if let Some((status, body)) = &state.mock.token_error {
        return (*status, body.clone()).into_response();
    }

    let expected = format!("Basic {}", STANDARD.encode(format!("{CLIENT_ID}:{CLIENT_SECRET}")));
    let authorized = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some(expected.as_str());

    if !authorized {
        let body = json!({ "reason": "Invalid client_id or client_secret", "error": "invalid_client" });
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    if params.get("grant_type").map(String::as_str) != Some("account_credentials") {
        let body = json!({ "reason": "Unsupported grant type", "error": "unsupported_grant_type" });
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }

    if params.get("account_id").map(String::as_str) != Some(ACCOUNT_ID) {
        let body = json!({ "reason": "Invalid account_id", "error": "invalid_request" });
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }

    let access_token = format!("mock-token-{count}");
    state.issued_tokens.lock().unwrap().push(access_token.clone());

    Json(json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 3599,
        "scope": "phone:read:admin",
    }))
    .into_response()
}

async fn call_queue_analytics(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.analytics_queries.lock().unwrap().push(params.clone());

    if !state.mock.analytics_delay.is_zero() {
        tokio::time::sleep(state.mock.analytics_delay).await;
    }

    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let known = bearer.is_some_and(|token| state.issued_tokens.lock().unwrap().contains(&token));

    if !known {
        let body = json!({ "code": 124, "message": "Invalid access token." });
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    let page = match params.get("next_page_token") {
        None => 0,
        Some(cursor) => match cursor.strip_prefix("page-").and_then(|n| n.parse::<usize>().ok()) {
            Some(page) => page,
            None => {
                let body = json!({ "code": 300, "message": "Invalid next_page_token." });
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
        },
    };

    if let Some((failing, status, body)) = &state.mock.analytics_error
        && *failing == page
    {
        return (*status, body.clone()).into_response();
    }

    let mock = &state.mock;
    let records = mock.pages.get(page).cloned().unwrap_or_default();

    let next_page_token = if mock.endless_cursor {
        "page-0".to_string()
    } else if page + 1 < mock.pages.len() {
        format!("page-{}", page + 1)
    } else {
        String::new()
    };

    let mut body = serde_json::Map::new();
    body.insert("from".to_string(), json!(params.get("from")));
    body.insert("to".to_string(), json!(params.get("to")));
    body.insert("page_size".to_string(), json!(params.get("page_size")));
    body.insert("next_page_token".to_string(), json!(next_page_token));
    body.insert(mock.list_key.clone(), Value::Array(records));

    Json(Value::Object(body)).into_response()
}
