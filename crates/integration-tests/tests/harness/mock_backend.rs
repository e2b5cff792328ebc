//! Mock chat-completion backend for integration tests
//!
//! Answers every request with one canned reply and records what it received,
//! so tests can assert on the exact wire request an adapter produced.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Request as seen by the mock backend
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    /// Decoded JSON body, `Null` when the body was empty
    pub body: serde_json::Value,
}

impl RecordedRequest {
    /// Header value as a string, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Mock backend that replays a fixed reply
pub struct MockBackend {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    request_count: AtomicU32,
    requests: Mutex<Vec<RecordedRequest>>,
    status: StatusCode,
    body: String,
}

impl MockBackend {
    /// Start a mock that answers `200 OK` with the given JSON body
    pub async fn start(body: serde_json::Value) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::OK, body.to_string()).await
    }

    /// Start a mock that answers with an arbitrary status and raw body
    pub async fn start_with_status(status: u16, body: &str) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::from_u16(status)?, body.to_owned()).await
    }

    async fn start_inner(status: StatusCode, body: String) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            request_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
            status,
            body,
        });

        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL with the given API prefix (e.g. `v1`, `v1beta`)
    pub fn base_url(&self, prefix: &str) -> Url {
        Url::parse(&format!("http://{}/{prefix}", self.addr)).expect("valid mock URL")
    }

    /// Number of requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("mock state poisoned").clone()
    }

    /// Most recent request
    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("mock received no requests")
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Base URL of a port nothing listens on
pub async fn unreachable_url(prefix: &str) -> anyhow::Result<Url> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(Url::parse(&format!("http://{addr}/{prefix}"))?)
}

async fn handle(State(state): State<Arc<MockState>>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let body = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };

    state.requests.lock().expect("mock state poisoned").push(RecordedRequest {
        method,
        path: uri.path().to_owned(),
        headers,
        body,
    });

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
        .into_response()
}
