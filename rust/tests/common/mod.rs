// In-process fake DCNM controller for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use parking_lot::{Mutex, RwLock};
use tokio::net::TcpListener;
use tracing_subscriber::fmt::MakeWriter;

/// A request as the fake controller saw it. Header names are lowercase.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[derive(Default)]
struct MockState {
    responses: RwLock<HashMap<(String, String), (u16, String)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockController {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockController {
    /// Start a controller on a random port. Unknown routes answer 404.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Answer `method path` with `status` and a JSON `body`.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: &str) {
        self.state.responses.write().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }
}

async fn handle(State(state): State<Arc<MockState>>, req: Request) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let headers = req
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("").to_string()))
        .collect();
    let body = to_bytes(req.into_body(), usize::MAX).await.unwrap();

    state.requests.lock().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let canned = state.responses.read().get(&(method, path)).cloned();
    match canned {
        Some((status, body)) => (
            StatusCode::from_u16(status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            Body::from(body),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, r#"{"error":"not found"}"#).into_response(),
    }
}

/// A base URL nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Log output collected by a test-local tracing subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Install a subscriber writing into this buffer for the current thread.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
