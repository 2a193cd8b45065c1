//! Per-test HTTP server used by the integration tests.
//!
//! Each test starts its own server on a random port and the server task is
//! aborted when the guard drops, so nothing is shared between tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Bytes, to_bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use form3api::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub raw_query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

type Responder = dyn Fn(&Recorded) -> Response + Send + Sync;

#[derive(Clone)]
struct Recorder {
    requests: Arc<Mutex<Vec<Recorded>>>,
    respond: Arc<Responder>,
}

pub struct TestServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve `router` as is.
    pub async fn serve(router: Router) -> Self {
        Self::spawn(router, Arc::default()).await
    }

    /// Record every request and answer it with `respond`.
    pub async fn responding<F>(respond: F) -> Self
    where
        F: Fn(&Recorded) -> Response + Send + Sync + 'static,
    {
        let requests: Arc<Mutex<Vec<Recorded>>> = Arc::default();
        let recorder = Recorder {
            requests: requests.clone(),
            respond: Arc::new(respond),
        };
        let router = Router::new().fallback(record).with_state(recorder);
        Self::spawn(router, requests).await
    }

    async fn spawn(router: Router, requests: Arc<Mutex<Vec<Recorded>>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("test server");
        });
        Self {
            base_url: format!("http://{addr}"),
            requests,
            handle,
        }
    }

    pub fn client(&self) -> Client {
        Client::new(&self.base_url, None).expect("client should build")
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("recorder lock").clone()
    }

    pub fn single_request(&self) -> Recorded {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests[0].clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record(State(recorder): State<Recorder>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let query: HashMap<String, String> = parts
        .uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    let recorded = Recorded {
        method: parts.method,
        path: parts.uri.path().to_string(),
        query,
        raw_query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body,
    };
    let response = (recorder.respond)(&recorded);
    recorder.requests.lock().expect("recorder lock").push(recorded);
    response
}
