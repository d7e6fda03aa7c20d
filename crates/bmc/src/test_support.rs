//! In-process mock controller for client and strategy tests.
//!
//! Serves canned responses keyed by path-and-query, requires the mock
//! basic-auth credentials, and counts hits per key.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::config::BmcConfig;

pub const MOCK_USER: &str = "root";
pub const MOCK_PASSWORD: &str = "calvin";

/// `Basic base64("root:calvin")`.
const EXPECTED_AUTHORIZATION: &str = "Basic cm9vdDpjYWx2aW4=";

type HitCounter = Arc<Mutex<HashMap<String, usize>>>;

struct Shared {
    routes: HashMap<String, (u16, String)>,
    hits: HitCounter,
}

#[derive(Default)]
pub struct MockBmcBuilder {
    routes: HashMap<String, (u16, String)>,
}

impl MockBmcBuilder {
    pub fn route(mut self, path_and_query: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert(path_and_query.to_string(), (status, body.to_string()));
        self
    }

    pub async fn spawn(self) -> MockBmc {
        let hits: HitCounter = Arc::default();
        let shared = Arc::new(Shared {
            routes: self.routes,
            hits: Arc::clone(&hits),
        });
        let app = Router::new().fallback(handle).with_state(shared);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock controller");
        let addr = listener.local_addr().expect("mock controller address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock controller");
        });

        MockBmc { addr, hits }
    }
}

pub struct MockBmc {
    addr: SocketAddr,
    hits: HitCounter,
}

impl MockBmc {
    pub fn builder() -> MockBmcBuilder {
        MockBmcBuilder::default()
    }

    pub fn config(&self) -> BmcConfig {
        BmcConfig::new(format!("http://{}", self.addr), MOCK_USER, MOCK_PASSWORD)
    }

    pub fn hits(&self, path_and_query: &str) -> usize {
        self.hits
            .lock()
            .expect("hit counter")
            .get(path_and_query)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().expect("hit counter").values().sum()
    }
}

async fn handle(State(shared): State<Arc<Shared>>, uri: Uri, headers: HeaderMap) -> Response {
    let key = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    *shared
        .hits
        .lock()
        .expect("hit counter")
        .entry(key.clone())
        .or_insert(0) += 1;

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(EXPECTED_AUTHORIZATION);
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match shared.routes.get(&key) {
        Some((status, body)) => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
