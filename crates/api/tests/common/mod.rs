#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use bmcwatch_bmc::{BmcClient, BmcConfig, ProbeExecutor};
use bmcwatch_core::alert::NotificationCategory;
use bmcwatch_events::{NotificationMessage, Notifier, NotifyError};
use http_body_util::BodyExt;
use tower::ServiceExt;

use bmcwatch_api::config::{MonitorConfig, ServerConfig};
use bmcwatch_api::monitor::TemperatureMonitor;
use bmcwatch_api::router::build_app_router;
use bmcwatch_api::state::AppState;

// ---------------------------------------------------------------------------
// Fake controller
// ---------------------------------------------------------------------------

type Routes = Arc<Mutex<HashMap<String, String>>>;

/// Serves 200 with the configured body for known path-and-query keys and
/// 404 for everything else. Routes can be changed while it runs.
pub struct FakeController {
    addr: SocketAddr,
    routes: Routes,
}

impl FakeController {
    pub async fn spawn() -> Self {
        let routes: Routes = Arc::default();
        let app = Router::new()
            .fallback(serve_route)
            .with_state(Arc::clone(&routes));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, routes }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set(&self, path_and_query: &str, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(path_and_query.to_string(), body.to_string());
    }

    pub fn clear(&self) {
        self.routes.lock().unwrap().clear();
    }
}

async fn serve_route(State(routes): State<Routes>, uri: Uri) -> Response {
    let key = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    match routes.lock().unwrap().get(&key) {
        Some(body) => (StatusCode::OK, body.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// ---------------------------------------------------------------------------
// Recording notifier
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<NotificationMessage>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn categories(&self) -> Vec<NotificationCategory> {
        self.sent().iter().map(|m| m.category).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub monitor: Arc<TemperatureMonitor>,
    pub notifier: Arc<RecordingNotifier>,
    pub controller: FakeController,
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5000".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router against a fresh fake controller, wired
/// through the production probe chain.
pub async fn build_test_app(monitor_config: MonitorConfig) -> TestApp {
    let controller = FakeController::spawn().await;
    let bmc = Arc::new(BmcClient::new(BmcConfig::new(controller.url(), "root", "calvin")).unwrap());
    let probe = ProbeExecutor::from_catalog(Arc::clone(&bmc), monitor_config.calibration);
    let notifier = Arc::new(RecordingNotifier::default());
    let monitor = Arc::new(TemperatureMonitor::new(
        probe,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        &monitor_config,
    ));

    let config = test_config();
    let state = AppState {
        monitor: Arc::clone(&monitor),
        bmc,
    };

    TestApp {
        router: build_app_router(state, &config),
        monitor,
        notifier,
        controller,
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
