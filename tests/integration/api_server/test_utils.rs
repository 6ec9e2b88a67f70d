//! Test utilities for API server integration tests

use std::sync::Arc;
use std::time::Instant;

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use serde_json::json;
use tokio::sync::RwLock;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockpilot::core::http::{create_router, AppState, HealthStatus};
use stockpilot::db::MemoryPortfolioStore;
use stockpilot::metrics::Metrics;
use stockpilot::services::YahooFinanceProvider;
use stockpilot::session::SessionStore;
use stockpilot::signals::SignalCache;

/// Helper structure bundling together the HTTP server and mocked
/// collaborators.
#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub yahoo: MockServer,
    pub store: Arc<MemoryPortfolioStore>,
    pub sessions: Arc<SessionStore>,
}

impl TestApp {
    pub async fn new() -> Self {
        let yahoo = MockServer::start().await;
        let provider = YahooFinanceProvider::with_client(yahoo.uri(), reqwest::Client::new());

        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let store = Arc::new(MemoryPortfolioStore::new());
        let sessions = Arc::new(SessionStore::new());

        let state = AppState {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            store: store.clone(),
            provider: Arc::new(provider),
            sessions: sessions.clone(),
            cache: Arc::new(SignalCache::new()),
        };

        let router = create_router(state);
        let server = TestServer::new(router).expect("start test server");

        Self {
            server,
            metrics,
            yahoo,
            store,
            sessions,
        }
    }

    /// Register an account and log in, returning the session token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .server
            .post("/api/auth/register")
            .json(&json!({ "email": email, "password": password }))
            .await;
        assert_eq!(response.status_code(), 201);

        let response = self
            .server
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        assert_eq!(response.status_code(), 200);
        response.json::<serde_json::Value>()["token"]
            .as_str()
            .expect("login token")
            .to_string()
    }
}

pub fn session_header(token: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-session-token"),
        HeaderValue::from_str(token).expect("valid token header"),
    )
}

/// Mount a chart response with one daily close per element, oldest first.
pub async fn mock_chart(server: &MockServer, ticker: &str, closes: &[f64]) {
    // 2024-06-01T00:00:00Z, stepped one day per bar.
    let base = 1_717_200_000_i64;
    let timestamps: Vec<i64> = (0..closes.len()).map(|i| base + i as i64 * 86_400).collect();

    let response = json!({
        "chart": {
            "result": [{
                "timestamp": timestamps,
                "indicators": { "quote": [{ "close": closes }] }
            }],
            "error": null
        }
    });

    Mock::given(method("GET"))
        .and(path(format!("/v8/finance/chart/{}", ticker)))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

/// Mount the 404 error payload Yahoo answers for unknown symbols.
pub async fn mock_chart_not_found(server: &MockServer, ticker: &str) {
    let response = json!({
        "chart": {
            "result": null,
            "error": { "code": "Not Found", "description": "No data found" }
        }
    });

    Mock::given(method("GET"))
        .and(path(format!("/v8/finance/chart/{}", ticker)))
        .respond_with(ResponseTemplate::new(404).set_body_json(response))
        .mount(server)
        .await;
}
