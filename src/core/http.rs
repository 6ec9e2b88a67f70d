//! HTTP endpoint server using Axum.

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::config;
use crate::db::{PgPortfolioStore, PortfolioStore};
use crate::error::SignalError;
use crate::metrics::Metrics;
use crate::models::PortfolioEntry;
use crate::report;
use crate::services::{MarketDataProvider, YahooFinanceProvider};
use crate::session::{SessionContext, SessionStore};
use crate::signals::engine::{self, round2, LevelParams};
use crate::signals::{CacheKey, SignalCache, SignalSnapshot};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub store: Arc<dyn PortfolioStore>,
    pub provider: Arc<dyn MarketDataProvider>,
    pub sessions: Arc<SessionStore>,
    pub cache: Arc<SignalCache>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "stockpilot-api"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Resolve the session context from the `X-Session-Token` header.
async fn require_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<SessionContext, ApiError> {
    let token = headers
        .get("x-session-token")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "missing session token"))?;

    state
        .sessions
        .get(token)
        .await
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "invalid session token"))
}

#[derive(Debug, Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<Credentials>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    use crate::error::StoreError;

    match state.store.register(&request.email, &request.password).await {
        Ok(()) => {
            info!(email = %request.email, "user registered");
            Ok((
                StatusCode::CREATED,
                Json(json!({ "status": "registered", "email": request.email })),
            ))
        }
        Err(StoreError::DuplicateUser) => {
            warn!(email = %request.email, "registration rejected, user already exists");
            Err(api_error(StatusCode::CONFLICT, "user already exists"))
        }
        Err(e) => {
            error!(error = %e, "registration failed");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, "store failure"))
        }
    }
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<Credentials>,
) -> Result<Json<Value>, ApiError> {
    use crate::error::StoreError;

    match state
        .store
        .authenticate(&request.email, &request.password)
        .await
    {
        Ok(user) => {
            let token = state.sessions.create(&user.email).await;
            info!(email = %user.email, "login successful");
            Ok(Json(json!({ "token": token, "email": user.email })))
        }
        Err(StoreError::InvalidCredentials) => {
            warn!(email = %request.email, "invalid credentials");
            Err(api_error(StatusCode::UNAUTHORIZED, "invalid credentials"))
        }
        Err(e) => {
            error!(error = %e, "authentication failed");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, "store failure"))
        }
    }
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let token = headers
        .get("x-session-token")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "missing session token"))?;

    state.sessions.remove(token).await;
    Ok(Json(json!({ "status": "logged out" })))
}

#[derive(Debug, Deserialize)]
struct SignalQuery {
    window: Option<usize>,
}

/// Serve the computation for (ticker, window, today) from the cache, or
/// fetch history and run the engine on a miss.
async fn load_snapshot(
    state: &AppState,
    ticker: &str,
    window: usize,
) -> Result<SignalSnapshot, ApiError> {
    if window == 0 {
        return Err(api_error(StatusCode::BAD_REQUEST, "window must be positive"));
    }

    let key = CacheKey::new(ticker, window, Utc::now().date_naive());
    if let Some(snapshot) = state.cache.get(&key).await {
        state.metrics.signal_cache_hits_total.inc();
        return Ok(snapshot);
    }

    let bars = state
        .provider
        .fetch_daily(ticker, config::DEFAULT_HISTORY_RANGE)
        .await
        .map_err(|e| {
            error!(ticker = %ticker, error = %e, "price history fetch failed");
            api_error(StatusCode::BAD_GATEWAY, "price provider failure")
        })?;

    let levels = engine::compute(&bars, &LevelParams::with_window(window)).map_err(
        |e| match e {
            SignalError::DataUnavailable => api_error(
                StatusCode::NOT_FOUND,
                format!("no stock data found for {}", ticker),
            ),
            SignalError::InsufficientHistory { have, need } => api_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("insufficient history for {}: {} bars, need {}", ticker, have, need),
            ),
        },
    )?;

    state.metrics.signals_computed_total.inc();
    let snapshot = SignalSnapshot {
        levels,
        series: bars,
    };
    state.cache.insert(key, snapshot.clone()).await;
    Ok(snapshot)
}

/// Metrics view: levels, signal, and the fixed-rate INR price next to USD.
async fn get_signal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(ticker): Path<String>,
    Query(params): Query<SignalQuery>,
) -> Result<Json<Value>, ApiError> {
    require_session(&state, &headers).await?;

    let ticker = ticker.to_uppercase();
    let window = params.window.unwrap_or(config::DEFAULT_WINDOW);
    let snapshot = load_snapshot(&state, &ticker, window).await?;
    let levels = &snapshot.levels;

    Ok(Json(json!({
        "ticker": ticker,
        "window": window,
        "as_of": snapshot.series.last().map(|b| b.date),
        "latest_price": levels.latest_price,
        "latest_price_inr": round2(levels.latest_price * config::USD_TO_INR),
        "best_entry": levels.best_entry,
        "target": levels.target,
        "stop_loss": levels.stop_loss,
        "signal": levels.signal,
    })))
}

/// Chart view: the close series plus the three horizontal threshold lines.
async fn get_chart(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(ticker): Path<String>,
    Query(params): Query<SignalQuery>,
) -> Result<Json<Value>, ApiError> {
    require_session(&state, &headers).await?;

    let ticker = ticker.to_uppercase();
    let window = params.window.unwrap_or(config::DEFAULT_WINDOW);
    let snapshot = load_snapshot(&state, &ticker, window).await?;

    Ok(Json(json!({
        "ticker": ticker,
        "series": snapshot.series,
        "thresholds": {
            "best_entry": snapshot.levels.best_entry,
            "target": snapshot.levels.target,
            "stop_loss": snapshot.levels.stop_loss,
        },
    })))
}

#[derive(Debug, Deserialize)]
struct SavePositionRequest {
    ticker: String,
    window: Option<usize>,
}

async fn save_position(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SavePositionRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let session = require_session(&state, &headers).await?;

    let ticker = request.ticker.to_uppercase();
    let window = request.window.unwrap_or(config::DEFAULT_WINDOW);
    let snapshot = load_snapshot(&state, &ticker, window).await?;
    let levels = &snapshot.levels;

    let entry = PortfolioEntry {
        owner: session.email,
        ticker,
        price: levels.latest_price,
        entry: levels.best_entry,
        target: levels.target,
        stop_loss: levels.stop_loss,
        recorded_at: Utc::now(),
    };

    state.store.save_entry(&entry).await.map_err(|e| {
        error!(error = %e, "failed to save portfolio entry");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "store failure")
    })?;

    info!(owner = %entry.owner, ticker = %entry.ticker, "portfolio entry saved");
    Ok((StatusCode::CREATED, Json(json!(entry))))
}

async fn list_portfolio(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let session = require_session(&state, &headers).await?;

    let entries = state.store.list_entries(&session.email).await.map_err(|e| {
        error!(owner = %session.email, error = %e, "failed to load portfolio");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "store failure")
    })?;

    Ok(Json(json!(entries)))
}

/// Render the trade report PDF and offer it as a downloadable attachment.
async fn trade_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(ticker): Path<String>,
    Query(params): Query<SignalQuery>,
) -> Result<Response, ApiError> {
    let session = require_session(&state, &headers).await?;

    let ticker = ticker.to_uppercase();
    let window = params.window.unwrap_or(config::DEFAULT_WINDOW);
    let snapshot = load_snapshot(&state, &ticker, window).await?;

    let bytes = report::render_trade_report(&session.email, &ticker, &snapshot.levels)
        .map_err(|e| {
            error!(ticker = %ticker, error = %e, "report generation failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "report generation failed")
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, report::REPORT_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report::REPORT_FILE_NAME),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/signals/{ticker}", get(get_signal))
        .route("/api/signals/{ticker}/chart", get(get_chart))
        .route("/api/portfolio", post(save_position))
        .route("/api/portfolio", get(list_portfolio))
        .route("/api/report/{ticker}", get(trade_report))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let start_time = Arc::new(Instant::now());

    // Store connectivity is fatal at session start; there is no offline mode.
    let store = PgPortfolioStore::connect(&config::get_database_url())
        .await
        .map_err(|e| {
            error!(error = %e, "portfolio store unavailable at startup");
            e
        })?;
    info!("portfolio store connected");

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: metrics.clone(),
        start_time: start_time.clone(),
        store: Arc::new(store),
        provider: Arc::new(YahooFinanceProvider::new()),
        sessions: Arc::new(SessionStore::new()),
        cache: Arc::new(SignalCache::new()),
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
