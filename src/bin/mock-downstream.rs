//! Development stand-in for the user and template services.
//!
//! Serves `/api/v1/users/{user_id}/` and `/api/v1/templates/{code}/`. The
//! `POST /admin/mode/{mode}` endpoint switches between healthy, failing and slow
//! responses so breaker behavior can be observed with `service-cli watch`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::{Parser, ValueEnum};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use service_client::config::schema::ObservabilityConfig;
use service_client::observability::logging;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[repr(u8)]
enum Mode {
    Healthy = 0,
    Failing = 1,
    Slow = 2,
}

impl Mode {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Mode::Failing,
            2 => Mode::Slow,
            _ => Mode::Healthy,
        }
    }
}

#[derive(Parser)]
#[command(name = "mock-downstream")]
struct Args {
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    listen: SocketAddr,

    #[arg(short, long, value_enum, default_value_t = Mode::Healthy)]
    mode: Mode,

    /// Delay applied in slow mode, in seconds.
    #[arg(long, default_value_t = 10)]
    slow_secs: u64,
}

#[derive(Clone)]
struct AppState {
    mode: Arc<AtomicU8>,
    slow: Duration,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init_logging(&ObservabilityConfig::default());

    let state = AppState {
        mode: Arc::new(AtomicU8::new(args.mode as u8)),
        slow: Duration::from_secs(args.slow_secs),
    };

    let app = Router::new()
        .route("/api/v1/users/{user_id}/", get(user))
        .route("/api/v1/templates/{code}/", get(template))
        .route("/admin/mode/{mode}", post(set_mode))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    tracing::info!(address = %args.listen, mode = ?args.mode, "Mock downstream listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn user(State(state): State<AppState>, Path(user_id): Path<String>) -> Response {
    if let Some(failure) = degrade(&state).await {
        return failure;
    }
    Json(json!({
        "user_id": user_id,
        "email": format!("{}@example.com", user_id),
        "push_enabled": true,
    }))
    .into_response()
}

async fn template(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    if let Some(failure) = degrade(&state).await {
        return failure;
    }
    Json(json!({
        "template_code": code,
        "subject": "Hello {{name}}",
        "body": "Welcome aboard, {{name}}!",
    }))
    .into_response()
}

async fn set_mode(State(state): State<AppState>, Path(mode): Path<String>) -> Response {
    match Mode::from_str(&mode, true) {
        Ok(mode) => {
            state.mode.store(mode as u8, Ordering::SeqCst);
            tracing::info!(mode = ?mode, "Mode changed");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => (StatusCode::BAD_REQUEST, e).into_response(),
    }
}

async fn degrade(state: &AppState) -> Option<Response> {
    match Mode::from_u8(state.mode.load(Ordering::SeqCst)) {
        Mode::Healthy => None,
        Mode::Failing => Some((StatusCode::SERVICE_UNAVAILABLE, "unavailable").into_response()),
        Mode::Slow => {
            tokio::time::sleep(state.slow).await;
            None
        }
    }
}
