//! Relay HTTP server
//!
//! Exposes a [`Relay`] at `POST /api/generate` with the body
//! `{"payload": {...}}`. Success returns the downstream JSON body untouched;
//! failures return `{"message": "..."}` with the status from
//! [`RelayError::status_code`].

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::routing::{any, get};
use axum::{Json, Router};
use catprompt_relay::{ErrorBody, GeminiRelay, Relay, RelayEnvelope, RelayError, RelayRequest};
use catprompt_utils::redaction::redact_error_message;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::Config;

/// Path the relay is served under.
pub const RELAY_PATH: &str = "/api/generate";

#[derive(Clone)]
struct AppState {
    relay: Arc<dyn Relay>,
}

/// Build the relay router around any [`Relay`].
pub fn router(relay: Arc<dyn Relay>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(RELAY_PATH, any(generate))
        .with_state(AppState { relay })
}

/// Serve the Gemini relay until Ctrl-C.
///
/// # Errors
///
/// Fails if the relay cannot be built or the listener cannot bind.
pub async fn run_server(config: &Config, listen: SocketAddr) -> anyhow::Result<()> {
    let relay = GeminiRelay::new_from_config(config).context("failed to build relay")?;
    if !relay.has_credential() {
        warn!(
            api_key_env = config.api_key_env(),
            "No API key configured; every request will fail with 500"
        );
    }
    let app = router(Arc::new(relay));

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to bind relay listener on {listen}"))?;
    let local = listener.local_addr().unwrap_or(listen);
    info!(%local, model = config.model(), "Relay listening");
    println!("catprompt relay listening on http://{local}{RELAY_PATH}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("relay server terminated with error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutting down relay");
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn generate(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<ErrorBody>)> {
    // An unreadable body is treated as a missing payload; the relay decides
    // which check fails first.
    let payload = serde_json::from_slice::<RelayEnvelope>(&body)
        .ok()
        .and_then(|envelope| envelope.payload);

    state
        .relay
        .forward(RelayRequest::new(method, payload))
        .await
        .map(Json)
        .map_err(|err| error_response(&err))
}

fn error_response(err: &RelayError) -> (StatusCode, Json<ErrorBody>) {
    match err {
        RelayError::Internal(detail) => {
            error!(detail = %redact_error_message(detail), "Relay request failed");
        }
        other => warn!(status = other.status_code(), error = %other, "Relay request rejected"),
    }
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorBody::from(err)))
}
