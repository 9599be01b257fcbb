//! Webhook HTTP server: `POST <webhook path>` receives updates, `GET /health` answers `ok`.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use capbot_core::Update;
use handlers::{dispatch, RequestContext};
use tracing::{debug, error, info, instrument, warn};

pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Clone)]
pub struct AppState {
    pub ctx: RequestContext,
    /// When set, requests must carry it in [`SECRET_HEADER`].
    pub webhook_secret: Option<String>,
}

pub fn router(state: AppState, webhook_path: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            webhook_path,
            post(handle_webhook).fallback(method_not_allowed),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Only POST allowed").into_response()
}

/// Processes the update to completion before answering, so Telegram retries only on 5xx.
///
/// Remote and storage failures are logged and still acknowledged with 200; anything else,
/// including a panic in the dispatch task, is a bare 500.
#[instrument(name = "capbot.webhook", skip_all, fields(update_id = tracing::field::Empty))]
async fn handle_webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    if let Some(secret) = &state.webhook_secret {
        let provided = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if provided != Some(secret.as_str()) {
            warn!("Webhook secret token mismatch");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Unparsable webhook body");
            return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
        }
    };
    tracing::Span::current().record("update_id", update.id.0);
    debug!("step: webhook update parsed");

    let ctx = state.ctx.clone();
    let task = tokio::spawn(async move { dispatch(&ctx, &update).await });

    match task.await {
        Ok(Ok(())) => {
            info!("step: update handled");
            (StatusCode::OK, "OK").into_response()
        }
        Ok(Err(e)) if e.is_external() => {
            warn!(error = %e, "Update handled with external failure");
            (StatusCode::OK, "OK").into_response()
        }
        Ok(Err(e)) => {
            error!(error = %e, "Update handling failed");
            internal_error()
        }
        Err(e) => {
            error!(error = %e, "Dispatch task panicked");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
