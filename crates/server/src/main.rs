use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use form_api::{handle_request, status_for, ResponseBody};
use shared::error::{ApiError, ErrorCode};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings()?;
    let state = AppState::from_settings(&settings)?;
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(
        %addr,
        transport = %settings.mail_transport,
        recipients = settings.mail_to.len(),
        "form relay listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", any(submit))
        .route("/submit", any(submit))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(middleware::from_fn_with_state(state.clone(), with_cors))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn submit(State(state): State<Arc<AppState>>, method: Method, body: Bytes) -> Response {
    let outcome = handle_request(&state.form, &method, &body).await;
    match outcome.body {
        ResponseBody::Empty => outcome.status.into_response(),
        ResponseBody::Text(text) => (outcome.status, text).into_response(),
        ResponseBody::Json(value) => (outcome.status, Json(value)).into_response(),
    }
}

/// Outermost layer, so responses produced by the body limit carry the CORS
/// headers and the JSON error envelope too.
async fn with_cors(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        let code = ErrorCode::PayloadTooLarge;
        let body = ApiError::new(code, "Request body too large");
        response = (status_for(code), Json(body)).into_response();
    }
    apply_cors(response.headers_mut(), &state.allowed_origin);
    response
}

fn apply_cors(headers: &mut HeaderMap, origin: &HeaderValue) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
