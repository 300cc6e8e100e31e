use std::{any::Any, net::SocketAddr, time::Duration};

use axum::{
    extract::State,
    http::{Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use time::OffsetDateTime;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{field, Span};

use crate::{error::AppError, state::AppState, thesis, users};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(users::router())
        .merge(thesis::router())
        .route("/health", get(health))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| request_span(req.method(), req.uri()))
                .on_response(|res: &Response<_>, latency: Duration, span: &Span| {
                    record_response(span, res.status(), latency)
                }),
        )
}

fn request_span(method: &Method, uri: &Uri) -> Span {
    tracing::info_span!(
        "http_request",
        %method,
        path = uri.path(),
        status = field::Empty,
        latency_ms = field::Empty,
    )
}

fn record_response(span: &Span, status: StatusCode, latency: Duration) {
    let latency_ms = latency.as_millis() as u64;
    span.record("status", status.as_u16());
    span.record("latency_ms", latency_ms);
    match status.as_u16() {
        500.. => tracing::error!(%status, latency_ms, "request failed"),
        400..=499 => tracing::debug!(%status, latency_ms, "request rejected"),
        _ => tracing::info!(%status, latency_ms, "request served"),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: OffsetDateTime::now_utc(),
        started_at: state.started_at,
    })
}

async fn not_found() -> AppError {
    AppError::NotFound("Rute tidak ditemukan".into())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Terjadi kesalahan pada server" })),
    )
        .into_response()
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let port = std::env::var("APP_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "8080".into());
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        port
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
