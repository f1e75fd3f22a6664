//! HTTP routes

use std::sync::Arc;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use stencil_core::{generate_pdf, generate_preview};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::form::{RawForm, StencilRequest};

pub fn router(config: Arc<ServerConfig>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/generate-stencil", post(generate_stencil))
        .route("/generate-stencil/", post(generate_stencil))
        .route("/preview-stencil", post(preview_stencil))
        .route("/preview-stencil/", post(preview_stencil))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(config.cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(config)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn read_request(
    config: &ServerConfig,
    multipart: Multipart,
) -> Result<StencilRequest, ApiError> {
    RawForm::read(multipart)
        .await?
        .into_request(config.strict_filters)
}

async fn generate_stencil(
    State(config): State<Arc<ServerConfig>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let request = read_request(&config, multipart).await?;
    let rendered = generate_pdf(
        request.bytes,
        request.content_type,
        request.options,
        config.limits,
    )
    .await?;

    info!(
        pages = rendered.stats.pages,
        cols = rendered.stats.cols,
        rows = rendered.stats.rows,
        bytes = rendered.bytes.len(),
        "generated {}",
        rendered.filename
    );

    let disposition = format!("attachment; filename=\"{}\"", rendered.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        rendered.bytes,
    )
        .into_response())
}

async fn preview_stencil(
    State(config): State<Arc<ServerConfig>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let request = read_request(&config, multipart).await?;
    let jpeg = generate_preview(
        request.bytes,
        request.content_type,
        request.options,
        config.limits,
    )
    .await?;

    info!(bytes = jpeg.len(), "generated preview");

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], jpeg).into_response())
}
