use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::RenderError;
use crate::models::{ErrorBody, ThumbnailPayload};
use crate::render::{self, RenderContext, Variant};

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<RenderContext>,
}

impl AppState {
    pub fn new(ctx: RenderContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }
}

/// Any failure on the thumbnail routes; always answered as 500 + JSON.
pub struct ApiError(RenderError);

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!("thumbnail request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new(self.0.to_string())),
        )
            .into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/thumbnail",
            post(focus_thumbnail_handler).options(preflight_handler),
        )
        .route(
            "/api/thumbnail/card",
            post(card_thumbnail_handler).options(preflight_handler),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn focus_thumbnail_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    render_png_response(state, Variant::FocusKeyword, body).await
}

pub async fn card_thumbnail_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    render_png_response(state, Variant::TitleCard, body).await
}

pub async fn preflight_handler() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
        .into_response()
}

async fn render_png_response(
    state: AppState,
    variant: Variant,
    body: Bytes,
) -> Result<Response, ApiError> {
    // parsed by hand so malformed bodies take the same 500 path as render errors
    let payload: ThumbnailPayload = serde_json::from_slice(&body).map_err(RenderError::from)?;
    let request = payload.into_request(variant)?;

    let ctx = state.ctx.clone();
    let image = tokio::task::spawn_blocking(move || render::render(variant, &request, &ctx))
        .await
        .map_err(|e| RenderError::Task(e.to_string()))??;

    info!(
        variant = variant.name(),
        bytes = image.bytes.len(),
        "thumbnail rendered"
    );

    let len = image.bytes.len();
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/png")),
            (header::CONTENT_LENGTH, HeaderValue::from(len)),
        ],
        image.into_bytes(),
    )
        .into_response())
}
