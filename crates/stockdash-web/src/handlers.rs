//! HTTP request handlers: API endpoints and frontend serving.

use axum::body::Body;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Json, Response};
use rust_embed::Embed;
use serde::Serialize;

use stockdash_core::views::{SIDEBAR_LABEL, SIDEBAR_TITLE, ViewInfo, view_list};
use stockdash_core::{ViewPage, ViewParams};

use crate::error::{ApiError, ErrorBody};
use crate::state::{AppState, SharedSession};

// ============================================================
// Embedded frontend assets
// ============================================================

#[derive(Embed)]
#[folder = "frontend/dist"]
struct FrontendAssets;

fn lock_poisoned() -> ApiError {
    ApiError::Internal("session lock poisoned".to_string())
}

// ============================================================
// Health
// ============================================================

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
pub(crate) async fn handle_health() -> &'static str {
    "ok"
}

// ============================================================
// Info
// ============================================================

/// Dashboard metadata for the frontend shell.
#[derive(Serialize, utoipa::ToSchema)]
pub(crate) struct AppInfo {
    version: String,
    /// Sidebar heading.
    title: String,
    /// Label of the view selector.
    selector_label: String,
    /// Table source in use (credentials redacted).
    source: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/info",
    responses(
        (status = 200, description = "Dashboard metadata", body = AppInfo)
    )
)]
pub(crate) async fn handle_info(State(ctx): AppState) -> Json<AppInfo> {
    Json(AppInfo {
        version: stockdash_core::VERSION.to_string(),
        title: SIDEBAR_TITLE.to_string(),
        selector_label: SIDEBAR_LABEL.to_string(),
        source: ctx.source.to_string(),
    })
}

// ============================================================
// Views
// ============================================================

#[utoipa::path(
    get,
    path = "/api/v1/views",
    responses(
        (status = 200, description = "Available views in sidebar order", body = Vec<ViewInfo>)
    )
)]
pub(crate) async fn handle_views() -> Json<Vec<ViewInfo>> {
    Json(view_list())
}

#[utoipa::path(
    get,
    path = "/api/v1/views/{view}",
    params(
        ("view" = String, Path, description = "View key (e.g. `sector-return`) or sidebar label"),
        ViewParams,
    ),
    responses(
        (status = 200, description = "Rendered view: controls and widgets", body = ViewPage),
        (status = 400, description = "Invalid control values or unknown ticker", body = ErrorBody),
        (status = 404, description = "Unknown view", body = ErrorBody),
        (status = 500, description = "Missing table or column", body = ErrorBody),
        (status = 503, description = "Table store unreachable", body = ErrorBody)
    )
)]
pub(crate) async fn handle_view(
    State(ctx): AppState,
    Path(view): Path<String>,
    params: Result<Query<ViewParams>, QueryRejection>,
) -> Result<Json<ViewPage>, ApiError> {
    let Query(params) = params?;
    let session = ctx.session;
    // The store client is synchronous.
    let page = tokio::task::spawn_blocking(move || render_view(&session, &view, &params)).await??;
    Ok(Json(page))
}

fn render_view(
    session: &SharedSession,
    view: &str,
    params: &ViewParams,
) -> Result<ViewPage, ApiError> {
    let mut session = session.lock().map_err(|_| lock_poisoned())?;
    session
        .render(view, params)?
        .ok_or_else(|| ApiError::NotFound(format!("unknown view {view:?}")))
}

// ============================================================
// Frontend static files
// ============================================================

pub(crate) async fn serve_frontend(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    if let Some(file) = FrontendAssets::get(path) {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        return (
            [(header::CONTENT_TYPE, mime.as_ref().to_owned())],
            Body::from(file.data.into_owned()),
        )
            .into_response();
    }

    // SPA fallback: serve index.html for non-file paths
    if let Some(index) = FrontendAssets::get("index.html") {
        return (
            [(header::CONTENT_TYPE, "text/html".to_owned())],
            Body::from(index.data.into_owned()),
        )
            .into_response();
    }

    (StatusCode::NOT_FOUND, "not found").into_response()
}
