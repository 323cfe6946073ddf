//! Page Routes
//!
//! Each request mounts a fresh page controller, waits up to the render
//! deadline for its sections, and renders whatever state they are in.
//! Sections still loading at the deadline render as loading and the page
//! asks the browser to reload.

use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::Html,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::api::state::AppState;
use crate::pages::{DetailPage, ListPage};
use crate::views;

/// GET /
pub async fn list_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let page = ListPage::mount(Arc::clone(&state.queries));
    wait_for_render(page.settled(), state.config.render_deadline, "list").await;

    Html(views::render_list_page(page.snapshot()))
}

/// GET /proposal/:id
pub async fn proposal_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Html<String> {
    let page = DetailPage::mount(Arc::clone(&state.queries), Some(id.as_str()));
    wait_for_render(page.settled(), state.config.render_deadline, "proposal").await;

    Html(views::render_detail_page(page.snapshot()))
}

/// Fallback for unknown paths
pub async fn not_found(uri: Uri) -> (StatusCode, Html<String>) {
    tracing::debug!(path = %uri.path(), "No route");
    (StatusCode::NOT_FOUND, Html(views::render_not_found(uri.path())))
}

async fn wait_for_render(settled: impl Future<Output = ()>, deadline: Duration, page: &str) {
    if tokio::time::timeout(deadline, settled).await.is_err() {
        tracing::debug!(page, ?deadline, "Rendering before all sections settled");
    }
}
