//! Gallery listing and search handlers

use axum::{
    extract::{Query, State},
    http::Uri,
    response::Html,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;
use crate::views;

/// Query string of GET /search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
}

/// GET / - Gallery of every image
pub async fn home(State(state): State<AppState>) -> Html<String> {
    let images = state.ingestor.list().await;
    Html(views::gallery_page(&images, None))
}

/// GET /search - Gallery filtered by title keyword
///
/// A missing or blank keyword lists every image.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    let keyword = params.keyword.as_deref();
    let images = state.ingestor.search(keyword).await;
    tracing::debug!(keyword = ?keyword, matches = images.len(), "Search");
    Html(views::gallery_page(&images, keyword))
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Nothing at {}", uri.path()))
}
