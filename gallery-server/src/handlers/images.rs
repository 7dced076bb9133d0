//! Image deletion handler

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// POST /images/{id}/delete - Remove an image and go back to the gallery
///
/// Deleting an id that does not exist still redirects.
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Redirect, AppError> {
    let removed = state.ingestor.remove(id).await?;
    tracing::info!(id, removed, "Delete requested");
    Ok(Redirect::to("/"))
}
