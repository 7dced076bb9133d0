//! Image submission handlers
//!
//! Handles GET and POST /add-image-form.

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use gallery_core::SubmitOutcome;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;
use crate::views::{self, FormNotice};

/// Advisory shown when the URL is not an image we can read.
pub const UNSUPPORTED_IMAGE_MESSAGE: &str =
    "We could not get the dominant color of that image. Please try a different URL.";

/// Form-encoded body of POST /add-image-form
///
/// Missing fields are read as empty strings and rejected by validation.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

/// GET /add-image-form - Blank submission form
pub async fn show_form() -> Html<String> {
    Html(views::form_page(&FormNotice::None))
}

/// POST /add-image-form - Add an image to the gallery
///
/// - Created: 201 with the form and a success notice
/// - Duplicate URL: 200 with the form and a duplicate notice
/// - Unsupported image: 200 with a plain-text advisory
/// - Invalid title or URL, or an unreadable body: 400 plain text
/// - Anything else: 500 apology page
pub async fn submit_form(
    State(state): State<AppState>,
    form: Result<Form<SubmitForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(form) = form.map_err(|e| AppError::bad_request(e.body_text()))?;
    let outcome = state.ingestor.submit(&form.title, &form.url).await?;

    let response = match outcome {
        SubmitOutcome::Created(record) => {
            tracing::info!(id = record.id, title = %record.title, "Image added");
            (
                StatusCode::CREATED,
                Html(views::form_page(&FormNotice::Posted)),
            )
                .into_response()
        }
        SubmitOutcome::Duplicate { url } => {
            Html(views::form_page(&FormNotice::Repeated(url))).into_response()
        }
        SubmitOutcome::UnsupportedImage { url, reason } => {
            tracing::info!(url = %url, reason = %reason, "Unsupported image submitted");
            UNSUPPORTED_IMAGE_MESSAGE.into_response()
        }
    };

    Ok(response)
}
