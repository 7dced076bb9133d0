//! HTTP request handlers
//!
//! This module contains all the request handlers for the gallery endpoints.

pub mod form;
pub mod gallery;
pub mod health;
pub mod images;

pub use crate::state::AppState;
pub use form::{show_form, submit_form, SubmitForm};
pub use gallery::{home, not_found, search, SearchParams};
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use images::delete_image;
