//! Gallery Server Library - web front end for the image catalogue
//!
//! This library exposes the server components for use in integration tests.
//! The main binary uses these same components.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod views;

pub use config::Config;
pub use error::AppError;
pub use routes::{create_router, create_router_with_config};
pub use state::AppState;
