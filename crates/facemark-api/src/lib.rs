//! Facemark API Library
//!
//! HTTP surface for photo validation, photo enrollment and attendance submission,
//! plus authentication, telemetry and application setup.

mod api_doc;
mod handlers;
mod middleware;
mod telemetry;

pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

pub use api_doc::ApiDoc;
pub use error::{ErrorResponse, HttpAppError};
pub use telemetry::init_telemetry;
