//! Custom extractors for Axum handlers.
//!
//! Every rejection goes through [`AppError`](crate::errors::AppError), so a
//! malformed body looks like any other API error.

pub mod app_json;
pub mod uuid_path;
pub mod validated_json;

pub use app_json::AppJson;
pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
