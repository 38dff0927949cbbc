//! Error types
//!
//! Typed errors for the library surface. Loading helpers and the CLI wrap these
//! in `anyhow::Error` with file-path context.

use thiserror::Error;

use crate::lifecycle::types::MaterialCategory;

/// Errors raised while building or validating the lifecycle data tables.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid pattern in rule '{label}': {source}")]
    InvalidPattern {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid duration for '{key}': {reason}")]
    InvalidDuration { key: String, reason: String },

    #[error("no default duration for category '{0}'")]
    MissingCategoryDefault(MaterialCategory),

    #[error("failed to parse lifecycle data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read lifecycle data: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by lifecycle arithmetic.
#[derive(Debug, Error, PartialEq)]
pub enum LifecycleError {
    #[error("building life must be greater than zero")]
    InvalidBuildingLife,
}

/// Errors raised while constructing a fact builder.
#[derive(Debug, Error)]
pub enum FactError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Errors raised by drawing backends.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("not a base64 image data URI")]
    InvalidDataUri,

    #[error("failed to decode base64 image payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("no page has been started")]
    NoPage,

    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
}
