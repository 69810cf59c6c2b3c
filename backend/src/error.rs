//! Error types for thumbnail rendering

use thiserror::Error;

/// Errors that can abort a render.
///
/// Missing or unreadable font files are deliberately absent: the font
/// resolver recovers from those on its own.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A background color was not six hex digits
    #[error("invalid color {0:?}: expected 6 hex digits like #667eea")]
    InvalidColor(String),

    /// The request body was not a valid JSON payload
    #[error("invalid request body: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// PNG encoding failed
    #[error("PNG encode failed: {0}")]
    Encode(#[from] image::ImageError),

    /// The blocking render task did not complete
    #[error("render task failed: {0}")]
    Task(String),
}
