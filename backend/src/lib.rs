pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod render;

pub use error::RenderError;
pub use models::{ThumbnailPayload, ThumbnailRequest};
pub use render::{render, FontResolver, RenderContext, RenderedImage, Variant};
