use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::render::color::parse_hex_color;
use crate::render::Variant;

pub const DEFAULT_KEYWORD: &str = "키워드 없음";
pub const DEFAULT_TITLE: &str = "제목 없음";
pub const DEFAULT_BG_COLOR1: &str = "#667eea";
pub const DEFAULT_BG_COLOR2: &str = "#764ba2";

/// JSON body accepted by the thumbnail endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThumbnailPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub bg_color1: Option<String>,
    #[serde(default)]
    pub bg_color2: Option<String>,
}

/// Validated input of one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRequest {
    pub text_primary: String,
    pub text_secondary: Option<String>,
    pub color_start: Rgb<u8>,
    pub color_end: Rgb<u8>,
}

impl ThumbnailPayload {
    /// Apply defaults, parse colors, and pick the text fields `variant` uses.
    pub fn into_request(self, variant: Variant) -> Result<ThumbnailRequest, RenderError> {
        let color_start = parse_hex_color(self.bg_color1.as_deref().unwrap_or(DEFAULT_BG_COLOR1))?;
        let color_end = parse_hex_color(self.bg_color2.as_deref().unwrap_or(DEFAULT_BG_COLOR2))?;

        let (text_primary, text_secondary) = match variant {
            Variant::FocusKeyword => (
                self.keyword.unwrap_or_else(|| DEFAULT_KEYWORD.to_string()),
                None,
            ),
            Variant::TitleCard => (
                self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                self.keyword.filter(|k| !k.trim().is_empty()),
            ),
        };

        Ok(ThumbnailRequest {
            text_primary,
            text_secondary,
            color_start,
            color_end,
        })
    }
}

/// Body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
