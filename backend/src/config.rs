use std::path::PathBuf;

use tracing::warn;

use crate::render::DEFAULT_WATERMARK;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_FONT_DIR: &str = "/var/task/fonts";
pub const DEFAULT_FONT_FALLBACK_DIR: &str = "fonts";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Searched in order; the built-in face follows the last one.
    pub font_dirs: Vec<PathBuf>,
    pub watermark: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("THUMBGEN_PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                warn!("THUMBGEN_PORT={:?} is not a valid port, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let font_dirs = vec![
            PathBuf::from(get("THUMBGEN_FONT_DIR").unwrap_or_else(|| DEFAULT_FONT_DIR.to_string())),
            PathBuf::from(
                get("THUMBGEN_FONT_FALLBACK_DIR")
                    .unwrap_or_else(|| DEFAULT_FONT_FALLBACK_DIR.to_string()),
            ),
        ];

        Self {
            host: get("THUMBGEN_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            font_dirs,
            watermark: get("THUMBGEN_WATERMARK").unwrap_or_else(|| DEFAULT_WATERMARK.to_string()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
