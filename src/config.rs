//! Card pipeline configuration.
//!
//! Resolution order: built-in defaults, then an optional JSON file, then `GREETCARD_*`
//! environment variables. The CLI applies its own flags last.

use std::{path::Path, path::PathBuf, time::Duration};

use anyhow::Context;

use crate::foundation::error::{GreetcardError, GreetcardResult};
use crate::foundation::geometry::GeometrySpec;

/// QR error-correction level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

/// One display font file and the weight it provides.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FontFile {
    /// Path relative to `assets_root`.
    pub path: String,
    pub weight: u16,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Site origin the barcode points back to, e.g. `https://example.org`.
    pub origin: String,
    /// Path segment of the board view.
    pub board_path: String,
    pub assets_root: PathBuf,
    /// Template asset, relative to `assets_root`.
    pub template_path: String,
    pub fonts: Vec<FontFile>,
    pub asset_timeout_ms: u64,
    pub font_timeout_ms: u64,
    pub error_correction: ErrorCorrection,
    pub geometry: GeometrySpec,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:5173".to_string(),
            board_path: "board".to_string(),
            assets_root: PathBuf::from("public"),
            template_path: "birthcard-template.png".to_string(),
            fonts: vec![
                FontFile {
                    path: "fonts/Vazirmatn-Regular.ttf".to_string(),
                    weight: 400,
                },
                FontFile {
                    path: "fonts/Vazirmatn-Bold.ttf".to_string(),
                    weight: 700,
                },
            ],
            asset_timeout_ms: 10_000,
            font_timeout_ms: 3_000,
            error_correction: ErrorCorrection::M,
            geometry: GeometrySpec::CARD,
        }
    }
}

impl CardConfig {
    /// Read a JSON config file; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> GreetcardResult<Self> {
        let f = std::fs::File::open(path)
            .with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(std::io::BufReader::new(f))
            .with_context(|| format!("parse config '{}'", path.display()))?;
        Ok(cfg)
    }

    /// Apply `GREETCARD_ORIGIN`, `GREETCARD_ASSET_TIMEOUT_MS` and `GREETCARD_FONT_TIMEOUT_MS`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(origin) = lookup("GREETCARD_ORIGIN").filter(|v| !v.trim().is_empty()) {
            self.origin = origin;
        }
        if let Some(ms) = lookup("GREETCARD_ASSET_TIMEOUT_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&n| n > 0)
        {
            self.asset_timeout_ms = ms;
        }
        if let Some(ms) = lookup("GREETCARD_FONT_TIMEOUT_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&n| n > 0)
        {
            self.font_timeout_ms = ms;
        }
        self
    }

    pub fn validate(&self) -> GreetcardResult<()> {
        if self.origin.trim().is_empty() {
            return Err(GreetcardError::validation("origin must be non-empty"));
        }
        if self.board_path.trim_matches('/').is_empty() {
            return Err(GreetcardError::validation("board_path must be non-empty"));
        }
        if self.template_path.trim().is_empty() {
            return Err(GreetcardError::validation("template_path must be non-empty"));
        }
        if self.asset_timeout_ms == 0 || self.font_timeout_ms == 0 {
            return Err(GreetcardError::validation("timeouts must be > 0"));
        }
        self.geometry.validate()
    }

    pub fn asset_timeout(&self) -> Duration {
        Duration::from_millis(self.asset_timeout_ms)
    }

    pub fn font_timeout(&self) -> Duration {
        Duration::from_millis(self.font_timeout_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
