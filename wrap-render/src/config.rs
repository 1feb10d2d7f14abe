use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wrap_core::constants::DEFAULT_FONT_FAMILY;

use crate::error::RenderError;

/// Raster and font settings. Every field has a default so a partial JSON
/// file is enough.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Resolution of design PNG exports.
    pub png_dpi: f64,
    /// Resolution of the rasterized cutout mask.
    pub cutout_dpi: f64,
    /// Resolution of the raster embedded in PDF exports.
    pub pdf_dpi: f64,
    /// Upper bound on width * height of any raster.
    pub max_pixels: u64,
    pub texture_width: u32,
    pub texture_height: u32,
    pub system_fonts: bool,
    pub font_files: Vec<PathBuf>,
    /// Family used for generic and unknown font names.
    pub default_font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            png_dpi: 300.0,
            cutout_dpi: 300.0,
            pdf_dpi: 150.0,
            max_pixels: 16384 * 16384,
            texture_width: mug_core::constants::FALLBACK_TEXTURE_WIDTH,
            texture_height: mug_core::constants::FALLBACK_TEXTURE_HEIGHT,
            system_fonts: true,
            font_files: Vec::new(),
            default_font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl RenderConfig {
    pub fn from_json(text: &str) -> Result<Self, RenderError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::info!("loaded render config from {}", path.display());
        Ok(config)
    }
}
