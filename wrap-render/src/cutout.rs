//! Cutout derivation: a black/transparent mask of everything printed on the
//! sheet, or just the sheet outline as a vector path.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use wrap_core::constants::{SVG_NS, XLINK_NS};

use crate::error::RenderError;
use crate::fonts::FontLibrary;
use crate::raster::{Raster, rasterize};

/// Channels above this on all of R, G and B count as paper white.
pub const WHITE_THRESHOLD: u8 = 245;
pub const CLIP_PATH_ID: &str = "mugClipPath";
const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Turns near-white pixels fully transparent and every other pixel opaque
/// black.
pub fn threshold_mask(raster: &mut Raster) {
    for px in raster.rgba.chunks_exact_mut(4) {
        let white = px[..3].iter().all(|&c| c > WHITE_THRESHOLD);
        let value: [u8; 4] = if white { [0, 0, 0, 0] } else { [0, 0, 0, 255] };
        px.copy_from_slice(&value);
    }
}

/// Renders the design over white at `dpi` and thresholds it.
pub fn cutout_mask(
    markup: &str,
    dpi: f64,
    fonts: &FontLibrary,
    max_pixels: u64,
) -> Result<Raster, RenderError> {
    let mut raster = rasterize(markup, dpi, Some(WHITE), fonts, max_pixels)?;
    threshold_mask(&mut raster);
    Ok(raster)
}

fn svg_open_tag(markup: &str) -> Result<&str, RenderError> {
    let re = Regex::new(r"<svg\b[^>]*>")?;
    re.find(markup)
        .map(|m| m.as_str())
        .ok_or(RenderError::MissingSize("svg"))
}

fn attr(tag: &str, name: &str) -> Result<Option<String>, RenderError> {
    let re = Regex::new(&format!(r#"\s{}="([^"]*)""#, regex::escape(name)))?;
    Ok(re.captures(tag).map(|c| c[1].to_string()))
}

/// `d` of the first path in the document: the sheet outline.
pub fn outline_path_data(markup: &str) -> Result<String, RenderError> {
    let re = Regex::new(r#"<path[^>]+\bd="([^"]+)""#)?;
    re.captures(markup)
        .map(|c| c[1].to_string())
        .ok_or(RenderError::MissingOutline)
}

/// Width and height of the root element in millimeters.
pub fn document_size_mm(markup: &str) -> Result<(f64, f64), RenderError> {
    let tag = svg_open_tag(markup)?;
    let read = |name: &'static str| -> Result<f64, RenderError> {
        attr(tag, name)?
            .and_then(|v| v.trim().trim_end_matches("mm").parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or(RenderError::MissingSize(name))
    };
    Ok((read("width")?, read("height")?))
}

/// The sheet outline alone, filled black on white, with no raster content.
pub fn exterior_only_svg(markup: &str) -> Result<String, RenderError> {
    let d = outline_path_data(markup)?;
    let tag = svg_open_tag(markup)?;
    let width = attr(tag, "width")?.ok_or(RenderError::MissingSize("width"))?;
    let height = attr(tag, "height")?.ok_or(RenderError::MissingSize("height"))?;
    let view_box = match attr(tag, "viewBox")? {
        Some(vb) => vb,
        None => {
            let (w, h) = document_size_mm(markup)?;
            format!("0 0 {w} {h}")
        }
    };
    Ok(format!(
        "<svg width=\"{width}\" height=\"{height}\" viewBox=\"{view_box}\" xmlns=\"{SVG_NS}\" style=\"background-color: white;\"><path d=\"{d}\" fill=\"black\" stroke=\"none\"/></svg>"
    ))
}

/// Vector wrapper around a mask PNG, clipped to the sheet outline.
pub fn mask_svg(mask_png: &[u8], outline: &str, width_mm: f64, height_mm: f64) -> String {
    let href = format!("data:image/png;base64,{}", STANDARD.encode(mask_png));
    format!(
        "<svg width=\"{w:.2}mm\" height=\"{h:.2}mm\" viewBox=\"0 0 {width_mm} {height_mm}\" xmlns=\"{SVG_NS}\" xmlns:xlink=\"{XLINK_NS}\"><defs><clipPath id=\"{CLIP_PATH_ID}\"><path d=\"{outline}\"/></clipPath></defs><image href=\"{href}\" x=\"0\" y=\"0\" width=\"{width_mm}\" height=\"{height_mm}\" clip-path=\"url(#{CLIP_PATH_ID})\"/></svg>",
        w = width_mm,
        h = height_mm,
    )
}
