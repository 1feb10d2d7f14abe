use mug_core::Texture;
use wrap_core::constants::OUTLINE_STROKE_ATTRS;

use crate::error::RenderError;
use crate::fonts::FontLibrary;
use crate::raster::rasterize_to_size;

/// Design markup with the outline stroke removed, so the seam line is not
/// baked into the mug surface.
pub fn texture_markup(markup: &str) -> String {
    markup.replacen(OUTLINE_STROKE_ATTRS, r#"stroke="none""#, 1)
}

/// Rasterizes the design over white at the texture size and wraps it for the
/// outer wall. `generation` ties the texture to the template it came from.
pub fn project_texture(
    markup: &str,
    width: u32,
    height: u32,
    generation: u64,
    fonts: &FontLibrary,
    max_pixels: u64,
) -> Result<Texture, RenderError> {
    let raster = rasterize_to_size(
        &texture_markup(markup),
        width,
        height,
        Some([255, 255, 255, 255]),
        fonts,
        max_pixels,
    )?;
    log::debug!("projected {width}x{height} texture for generation {generation}");
    Ok(Texture::new(raster.width, raster.height, raster.rgba, generation)?)
}
