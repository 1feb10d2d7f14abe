use tiny_skia::{Color, Pixmap, Transform};
use wrap_core::encode_rgba_to_png_bytes;

use crate::error::RenderError;
use crate::fonts::FontLibrary;

/// usvg reports document sizes in CSS pixels.
const CSS_PX_PER_INCH: f64 = 96.0;
const MM_PER_INCH: f64 = 25.4;

/// Straight-alpha RGBA image, rows top to bottom.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Raster {
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.rgba.chunks_exact(4)
    }

    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        Ok(encode_rgba_to_png_bytes(self.width, self.height, &self.rgba)?)
    }
}

/// Pixel count for a length at a print resolution, never below one.
pub fn pixels_for_mm(mm: f64, dpi: f64) -> u32 {
    (mm * dpi / MM_PER_INCH).round().max(1.0) as u32
}

pub fn parse(svg: &str, fonts: &FontLibrary) -> Result<usvg::Tree, RenderError> {
    Ok(usvg::Tree::from_str(svg, &fonts.usvg_options())?)
}

/// Physical size of a parsed document in millimeters.
pub fn size_mm(tree: &usvg::Tree) -> (f64, f64) {
    let size = tree.size();
    let k = MM_PER_INCH / CSS_PX_PER_INCH;
    (size.width() as f64 * k, size.height() as f64 * k)
}

/// Renders `svg` at `dpi`, optionally over an opaque background colour.
pub fn rasterize(
    svg: &str,
    dpi: f64,
    background: Option<[u8; 4]>,
    fonts: &FontLibrary,
    max_pixels: u64,
) -> Result<Raster, RenderError> {
    let tree = parse(svg, fonts)?;
    let (w_mm, h_mm) = size_mm(&tree);
    render_tree(
        &tree,
        pixels_for_mm(w_mm, dpi),
        pixels_for_mm(h_mm, dpi),
        background,
        max_pixels,
    )
}

/// Renders `svg` stretched to exactly `width` x `height` pixels.
pub fn rasterize_to_size(
    svg: &str,
    width: u32,
    height: u32,
    background: Option<[u8; 4]>,
    fonts: &FontLibrary,
    max_pixels: u64,
) -> Result<Raster, RenderError> {
    let tree = parse(svg, fonts)?;
    render_tree(&tree, width, height, background, max_pixels)
}

fn render_tree(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
    background: Option<[u8; 4]>,
    max_pixels: u64,
) -> Result<Raster, RenderError> {
    if width as u64 * height as u64 > max_pixels {
        return Err(RenderError::RasterTooLarge {
            width,
            height,
            max: max_pixels,
        });
    }
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAlloc { width, height })?;
    if let Some([r, g, b, a]) = background {
        pixmap.fill(Color::from_rgba8(r, g, b, a));
    }
    let size = tree.size();
    let transform = Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    let mut pm = pixmap.as_mut();
    resvg::render(tree, transform, &mut pm);
    log::debug!("rasterized {width}x{height} px");

    let rgba = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Ok(Raster {
        width,
        height,
        rgba,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="25.4mm" height="12.7mm" viewBox="0 0 25.4 12.7"><rect x="0" y="0" width="12.7" height="12.7" fill="#ff0000"/></svg>"##;

    #[test]
    fn pixel_size_follows_dpi() {
        assert_eq!(pixels_for_mm(25.4, 300.0), 300);
        assert_eq!(pixels_for_mm(257.61, 300.0), 3043);
        assert_eq!(pixels_for_mm(0.0, 300.0), 1);
    }

    #[test]
    fn renders_at_requested_resolution() {
        let fonts = FontLibrary::new("Roboto");
        let r = rasterize(SQUARE, 100.0, None, &fonts, u64::MAX).unwrap();
        assert_eq!((r.width, r.height), (100, 50));
        // left half red, right half transparent
        let left = &r.rgba[(25 * 100 + 10) * 4..][..4];
        let right = &r.rgba[(25 * 100 + 90) * 4..][..4];
        assert_eq!(left, [255, 0, 0, 255]);
        assert_eq!(right[3], 0);
    }

    #[test]
    fn background_fills_uncovered_pixels() {
        let fonts = FontLibrary::new("Roboto");
        let r = rasterize_to_size(SQUARE, 40, 20, Some([255; 4]), &fonts, u64::MAX).unwrap();
        assert_eq!(&r.rgba[(10 * 40 + 35) * 4..][..4], [255, 255, 255, 255]);
    }

    #[test]
    fn oversized_raster_is_refused() {
        let fonts = FontLibrary::new("Roboto");
        assert!(matches!(
            rasterize(SQUARE, 300.0, None, &fonts, 1000),
            Err(RenderError::RasterTooLarge { .. })
        ));
    }

    #[test]
    fn png_bytes_have_signature() {
        let r = Raster {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
        };
        assert_eq!(&r.to_png().unwrap()[..4], b"\x89PNG");
    }
}
