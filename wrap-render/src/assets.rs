use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use wrap_core::{BackgroundSpec, Design, ImageSize, encode_rgba_to_png_bytes};

use crate::error::RenderError;

/// Colour distance below which a pixel counts as background.
pub const BACKGROUND_TOLERANCE: f64 = 30.0;
const SVG_MIME: &str = "image/svg+xml";

#[derive(Clone, Debug, PartialEq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    pub fn is_svg(&self) -> bool {
        self.mime.eq_ignore_ascii_case(SVG_MIME)
    }
}

pub fn decode_data_uri(uri: &str) -> Result<DataUri, RenderError> {
    let invalid = || RenderError::InvalidDataUri(uri.chars().take(48).collect());
    let rest = uri.trim().strip_prefix("data:").ok_or_else(invalid)?;
    let (meta, payload) = rest.split_once(',').ok_or_else(invalid)?;
    let (mime, base64) = match meta.strip_suffix(";base64") {
        Some(mime) => (mime, true),
        None => (meta, false),
    };
    let mime = mime.split(';').next().unwrap_or_default().to_string();
    let bytes = if base64 {
        STANDARD.decode(payload.trim())?
    } else {
        payload.as_bytes().to_vec()
    };
    Ok(DataUri { mime, bytes })
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Native size of an embedded image: pixels for rasters, CSS pixels for SVG.
pub fn probe_size(uri: &str) -> Result<ImageSize, RenderError> {
    let data = decode_data_uri(uri)?;
    if data.is_svg() {
        let tree = usvg::Tree::from_data(&data.bytes, &usvg::Options::default())?;
        let size = tree.size();
        return Ok(ImageSize {
            width: size.width() as f64,
            height: size.height() as f64,
        });
    }
    let img = image::load_from_memory(&data.bytes)?;
    Ok(ImageSize {
        width: img.width() as f64,
        height: img.height() as f64,
    })
}

/// Fills in the background image's native size when it is missing. Failures
/// are logged and leave the design unchanged.
pub fn probe_background(design: &mut Design) {
    let BackgroundSpec::Image(img) = &mut design.background else {
        return;
    };
    if img.natural_size.is_some() || img.data_uri.trim().is_empty() {
        return;
    }
    match probe_size(&img.data_uri) {
        Ok(size) => img.natural_size = Some(size),
        Err(err) => log::warn!("background image size unknown: {err}"),
    }
}

/// Makes pixels close to the top-left colour transparent and returns the
/// result as a PNG data URI. Vector images are refused.
pub fn remove_background(uri: &str) -> Result<String, RenderError> {
    let data = decode_data_uri(uri)?;
    if data.is_svg() {
        return Err(RenderError::UnsupportedImage(data.mime));
    }
    let mut img = image::load_from_memory(&data.bytes)?.to_rgba8();
    let Some(key) = img.pixels().next().map(|p| p.0) else {
        return Ok(uri.to_string());
    };
    let mut cleared = 0usize;
    for px in img.pixels_mut() {
        let diff: f64 = (0..3)
            .map(|i| (px.0[i] as f64 - key[i] as f64).powi(2))
            .sum::<f64>()
            .sqrt();
        if diff < BACKGROUND_TOLERANCE {
            px.0[3] = 0;
            cleared += 1;
        }
    }
    log::info!(
        "background removal cleared {cleared} of {} pixels",
        img.width() as usize * img.height() as usize
    );
    let png = encode_rgba_to_png_bytes(img.width(), img.height(), img.as_raw())?;
    Ok(encode_data_uri("image/png", &png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrap_core::BackgroundImage;

    fn png_uri(width: u32, height: u32, rgba: &[u8]) -> String {
        encode_data_uri(
            "image/png",
            &encode_rgba_to_png_bytes(width, height, rgba).unwrap(),
        )
    }

    #[test]
    fn decodes_base64_and_plain_uris() {
        let d = decode_data_uri("data:text/plain;base64,aGk=").unwrap();
        assert_eq!((d.mime.as_str(), d.bytes.as_slice()), ("text/plain", &b"hi"[..]));
        let d = decode_data_uri("data:image/svg+xml;charset=utf-8,<svg/>").unwrap();
        assert!(d.is_svg());
        assert_eq!(d.bytes, b"<svg/>");
        assert!(matches!(
            decode_data_uri("http://x/y.png"),
            Err(RenderError::InvalidDataUri(_))
        ));
    }

    #[test]
    fn probes_raster_and_vector_sizes() {
        let uri = png_uri(3, 2, &[0; 24]);
        let size = probe_size(&uri).unwrap();
        assert_eq!((size.width, size.height), (3.0, 2.0));
        let svg = encode_data_uri(
            "image/svg+xml",
            br#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="10"/>"#,
        );
        let size = probe_size(&svg).unwrap();
        assert_eq!((size.width, size.height), (40.0, 10.0));
    }

    #[test]
    fn probe_background_fills_missing_size() {
        let mut design = Design {
            background: BackgroundSpec::Image(BackgroundImage {
                data_uri: png_uri(5, 4, &[9; 80]),
                ..BackgroundImage::default()
            }),
            ..Design::default()
        };
        probe_background(&mut design);
        let BackgroundSpec::Image(img) = &design.background else {
            panic!("background changed kind");
        };
        assert_eq!(img.natural_size.map(|s| s.width), Some(5.0));
    }

    #[test]
    fn background_pixels_become_transparent() {
        #[rustfmt::skip]
        let rgba = [
            250, 250, 250, 255,  240, 245, 250, 255,
            20, 20, 200, 255,    255, 255, 255, 255,
        ];
        let out = remove_background(&png_uri(2, 2, &rgba)).unwrap();
        let img = image::load_from_memory(&decode_data_uri(&out).unwrap().bytes)
            .unwrap()
            .to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert_eq!(img.get_pixel(1, 0).0[3], 0);
        assert_eq!(img.get_pixel(0, 1).0, [20, 20, 200, 255]);
        assert_eq!(img.get_pixel(1, 1).0[3], 0);
    }

    #[test]
    fn vector_images_are_refused() {
        let svg = encode_data_uri("image/svg+xml", b"<svg/>");
        assert!(matches!(
            remove_background(&svg),
            Err(RenderError::UnsupportedImage(_))
        ));
    }
}
