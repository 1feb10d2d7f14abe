use png::{BitDepth, ColorType, Encoder};

// Shared PNG encoder: straight-alpha RGBA -> PNG bytes (deterministic for same input)
pub fn encode_rgba_to_png_bytes(
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, width, height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        {
            let mut writer = enc.write_header()?;
            writer.write_image_data(rgba)?;
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_png_signature() {
        let bytes = encode_rgba_to_png_bytes(2, 1, &[0, 0, 0, 255, 255, 255, 255, 0]).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn rejects_short_buffers() {
        assert!(encode_rgba_to_png_bytes(2, 2, &[0; 4]).is_err());
    }
}
