use crate::error::MeshError;

/// Sampler wrap mode the host applies on each texture axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wrap {
    Repeat,
}

/// RGBA8 image for the outer wall, tagged with the template generation it
/// was projected from.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    /// Straight (non-premultiplied) RGBA, rows top to bottom.
    pub rgba: Vec<u8>,
    pub wrap_s: Wrap,
    pub wrap_t: Wrap,
    pub generation: u64,
}

impl Texture {
    /// Repeat-wrapped texture on both axes.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>, generation: u64) -> Result<Self, MeshError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(MeshError::TextureSize {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
            wrap_s: Wrap::Repeat,
            wrap_t: Wrap::Repeat,
            generation,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_checked() {
        assert!(Texture::new(2, 2, vec![0; 16], 1).is_ok());
        assert!(matches!(
            Texture::new(2, 2, vec![0; 15], 1),
            Err(MeshError::TextureSize { expected: 16, .. })
        ));
    }

    #[test]
    fn wraps_repeat_by_default() {
        let t = Texture::new(1, 1, vec![255; 4], 0).unwrap();
        assert_eq!((t.wrap_s, t.wrap_t), (Wrap::Repeat, Wrap::Repeat));
        assert_eq!(t.pixel(0, 0), Some([255; 4]));
        assert_eq!(t.pixel(1, 0), None);
    }
}
