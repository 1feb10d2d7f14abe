use thiserror::Error;
use wrap_core::LayoutError;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error(transparent)]
    Dimensions(#[from] LayoutError),
    #[error("texture buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    TextureSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
