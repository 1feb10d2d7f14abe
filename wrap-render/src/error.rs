use thiserror::Error;
use wrap_core::{MeasureError, ProjectError, TemplateError};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Measure(#[from] MeasureError),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Mesh(#[from] mug_core::MeshError),
    #[error("SVG parse error: {0}")]
    Svg(#[from] usvg::Error),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Regex(#[from] regex::Error),
    #[error("raster of {width}x{height} px exceeds the {max} pixel limit")]
    RasterTooLarge { width: u32, height: u32, max: u64 },
    #[error("pixmap allocation failed for {width}x{height} px")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("document has no usable {0} attribute")]
    MissingSize(&'static str),
    #[error("could not find the outline path in the document")]
    MissingOutline,
    #[error("not a data URI: {0}")]
    InvalidDataUri(String),
    #[error("background removal is not supported for {0}")]
    UnsupportedImage(String),
    #[error("no template has been generated")]
    NoTemplate,
}
