use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid dimensions: {field} must be a positive number (got {value})")]
    InvalidDimensions { field: &'static str, value: f64 },
}

#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("text metrics unavailable: {0}")]
    Unavailable(String),
    #[error("no glyphs produced for font family '{0}'")]
    NoGlyphs(String),
    #[error("measurement document rejected: {0}")]
    Parse(String),
}

#[derive(Debug, Error)]
pub enum ArtworkError {
    #[error(transparent)]
    Measure(#[from] MeasureError),
    #[error("text measured with a degenerate bounding box ({width} x {height})")]
    DegenerateText { width: f64, height: f64 },
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("{side} artwork: {source}")]
    Artwork {
        side: &'static str,
        #[source]
        source: ArtworkError,
    },
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("no project data comment found")]
    MissingComment,
    #[error("project data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("project data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
