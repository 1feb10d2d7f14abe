//! Flattened mug-wrap template: sheet layout, artwork placement, background
//! composition and SVG assembly, plus the project record and editor session
//! that drive them.

pub mod artwork;
pub mod background;
pub mod constants;
pub mod encode;
pub mod error;
pub mod history;
pub mod layout;
pub mod project;
pub mod session;
pub mod svg;
pub mod template;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use artwork::{
    ArtworkSpec, Contour, ImageArt, Rotation, TextArt, TextBounds, TextFit, TextLayout,
    TextMeasurer, fit_text, place_artwork,
};
pub use background::{
    BackgroundFill, BackgroundImage, BackgroundSpec, BackgroundStyle, ImageSize, SizePreset,
    build_background,
};
pub use encode::encode_rgba_to_png_bytes;
pub use error::{ArtworkError, LayoutError, MeasureError, ProjectError, TemplateError};
pub use history::History;
pub use layout::{MugDimensions, Rect, SheetLayout, Side, solve_layout};
pub use project::{ProjectRecord, file_stem, metadata_comment, parse_metadata_comment};
pub use session::{EditorSession, GeneratedTemplate, NullPorts, Regenerated, ViewPorts};
pub use svg::Point;
pub use template::{Design, TemplateDocument, assemble, generate};
