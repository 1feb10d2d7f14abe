//! Host-side rendering for mug-wrap templates: fonts and text metrics,
//! rasterization, cutout masks, PDF pages, the 3D texture projector and file
//! exports.

pub mod assets;
pub mod config;
pub mod cutout;
pub mod error;
pub mod export;
pub mod fonts;
pub mod measure;
pub mod pdf;
pub mod pipeline;
pub mod raster;
pub mod texture;

pub use assets::{decode_data_uri, encode_data_uri, probe_background, probe_size, remove_background};
pub use config::RenderConfig;
pub use cutout::{cutout_mask, exterior_only_svg, mask_svg, threshold_mask};
pub use error::RenderError;
pub use export::{ExportArtifact, ExportFormat, export_cutout, export_design};
pub use fonts::FontLibrary;
pub use measure::UsvgTextMeasurer;
pub use pdf::{Placement, fit_to_page, raster_pdf};
pub use pipeline::Renderer;
pub use raster::{Raster, rasterize, rasterize_to_size};
pub use texture::{project_texture, texture_markup};
