//! Sheet and artwork constants.
//! Lengths are millimeters (1 SVG user unit = 1 mm) unless noted otherwise.

/// Composite factor applied to the user-entered handle area width to get the
/// width of each non-printable side strip. Earlier revisions used 1.2.
pub const HANDLE_STRIP_FACTOR: f64 = 0.75;
/// Fraction of the sheet height kept by the side tabs between the corner notches.
pub const PRINTABLE_HEIGHT_RATIO: f64 = 0.5;

/// Placement regions are a third of the sheet wide.
pub const REGION_WIDTH_RATIO: f64 = 1.0 / 3.0;
/// Placement regions cover 90% of the sheet height.
pub const REGION_HEIGHT_RATIO: f64 = 0.9;
/// Top margin of the placement regions as a fraction of the sheet height.
pub const REGION_TOP_RATIO: f64 = 0.05;

/// Azimuth of the handle, in turns around the mug, measured from the sheet's
/// left edge (the seam). The 3D builder places the handle at this azimuth.
pub const HANDLE_AZIMUTH_TURNS: f64 = 0.0;
/// Angular offset of each artwork region from the point opposite the handle.
/// Face lands at 17/24 and back at 7/24 of the sheet width.
pub const ARTWORK_OFFSET_TURNS: f64 = 5.0 / 24.0;

/// Font size used when measuring text before it is scaled to fit.
pub const TEXT_REFERENCE_SIZE: f64 = 100.0;
/// Line advance for multi-line text, in em.
pub const LINE_SPACING_EM: f64 = 1.2;

/// Stroke attributes of the sheet outline. The texture projector strips them.
pub const OUTLINE_STROKE_ATTRS: &str =
    r##"stroke="#1e293b" stroke-width="2" vector-effect="non-scaling-stroke""##;
/// Guide rectangle stroke colour (preview only).
pub const GUIDE_STROKE: &str = "#4f46e5";
/// Checkerboard tile size and colours used as the preview base layer.
pub const CHECKER_TILE: f64 = 20.0;
pub const CHECKER_LIGHT: &str = "#f1f5f9";
pub const CHECKER_DARK: &str = "#e2e8f0";

/// Defaults applied when a project record leaves a field out.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#BFDBFE";
pub const DEFAULT_FONT_FAMILY: &str = "Roboto";
pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_CONTOUR_COLOR: &str = "#ffffff";
pub const DEFAULT_CONTOUR_THICKNESS: f64 = 2.0;
pub const DEFAULT_PROJECT_STEM: &str = "mug-template";

/// Undo history depth.
pub const MAX_UNDO_ENTRIES: usize = 100;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
