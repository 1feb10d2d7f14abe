use serde::{Deserialize, Serialize};

use crate::artwork::{ArtworkSpec, TextMeasurer, place_artwork};
use crate::background::{BackgroundFill, BackgroundSpec, build_background};
use crate::constants::{
    CHECKER_DARK, CHECKER_LIGHT, CHECKER_TILE, GUIDE_STROKE, OUTLINE_STROKE_ATTRS, SVG_NS, XLINK_NS,
};
use crate::error::TemplateError;
use crate::layout::{MugDimensions, Rect, SheetLayout, Side, solve_layout};
use crate::svg::{fixed2, num};

pub const CHECKERBOARD_ID: &str = "checkerboard";

/// The inputs the geometry pipeline consumes from a project.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    #[serde(rename = "mugDimensions")]
    pub dimensions: MugDimensions,
    #[serde(default)]
    pub background: BackgroundSpec,
    #[serde(rename = "faceArt", default)]
    pub face: ArtworkSpec,
    #[serde(rename = "backArt", default)]
    pub back: ArtworkSpec,
}

impl Design {
    pub fn artwork(&self, side: Side) -> &ArtworkSpec {
        match side {
            Side::Face => &self.face,
            Side::Back => &self.back,
        }
    }

    pub fn artwork_mut(&mut self, side: Side) -> &mut ArtworkSpec {
        match side {
            Side::Face => &mut self.face,
            Side::Back => &mut self.back,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TemplateDocument {
    /// On-screen markup: checkerboard base, background, artwork, guides.
    pub preview_markup: String,
    /// Print markup: transparent outline, background, artwork, optional
    /// metadata comment in front.
    pub download_markup: String,
}

fn svg_open(w: f64, h: f64) -> String {
    let (w, h) = (fixed2(w), fixed2(h));
    format!(
        "<svg width=\"{w}mm\" height=\"{h}mm\" viewBox=\"0 0 {w} {h}\" xmlns=\"{SVG_NS}\" xmlns:xlink=\"{XLINK_NS}\">"
    )
}

fn checkerboard_pattern() -> String {
    let t = CHECKER_TILE;
    let half = num(t / 2.0);
    let cell = |x: f64, y: f64, fill: &str| {
        format!(
            "<rect width=\"{half}\" height=\"{half}\" x=\"{}\" y=\"{}\" fill=\"{fill}\"/>",
            num(x),
            num(y)
        )
    };
    format!(
        "<pattern id=\"{CHECKERBOARD_ID}\" patternUnits=\"userSpaceOnUse\" width=\"{}\" height=\"{}\">{}{}{}{}</pattern>",
        num(t),
        num(t),
        cell(0.0, 0.0, CHECKER_DARK),
        cell(t / 2.0, 0.0, CHECKER_LIGHT),
        cell(0.0, t / 2.0, CHECKER_LIGHT),
        cell(t / 2.0, t / 2.0, CHECKER_DARK)
    )
}

fn guide_rect(r: &Rect) -> String {
    format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{GUIDE_STROKE}\" stroke-width=\"1\" stroke-dasharray=\"4 4\"/>",
        fixed2(r.x),
        fixed2(r.y),
        fixed2(r.width),
        fixed2(r.height)
    )
}

fn defs_block(defs: &str) -> String {
    if defs.is_empty() {
        String::new()
    } else {
        format!("<defs>{defs}</defs>")
    }
}

/// Combines the solved layout, both artwork fragments and the background into
/// the preview and download documents.
pub fn assemble(
    layout: &SheetLayout,
    face_fragment: &str,
    back_fragment: &str,
    background: &BackgroundFill,
    metadata_comment: Option<&str>,
) -> TemplateDocument {
    let open = svg_open(layout.sheet_width, layout.sheet_height);
    let outline = layout.cutout_path_data();
    let background_element = background
        .fill
        .as_ref()
        .map(|fill| format!("<path d=\"{}\" fill=\"{}\"/>", layout.interior_path_data(), fill))
        .unwrap_or_default();

    let mut preview = String::with_capacity(1024 + face_fragment.len() + back_fragment.len());
    preview.push_str(&open);
    preview.push_str(&defs_block(&format!("{}{}", checkerboard_pattern(), background.defs)));
    preview.push_str(&format!(
        "<path d=\"{outline}\" fill=\"url(#{CHECKERBOARD_ID})\" {OUTLINE_STROKE_ATTRS}/>"
    ));
    preview.push_str(&background_element);
    preview.push_str(face_fragment);
    preview.push_str(back_fragment);
    preview.push_str(&guide_rect(&layout.face_region));
    preview.push_str(&guide_rect(&layout.back_region));
    preview.push_str("</svg>");

    let mut download = String::with_capacity(preview.len());
    if let Some(comment) = metadata_comment {
        download.push_str(comment);
    }
    download.push_str(&open);
    download.push_str(&defs_block(&background.defs));
    download.push_str(&format!("<path d=\"{outline}\" fill=\"none\" {OUTLINE_STROKE_ATTRS}/>"));
    download.push_str(&background_element);
    download.push_str(face_fragment);
    download.push_str(back_fragment);
    download.push_str("</svg>");

    TemplateDocument {
        preview_markup: preview,
        download_markup: download,
    }
}

/// Runs layout, placement and background composition for a design and
/// assembles both documents. Text on either side goes through `measurer`.
pub fn generate(
    design: &Design,
    measurer: &dyn TextMeasurer,
    metadata_comment: Option<&str>,
) -> Result<(SheetLayout, TemplateDocument), TemplateError> {
    let layout = solve_layout(&design.dimensions)?;
    let mut fragments = Vec::with_capacity(2);
    for side in [Side::Face, Side::Back] {
        let fragment = place_artwork(&layout.region(side), design.artwork(side), measurer)
            .map_err(|source| TemplateError::Artwork {
                side: side.label(),
                source,
            })?;
        fragments.push(fragment);
    }
    let background = build_background(&design.background, &layout.interior, layout.sheet_height);
    let doc = assemble(&layout, &fragments[0], &fragments[1], &background, metadata_comment);
    log::debug!(
        "template generated: {} x {} mm",
        fixed2(layout.sheet_width),
        fixed2(layout.sheet_height)
    );
    Ok((layout, doc))
}
