use serde::{Deserialize, Serialize};

use crate::artwork::Rotation;
use crate::constants::DEFAULT_BACKGROUND_COLOR;
use crate::layout::Rect;
use crate::svg::{fixed2, num, svg_escape};

pub const BACKGROUND_PATTERN_ID: &str = "bgPattern";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BackgroundStyle {
    #[default]
    Fill,
    Fit,
    Stretch,
    Tile,
    Center,
}

/// Rendered height of a tiled or centred image relative to the sheet height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizePreset {
    Xs,
    S,
    M,
    L,
    Xl,
    #[default]
    Original,
}

impl SizePreset {
    pub fn height_fraction(self) -> Option<f64> {
        match self {
            SizePreset::Xs => Some(1.0 / 8.0),
            SizePreset::S => Some(1.0 / 4.0),
            SizePreset::M => Some(1.0 / 2.0),
            SizePreset::L => Some(0.9),
            SizePreset::Xl => Some(2.0),
            SizePreset::Original => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackgroundImage {
    pub data_uri: String,
    /// Native pixel size, needed by the tile and center styles.
    pub natural_size: Option<ImageSize>,
    pub style: BackgroundStyle,
    pub size: SizePreset,
    pub flipped_h: bool,
    pub flipped_v: bool,
    pub rotation: Rotation,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BackgroundSpec {
    #[default]
    Transparent,
    Color {
        color: String,
    },
    Image(BackgroundImage),
}

impl BackgroundSpec {
    pub fn default_color() -> Self {
        BackgroundSpec::Color {
            color: DEFAULT_BACKGROUND_COLOR.to_string(),
        }
    }
}

/// Pattern definitions plus the fill to put on the interior path. `fill` is
/// `None` when the interior stays transparent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackgroundFill {
    pub defs: String,
    pub fill: Option<String>,
}

impl BackgroundFill {
    fn none() -> Self {
        Self::default()
    }
}

fn scaled_size(img: &BackgroundImage, sheet_height: f64) -> Option<(f64, f64)> {
    let natural = img.natural_size?;
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return None;
    }
    Some(match img.size.height_fraction() {
        Some(frac) => {
            let h = sheet_height * frac;
            (natural.width * h / natural.height, h)
        }
        None => (natural.width, natural.height),
    })
}

// Rotate and flip about (cx, cy)
fn orient(img: &BackgroundImage, cx: f64, cy: f64) -> String {
    format!(
        "translate({}, {}) rotate({}) scale({}, {}) translate({}, {})",
        num(cx),
        num(cy),
        img.rotation.degrees(),
        if img.flipped_h { -1 } else { 1 },
        if img.flipped_v { -1 } else { 1 },
        num(-cx),
        num(-cy)
    )
}

fn image_tag(
    img: &BackgroundImage,
    frame: Rect,
    preserve: &str,
    pivot: (f64, f64),
) -> String {
    format!(
        "<image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"{}\" transform=\"{}\"/>",
        svg_escape(&img.data_uri),
        num(frame.x),
        num(frame.y),
        num(frame.width),
        num(frame.height),
        preserve,
        orient(img, pivot.0, pivot.1)
    )
}

fn image_background(img: &BackgroundImage, interior: &Rect, sheet_height: f64) -> BackgroundFill {
    if img.data_uri.trim().is_empty() {
        return BackgroundFill::none();
    }
    if interior.width <= 0.0 || interior.height <= 0.0 {
        log::warn!("background skipped: interior band is empty");
        return BackgroundFill::none();
    }
    let needs_size = matches!(img.style, BackgroundStyle::Tile | BackgroundStyle::Center);
    let size = scaled_size(img, sheet_height);
    if needs_size && size.is_none() {
        log::warn!("background skipped: {:?} style needs the image's native size", img.style);
        return BackgroundFill::none();
    }

    let (pw, ph, content) = match (img.style, size) {
        (BackgroundStyle::Tile, Some((w, h))) => {
            let tag = image_tag(img, Rect::new(0.0, 0.0, w, h), "none", (w / 2.0, h / 2.0));
            (w, h, tag)
        }
        (style, size) => {
            let (iw, ih) = (interior.width, interior.height);
            let (frame, preserve) = match (style, size) {
                (BackgroundStyle::Center, Some((w, h))) => {
                    (Rect::new((iw - w) / 2.0, (ih - h) / 2.0, w, h), "none")
                }
                (BackgroundStyle::Fit, _) => (Rect::new(0.0, 0.0, iw, ih), "xMidYMid meet"),
                (BackgroundStyle::Stretch, _) => (Rect::new(0.0, 0.0, iw, ih), "none"),
                _ => (Rect::new(0.0, 0.0, iw, ih), "xMidYMid slice"),
            };
            (iw, ih, image_tag(img, frame, preserve, (iw / 2.0, ih / 2.0)))
        }
    };

    // The pattern origin sits on the interior band so content lines up with it.
    let defs = format!(
        "<pattern id=\"{}\" patternUnits=\"userSpaceOnUse\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\">{}</pattern>",
        BACKGROUND_PATTERN_ID,
        fixed2(interior.x),
        fixed2(interior.y),
        fixed2(pw),
        fixed2(ph),
        content
    );
    BackgroundFill {
        defs,
        fill: Some(format!("url(#{BACKGROUND_PATTERN_ID})")),
    }
}

/// Fill for the print-safe interior band. Never touches the handle strips.
pub fn build_background(spec: &BackgroundSpec, interior: &Rect, sheet_height: f64) -> BackgroundFill {
    match spec {
        BackgroundSpec::Transparent => BackgroundFill::none(),
        BackgroundSpec::Color { color } => BackgroundFill {
            defs: String::new(),
            fill: Some(svg_escape(color)),
        },
        BackgroundSpec::Image(img) => image_background(img, interior, sheet_height),
    }
}
