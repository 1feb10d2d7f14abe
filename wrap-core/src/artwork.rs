use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONTOUR_COLOR, DEFAULT_CONTOUR_THICKNESS, DEFAULT_FONT_FAMILY, DEFAULT_TEXT_COLOR,
    LINE_SPACING_EM, TEXT_REFERENCE_SIZE,
};
use crate::error::{ArtworkError, MeasureError};
use crate::layout::Rect;
use crate::svg::{fixed2, num, svg_escape};

/// Quarter-turn rotation. Any multiple of 90 degrees deserializes and is
/// normalized into [0, 360).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn rotate_left(self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + 3)
    }

    pub fn rotate_right(self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + 1)
    }

    pub fn is_quarter(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    fn quarter_turns(self) -> i32 {
        self.degrees() / 90
    }

    fn from_quarter_turns(q: i32) -> Self {
        match q.rem_euclid(4) {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }
}

impl TryFrom<i32> for Rotation {
    type Error = String;

    fn try_from(deg: i32) -> Result<Self, Self::Error> {
        if deg % 90 != 0 {
            return Err(format!("rotation must be a multiple of 90 degrees, got {deg}"));
        }
        Ok(Self::from_quarter_turns(deg / 90))
    }
}

impl From<Rotation> for i32 {
    fn from(r: Rotation) -> i32 {
        r.degrees()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageArt {
    pub data_uri: String,
    pub flipped_h: bool,
    pub flipped_v: bool,
    pub rotation: Rotation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contour {
    pub enabled: bool,
    pub color: String,
    pub thickness_px: f64,
}

impl Default for Contour {
    fn default() -> Self {
        Self {
            enabled: false,
            color: DEFAULT_CONTOUR_COLOR.to_string(),
            thickness_px: DEFAULT_CONTOUR_THICKNESS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextArt {
    pub text: String,
    pub font_family: String,
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub contour: Contour,
    /// Horizontal flip of the rendered text.
    pub mirrored: bool,
}

impl Default for TextArt {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            color: DEFAULT_TEXT_COLOR.to_string(),
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            contour: Contour::default(),
            mirrored: false,
        }
    }
}

impl TextArt {
    pub fn font_weight(&self) -> u16 {
        if self.bold { 700 } else { 400 }
    }

    pub fn font_style(&self) -> &'static str {
        if self.italic { "italic" } else { "normal" }
    }

    pub fn text_decoration(&self) -> String {
        let mut parts = Vec::new();
        if self.underline {
            parts.push("underline");
        }
        if self.strikethrough {
            parts.push("line-through");
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// What to draw inside one placement region.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ArtworkSpec {
    #[default]
    Transparent,
    Image(ImageArt),
    Text(TextArt),
}

impl ArtworkSpec {
    pub fn flip_horizontal(&mut self) {
        match self {
            ArtworkSpec::Image(img) => img.flipped_h = !img.flipped_h,
            ArtworkSpec::Text(text) => text.mirrored = !text.mirrored,
            ArtworkSpec::Transparent => {}
        }
    }

    pub fn flip_vertical(&mut self) {
        if let ArtworkSpec::Image(img) = self {
            img.flipped_v = !img.flipped_v;
        }
    }

    pub fn rotate_left(&mut self) {
        if let ArtworkSpec::Image(img) = self {
            img.rotation = img.rotation.rotate_left();
        }
    }

    pub fn rotate_right(&mut self) {
        if let ArtworkSpec::Image(img) = self {
            img.rotation = img.rotation.rotate_right();
        }
    }

    /// True when placing this spec yields no markup.
    pub fn is_empty(&self) -> bool {
        match self {
            ArtworkSpec::Transparent => true,
            ArtworkSpec::Image(img) => img.data_uri.trim().is_empty(),
            ArtworkSpec::Text(text) => text.text.trim().is_empty(),
        }
    }
}

/// Unscaled text as it is handed to the host's text metrics.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    /// Lines with blank lines replaced by a non-breaking space and regular
    /// spaces made non-breaking.
    pub lines: Vec<String>,
    pub font_family: String,
    pub font_weight: u16,
    pub font_style: &'static str,
    pub font_size: f64,
}

impl TextLayout {
    pub fn from_art(art: &TextArt) -> Self {
        let lines = art
            .text
            .split('\n')
            .map(|l| {
                let l = l.trim_end_matches('\r');
                if l.is_empty() {
                    "\u{a0}".to_string()
                } else {
                    l.replace(' ', "\u{a0}")
                }
            })
            .collect();
        Self {
            lines,
            font_family: art.font_family.clone(),
            font_weight: art.font_weight(),
            font_style: art.font_style(),
            font_size: TEXT_REFERENCE_SIZE,
        }
    }

    pub fn tspans(&self) -> String {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let dy = if i == 0 {
                    "0".to_string()
                } else {
                    format!("{LINE_SPACING_EM}em")
                };
                format!("<tspan x=\"0\" dy=\"{}\">{}</tspan>", dy, svg_escape(line))
            })
            .collect()
    }

    /// Standalone document with the text anchored at the origin, used by
    /// measurers that lay text out through an SVG engine.
    pub fn measurement_svg(&self) -> String {
        format!(
            "<svg xmlns=\"{}\" width=\"1\" height=\"1\"><text x=\"0\" y=\"0\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" font-style=\"{}\" text-anchor=\"middle\">{}</text></svg>",
            crate::constants::SVG_NS,
            svg_escape(&self.font_family),
            num(self.font_size),
            self.font_weight,
            self.font_style,
            self.tspans()
        )
    }
}

/// Bounding box of laid-out text in its own coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Host text metrics. Implementations must fail rather than guess.
pub trait TextMeasurer {
    fn measure(&self, layout: &TextLayout) -> Result<TextBounds, MeasureError>;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, layout: &TextLayout) -> Result<TextBounds, MeasureError> {
        (**self).measure(layout)
    }
}

/// Uniform scale and centring offsets for measured text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextFit {
    pub scale: f64,
    pub font_size: f64,
    pub x_adjust: f64,
    pub y_adjust: f64,
}

pub fn fit_text(region: &Rect, bounds: &TextBounds) -> Result<TextFit, ArtworkError> {
    let degenerate = !(bounds.width.is_finite() && bounds.height.is_finite())
        || bounds.width <= 0.0
        || bounds.height <= 0.0;
    if degenerate {
        return Err(ArtworkError::DegenerateText {
            width: bounds.width,
            height: bounds.height,
        });
    }
    let scale = (region.width / bounds.width).min(region.height / bounds.height);
    Ok(TextFit {
        scale,
        font_size: TEXT_REFERENCE_SIZE * scale,
        x_adjust: -(bounds.x + bounds.width / 2.0) * scale,
        y_adjust: -(bounds.y + bounds.height / 2.0) * scale,
    })
}

fn place_image(region: &Rect, img: &ImageArt) -> String {
    let c = region.center();
    // Quarter turns lay out a swapped w/h box centred on the region, rather
    // than translating back by half the unswapped region size.
    let (w, h) = if img.rotation.is_quarter() {
        (region.height, region.width)
    } else {
        (region.width, region.height)
    };
    let sx = if img.flipped_h { -1 } else { 1 };
    let sy = if img.flipped_v { -1 } else { 1 };
    format!(
        "<g transform=\"translate({}, {}) rotate({}) scale({}, {}) translate({}, {})\"><image href=\"{}\" x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"xMidYMid meet\"/></g>",
        num(c.x),
        num(c.y),
        img.rotation.degrees(),
        sx,
        sy,
        num(-w / 2.0),
        num(-h / 2.0),
        svg_escape(&img.data_uri),
        fixed2(w),
        fixed2(h)
    )
}

fn place_text(
    region: &Rect,
    art: &TextArt,
    measurer: &dyn TextMeasurer,
) -> Result<String, ArtworkError> {
    let layout = TextLayout::from_art(art);
    let bounds = measurer.measure(&layout)?;
    let fit = fit_text(region, &bounds)?;
    let c = region.center();
    let mut transform = format!("translate({}, {})", num(c.x), num(c.y));
    if art.mirrored {
        transform.push_str(" scale(-1, 1)");
    }
    transform.push_str(&format!(
        " translate({}, {})",
        fixed2(fit.x_adjust),
        fixed2(fit.y_adjust)
    ));
    let attrs = format!(
        "x=\"0\" y=\"0\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" font-style=\"{}\" text-decoration=\"{}\" text-anchor=\"middle\" transform=\"{}\"",
        svg_escape(&art.font_family),
        fixed2(fit.font_size),
        layout.font_weight,
        layout.font_style,
        art.text_decoration(),
        transform
    );
    let content = layout.tspans();
    let fill = format!(
        "<text {} fill=\"{}\">{}</text>",
        attrs,
        svg_escape(&art.color),
        content
    );
    if !art.contour.enabled {
        return Ok(fill);
    }
    Ok(format!(
        "<g><text {} fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linejoin=\"round\">{}</text>{}</g>",
        attrs,
        svg_escape(&art.contour.color),
        num(art.contour.thickness_px),
        content,
        fill
    ))
}

/// Positioned SVG fragment for one region, or an empty string when the side
/// has nothing to draw.
pub fn place_artwork(
    region: &Rect,
    spec: &ArtworkSpec,
    measurer: &dyn TextMeasurer,
) -> Result<String, ArtworkError> {
    if spec.is_empty() {
        return Ok(String::new());
    }
    match spec {
        ArtworkSpec::Transparent => Ok(String::new()),
        ArtworkSpec::Image(img) => Ok(place_image(region, img)),
        ArtworkSpec::Text(text) => place_text(region, text, measurer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MonospaceMeasurer;
    use approx::assert_relative_eq;

    fn region() -> Rect {
        Rect::new(100.0, 10.0, 80.0, 60.0)
    }

    fn text(s: &str) -> TextArt {
        TextArt {
            text: s.to_string(),
            ..TextArt::default()
        }
    }

    #[test]
    fn rotation_steps_wrap() {
        let r = Rotation::Deg0.rotate_left();
        assert_eq!(r, Rotation::Deg270);
        assert_eq!(r.rotate_right().rotate_right(), Rotation::Deg90);
        assert_eq!(Rotation::try_from(-90), Ok(Rotation::Deg270));
        assert_eq!(Rotation::try_from(450), Ok(Rotation::Deg90));
        assert!(Rotation::try_from(45).is_err());
    }

    #[test]
    fn transparent_and_blank_are_empty() {
        let m = MonospaceMeasurer::default();
        assert_eq!(place_artwork(&region(), &ArtworkSpec::Transparent, &m).unwrap(), "");
        let blank = ArtworkSpec::Text(text("  \n "));
        assert_eq!(place_artwork(&region(), &blank, &m).unwrap(), "");
        let no_image = ArtworkSpec::Image(ImageArt::default());
        assert_eq!(place_artwork(&region(), &no_image, &m).unwrap(), "");
    }

    #[test]
    fn image_is_centered_flipped_and_rotated() {
        let spec = ArtworkSpec::Image(ImageArt {
            data_uri: "data:image/png;base64,AAAA".into(),
            flipped_h: true,
            flipped_v: false,
            rotation: Rotation::Deg180,
        });
        let out = place_artwork(&region(), &spec, &MonospaceMeasurer::default()).unwrap();
        assert!(out.starts_with(
            "<g transform=\"translate(140, 40) rotate(180) scale(-1, 1) translate(-40, -30)\">"
        ));
        assert!(out.contains("width=\"80.00\" height=\"60.00\""));
        assert!(out.contains("preserveAspectRatio=\"xMidYMid meet\""));
    }

    #[test]
    fn quarter_turn_swaps_image_box() {
        let spec = ArtworkSpec::Image(ImageArt {
            data_uri: "data:image/png;base64,AAAA".into(),
            rotation: Rotation::Deg90,
            ..ImageArt::default()
        });
        let out = place_artwork(&region(), &spec, &MonospaceMeasurer::default()).unwrap();
        assert!(out.contains("translate(-30, -40)"));
        assert!(out.contains("width=\"60.00\" height=\"80.00\""));
    }

    #[test]
    fn text_lines_keep_blank_rows() {
        let layout = TextLayout::from_art(&text("a b\n\nc"));
        assert_eq!(layout.lines, vec!["a\u{a0}b", "\u{a0}", "c"]);
        let spans = layout.tspans();
        assert_eq!(spans.matches("<tspan").count(), 3);
        assert!(spans.contains("dy=\"1.2em\""));
    }

    #[test]
    fn text_scales_to_limiting_axis() {
        // 4 chars at 100 -> 240 wide, 100 tall (bbox y = -80)
        let m = MonospaceMeasurer::default();
        let out = place_artwork(&region(), &ArtworkSpec::Text(text("MUGS")), &m).unwrap();
        // width limits: 80 / 240
        assert!(out.contains("font-size=\"33.33\""), "{out}");
        assert!(out.contains("text-anchor=\"middle\""));
        assert!(!out.contains("stroke="));
    }

    #[test]
    fn contour_draws_stroke_below_fill() {
        let mut art = text("Hi");
        art.contour.enabled = true;
        art.contour.color = "#ff0000".into();
        art.contour.thickness_px = 3.0;
        art.underline = true;
        art.strikethrough = true;
        let out = place_artwork(&region(), &ArtworkSpec::Text(art), &MonospaceMeasurer::default())
            .unwrap();
        let stroke_at = out.find("stroke=\"#ff0000\"").unwrap();
        let fill_at = out.find("fill=\"#000000\"").unwrap();
        assert!(stroke_at < fill_at);
        assert!(out.contains("stroke-linejoin=\"round\""));
        assert!(out.contains("text-decoration=\"underline line-through\""));
        assert!(out.starts_with("<g>"));
    }

    #[test]
    fn mirrored_text_flips_inside_the_group() {
        let mut art = text("Hi");
        art.mirrored = true;
        let out = place_artwork(&region(), &ArtworkSpec::Text(art), &MonospaceMeasurer::default())
            .unwrap();
        assert!(out.contains("transform=\"translate(140, 40) scale(-1, 1) translate("));
    }

    #[test]
    fn degenerate_bounds_fail_loudly() {
        let err = fit_text(
            &region(),
            &TextBounds {
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 10.0,
            },
        );
        assert!(matches!(err, Err(ArtworkError::DegenerateText { .. })));
    }

    #[test]
    fn fit_centers_offset_bounds() {
        let fit = fit_text(
            &Rect::new(0.0, 0.0, 50.0, 50.0),
            &TextBounds {
                x: -50.0,
                y: -80.0,
                width: 100.0,
                height: 100.0,
            },
        )
        .unwrap();
        assert_relative_eq!(fit.scale, 0.5);
        assert_relative_eq!(fit.font_size, 50.0);
        assert_relative_eq!(fit.x_adjust, 0.0);
        assert_relative_eq!(fit.y_adjust, 15.0);
    }
}
