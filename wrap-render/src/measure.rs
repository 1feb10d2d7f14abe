use wrap_core::{MeasureError, TextBounds, TextLayout, TextMeasurer};

use crate::fonts::FontLibrary;

/// Measures text by laying it out with usvg against a [`FontLibrary`].
#[derive(Clone, Debug)]
pub struct UsvgTextMeasurer {
    fonts: FontLibrary,
}

impl UsvgTextMeasurer {
    pub fn new(fonts: FontLibrary) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontLibrary {
        &mut self.fonts
    }
}

fn find_text(group: &usvg::Group) -> Option<&usvg::Text> {
    group.children().iter().find_map(|node| match node {
        usvg::Node::Text(text) => Some(text.as_ref()),
        usvg::Node::Group(g) => find_text(g),
        _ => None,
    })
}

impl TextMeasurer for UsvgTextMeasurer {
    fn measure(&self, layout: &TextLayout) -> Result<TextBounds, MeasureError> {
        if self.fonts.is_empty() {
            return Err(MeasureError::Unavailable("no fonts loaded".into()));
        }
        // Unknown families measure with the face usvg falls back to when
        // the placed text is rendered.
        let layout = TextLayout {
            font_family: self.fonts.resolve_family(&layout.font_family),
            ..layout.clone()
        };
        let svg = layout.measurement_svg();
        let tree = usvg::Tree::from_str(&svg, &self.fonts.usvg_options())
            .map_err(|e| MeasureError::Parse(e.to_string()))?;
        let text = find_text(tree.root())
            .ok_or_else(|| MeasureError::NoGlyphs(layout.lines.join("\n")))?;
        let bbox = text.bounding_box();
        if !(bbox.width() > 0.0 && bbox.height() > 0.0) {
            return Err(MeasureError::NoGlyphs(layout.lines.join("\n")));
        }
        Ok(TextBounds {
            x: bbox.x() as f64,
            y: bbox.y() as f64,
            width: bbox.width() as f64,
            height: bbox.height() as f64,
        })
    }
}
