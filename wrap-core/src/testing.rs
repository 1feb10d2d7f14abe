//! Stand-in [`TextMeasurer`]s for exercising placement without a font engine.

use crate::artwork::{TextBounds, TextLayout, TextMeasurer};
use crate::error::MeasureError;

/// Fixed-advance metrics: 0.6 em per character, 0.8 em ascent, 0.2 em descent.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonospaceMeasurer;

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, layout: &TextLayout) -> Result<TextBounds, MeasureError> {
        let size = layout.font_size;
        let widest = layout.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = layout.lines.len().max(1) as f64;
        let width = widest as f64 * 0.6 * size;
        Ok(TextBounds {
            x: -width / 2.0,
            y: -0.8 * size,
            width,
            height: size + (lines - 1.0) * 1.2 * size,
        })
    }
}

/// Metrics facility that is never available.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMetrics;

impl TextMeasurer for NoMetrics {
    fn measure(&self, _layout: &TextLayout) -> Result<TextBounds, MeasureError> {
        Err(MeasureError::Unavailable("no text engine".into()))
    }
}
