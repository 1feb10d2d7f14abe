use serde::{Deserialize, Serialize};

use crate::constants::{
    ARTWORK_OFFSET_TURNS, HANDLE_AZIMUTH_TURNS, HANDLE_STRIP_FACTOR, PRINTABLE_HEIGHT_RATIO,
    REGION_HEIGHT_RATIO, REGION_TOP_RATIO, REGION_WIDTH_RATIO,
};
use crate::error::LayoutError;
use crate::svg::{Point, path_data};

/// Physical mug measurements as entered by the user, in millimeters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MugDimensions {
    #[serde(rename = "height")]
    pub height_mm: f64,
    #[serde(rename = "diameter")]
    pub diameter_mm: f64,
    #[serde(rename = "handleAreaWidth")]
    pub handle_area_width_mm: f64,
}

impl Default for MugDimensions {
    fn default() -> Self {
        Self {
            height_mm: 95.0,
            diameter_mm: 82.0,
            handle_area_width_mm: 20.0,
        }
    }
}

impl MugDimensions {
    pub fn new(height_mm: f64, diameter_mm: f64, handle_area_width_mm: f64) -> Result<Self, LayoutError> {
        let dims = Self {
            height_mm,
            diameter_mm,
            handle_area_width_mm,
        };
        dims.validate()?;
        Ok(dims)
    }

    /// Rejects NaN, infinite and non-positive values.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for (field, value) in [
            ("height", self.height_mm),
            ("diameter", self.diameter_mm),
            ("handle area width", self.handle_area_width_mm),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidDimensions { field, value });
            }
        }
        Ok(())
    }

    pub fn circumference(&self) -> f64 {
        self.diameter_mm * std::f64::consts::PI
    }

    /// Width of each non-printable side strip around the handle.
    pub fn handle_strip_width(&self) -> f64 {
        self.handle_area_width_mm * HANDLE_STRIP_FACTOR
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }
}

/// The two artwork sides of the mug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Face,
    Back,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Face, Side::Back];

    pub fn label(self) -> &'static str {
        match self {
            Side::Face => "face",
            Side::Back => "back",
        }
    }

    /// Region centre as a fraction of the sheet width. Both sides sit
    /// symmetrically around the point opposite the handle.
    pub fn center_turns(self) -> f64 {
        let opposite = HANDLE_AZIMUTH_TURNS + 0.5;
        let t = match self {
            Side::Face => opposite + ARTWORK_OFFSET_TURNS,
            Side::Back => opposite - ARTWORK_OFFSET_TURNS,
        };
        t.rem_euclid(1.0)
    }
}

/// Everything the rest of the pipeline needs to know about the flattened sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetLayout {
    pub dimensions: MugDimensions,
    pub sheet_width: f64,
    pub sheet_height: f64,
    pub printable_height: f64,
    pub cutout_strip_height: f64,
    pub handle_strip_width: f64,
    /// Closed outline with the four corner notches, 12 points clockwise from
    /// the top of the left tab.
    pub outline: Vec<Point>,
    pub face_region: Rect,
    pub back_region: Rect,
    /// Full-height band between the two handle strips.
    pub interior: Rect,
}

impl SheetLayout {
    pub fn region(&self, side: Side) -> Rect {
        match side {
            Side::Face => self.face_region,
            Side::Back => self.back_region,
        }
    }

    pub fn cutout_path_data(&self) -> String {
        path_data(&self.outline)
    }

    pub fn interior_path_data(&self) -> String {
        path_data(&self.interior.corners())
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.sheet_width, self.sheet_height)
    }
}

fn outline_points(w: f64, h: f64, notch_w: f64, notch_h: f64) -> Vec<Point> {
    vec![
        Point::new(0.0, notch_h),
        Point::new(notch_w, notch_h),
        Point::new(notch_w, 0.0),
        Point::new(w - notch_w, 0.0),
        Point::new(w - notch_w, notch_h),
        Point::new(w, notch_h),
        Point::new(w, h - notch_h),
        Point::new(w - notch_w, h - notch_h),
        Point::new(w - notch_w, h),
        Point::new(notch_w, h),
        Point::new(notch_w, h - notch_h),
        Point::new(0.0, h - notch_h),
    ]
}

fn placement_region(side: Side, w: f64, h: f64) -> Rect {
    let box_w = w * REGION_WIDTH_RATIO;
    let box_h = h * REGION_HEIGHT_RATIO;
    Rect::new(
        w * side.center_turns() - box_w / 2.0,
        h * REGION_TOP_RATIO,
        box_w,
        box_h,
    )
}

pub fn solve_layout(dims: &MugDimensions) -> Result<SheetLayout, LayoutError> {
    dims.validate()?;
    let sheet_width = dims.circumference();
    let sheet_height = dims.height_mm;
    let printable_height = sheet_height * PRINTABLE_HEIGHT_RATIO;
    let cutout_strip_height = (sheet_height - printable_height) / 2.0;
    let handle_strip_width = dims.handle_strip_width();
    // Strips wider than half the sheet leave no interior; keep the band empty
    // rather than inverted.
    let interior_width = (sheet_width - 2.0 * handle_strip_width).max(0.0);
    Ok(SheetLayout {
        dimensions: *dims,
        sheet_width,
        sheet_height,
        printable_height,
        cutout_strip_height,
        handle_strip_width,
        outline: outline_points(sheet_width, sheet_height, handle_strip_width, cutout_strip_height),
        face_region: placement_region(Side::Face, sheet_width, sheet_height),
        back_region: placement_region(Side::Back, sheet_width, sheet_height),
        interior: Rect::new(handle_strip_width, 0.0, interior_width, sheet_height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_non_positive_and_nan() {
        assert!(MugDimensions::new(0.0, 82.0, 20.0).is_err());
        assert!(MugDimensions::new(95.0, -1.0, 20.0).is_err());
        assert!(MugDimensions::new(95.0, 82.0, f64::NAN).is_err());
        assert!(MugDimensions::new(f64::INFINITY, 82.0, 20.0).is_err());
        assert!(MugDimensions::new(95.0, 82.0, 20.0).is_ok());
    }

    #[test]
    fn standard_mug_layout() {
        let layout = solve_layout(&MugDimensions::default()).unwrap();
        assert_relative_eq!(layout.sheet_width, 82.0 * std::f64::consts::PI);
        assert_relative_eq!(layout.sheet_height, 95.0);
        assert_relative_eq!(layout.cutout_strip_height, 23.75);
        assert_relative_eq!(layout.handle_strip_width, 15.0);
        assert_eq!(layout.outline.len(), 12);

        let w = layout.sheet_width;
        assert_relative_eq!(layout.face_region.width, w / 3.0);
        assert_relative_eq!(layout.face_region.height, 95.0 * 0.9);
        assert_relative_eq!(layout.face_region.y, 95.0 * 0.05);
        assert_relative_eq!(layout.face_region.x, w * 17.0 / 24.0 - w / 6.0, epsilon = 1e-9);
        assert_relative_eq!(layout.back_region.x, w * 7.0 / 24.0 - w / 6.0, epsilon = 1e-9);
        assert_relative_eq!(layout.interior.x, 15.0);
        assert_relative_eq!(layout.interior.width, w - 30.0);
    }

    #[test]
    fn side_fractions_share_one_seam() {
        assert_relative_eq!(Side::Face.center_turns(), 17.0 / 24.0, epsilon = 1e-12);
        assert_relative_eq!(Side::Back.center_turns(), 7.0 / 24.0, epsilon = 1e-12);
    }

    #[test]
    fn cutout_path_starts_at_left_tab() {
        let layout = solve_layout(&MugDimensions::default()).unwrap();
        let d = layout.cutout_path_data();
        assert!(d.starts_with("M 0.00 23.75 L 15.00 23.75 L 15.00 0.00"));
        assert!(d.ends_with("L 0.00 71.25 Z"));
    }

    #[test]
    fn oversized_handle_strip_leaves_empty_interior() {
        let layout = solve_layout(&MugDimensions::new(95.0, 10.0, 40.0).unwrap()).unwrap();
        assert_eq!(layout.interior.width, 0.0);
    }
}
