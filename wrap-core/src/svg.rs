use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Two-decimal fixed formatting used for sheet sizes and path data.
pub fn fixed2(v: f64) -> String {
    let s = format!("{v:.2}");
    if s == "-0.00" { "0.00".to_string() } else { s }
}

// Format numbers for transforms:
// - Near-integers (1e-6) as integers
// - Else up to 3 decimals, trim trailing zeros
pub fn num(v: f64) -> String {
    let s = if (v - v.round()).abs() < 1e-6 {
        format!("{:.0}", v)
    } else {
        format!("{:.3}", v)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    };
    if s == "-0" { "0".to_string() } else { s }
}

/// Closed path data (`M .. L .. Z`) through the given points.
pub fn path_data(pts: &[Point]) -> String {
    let Some((first, rest)) = pts.split_first() else {
        return String::new();
    };
    let mut out = format!("M {} {}", fixed2(first.x), fixed2(first.y));
    for p in rest {
        out.push_str(&format!(" L {} {}", fixed2(p.x), fixed2(p.y)));
    }
    out.push_str(" Z");
    out
}

pub fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
