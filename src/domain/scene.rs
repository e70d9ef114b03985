//! Drawing primitives emitted by the concept-map renderer.

use std::fmt;

/// A point in content coordinates (x = depth axis, y = sibling axis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", fmt_num(self.x), fmt_num(self.y))
    }
}

/// Whether a concept has children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Has children: drawn filled, label before the marker
    Internal,
    /// No children: drawn hollow, label after the marker
    Leaf,
}

impl NodeRole {
    /// Labels face away from the parent, so they never cover their own marker.
    pub fn label_anchor(self) -> LabelAnchor {
        match self {
            NodeRole::Internal => LabelAnchor::End,
            NodeRole::Leaf => LabelAnchor::Start,
        }
    }
}

/// Which end of the label text sits at the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAnchor {
    Start,
    End,
}

impl LabelAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelAnchor::Start => "start",
            LabelAnchor::End => "end",
        }
    }
}

/// Cubic Bezier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicCurve {
    /// SVG path data (`M .. C ..`).
    pub fn to_path_data(&self) -> String {
        format!(
            "M{}C{} {} {}",
            self.start, self.control1, self.control2, self.end
        )
    }
}

/// Curve between two nodes with horizontal tangents at both ends.
pub fn horizontal_link(from: Point, to: Point) -> CubicCurve {
    let mid_x = (from.x + to.x) / 2.0;
    CubicCurve {
        start: from,
        control1: Point::new(mid_x, from.y),
        control2: Point::new(mid_x, to.y),
        end: to,
    }
}

/// One drawn element.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneElement {
    Link {
        curve: CubicCurve,
    },
    Marker {
        center: Point,
        role: NodeRole,
    },
    Label {
        at: Point,
        text: String,
        anchor: LabelAnchor,
        /// Horizontal offset from `at` toward the anchor side
        dx: f64,
    },
}

impl SceneElement {
    pub fn is_link(&self) -> bool {
        matches!(self, SceneElement::Link { .. })
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, SceneElement::Marker { .. })
    }

    pub fn is_label(&self) -> bool {
        matches!(self, SceneElement::Label { .. })
    }
}

/// Compact number formatting for SVG attributes: at most 2 decimals,
/// no trailing zeros.
pub fn fmt_num(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
