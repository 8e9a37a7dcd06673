use crate::foundation::core::{Point, Rect, Rgba8};

/// Horizontal anchoring of a text op relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Start,
    Center,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextAlign {
    /// Left edge of a run of `width` anchored at `anchor_x`.
    pub fn left_edge(self, direction: TextDirection, anchor_x: f64, width: f64) -> f64 {
        match (self, direction) {
            (Self::Center, _) => anchor_x - width / 2.0,
            (Self::Start, TextDirection::Rtl) | (Self::End, TextDirection::Ltr) => {
                anchor_x - width
            }
            (Self::Start, TextDirection::Ltr) | (Self::End, TextDirection::Rtl) => anchor_x,
        }
    }
}

/// Quadratic Bézier segment continuing from the previous end point.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuadSegment {
    pub ctrl: Point,
    pub to: Point,
}

/// Declarative drawing operation consumed by a [`crate::render::surface::DrawSurface`].
///
/// Coordinates are in the surface's own pixel space.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Rgba8,
    },
    StrokeRect {
        rect: Rect,
        color: Rgba8,
        width: f64,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Rgba8,
    },
    StrokeCircle {
        center: Point,
        radius: f64,
        color: Rgba8,
        width: f64,
    },
    StrokeCurve {
        start: Point,
        segments: Vec<QuadSegment>,
        color: Rgba8,
        width: f64,
    },
    /// Single line of text; `anchor.y` is the baseline.
    Text {
        text: String,
        anchor: Point,
        size_px: f32,
        weight: u16,
        color: Rgba8,
        align: TextAlign,
        direction: TextDirection,
    },
}

impl DrawOp {
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    /// Curve segments as a Bézier path.
    pub fn curve_path(start: Point, segments: &[QuadSegment]) -> kurbo::BezPath {
        let mut path = kurbo::BezPath::new();
        path.move_to(start);
        for seg in segments {
            path.quad_to(seg.ctrl, seg.to);
        }
        path
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/ops.rs"]
mod tests;
