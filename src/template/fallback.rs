//! Procedural stand-in for the template asset, expressed as data.

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::geometry::GeometrySpec;
use crate::render::ops::{DrawOp, QuadSegment, TextAlign, TextDirection};

const BACKGROUND: Rgba8 = Rgba8::hex(0xF5F2E8);
const STRING_COLOR: Rgba8 = Rgba8::hex(0x666666);
const PLACEHOLDER_BORDER: Rgba8 = Rgba8::hex(0xBDC3C7);
const TITLE_COLOR: Rgba8 = Rgba8::hex(0x2C3E50);
const POEM_COLOR: Rgba8 = Rgba8::hex(0x34495E);
const NOTE_COLOR: Rgba8 = Rgba8::hex(0x7F8C8D);

const BALLOON_RADIUS: f64 = 35.0;
const HIGHLIGHT_RADIUS: f64 = 8.0;
const LINE_WIDTH: f64 = 2.0;

struct Balloon {
    center: (f64, f64),
    fill: Rgba8,
    rim: Rgba8,
    highlight: Rgba8,
    /// Horizontal sway of the string; mirrored between the two balloons.
    sway: f64,
}

const BALLOONS: [Balloon; 2] = [
    Balloon {
        center: (80.0, 90.0),
        fill: Rgba8::hex(0xFFD700),
        rim: Rgba8::hex(0xE6C200),
        highlight: Rgba8::hex(0xFFFF80),
        sway: 5.0,
    },
    Balloon {
        center: (514.0, 90.0),
        fill: Rgba8::hex(0xDC143C),
        rim: Rgba8::hex(0xB91C3C),
        highlight: Rgba8::hex(0xFF6B8A),
        sway: -5.0,
    },
];

/// Caption line: text, baseline y, size, weight, color.
type Caption = (&'static str, f64, f32, u16, Rgba8);

const CAPTIONS: [Caption; 6] = [
    ("تی تولد بهاره موفقیتون :(", 150.0, 32.0, 700, TITLE_COLOR),
    ("آدم یاد تی تی و شادی آین", 190.0, 22.0, 400, TITLE_COLOR),
    ("تی ویسین آرزو دانم سالی پر از", 280.0, 18.0, 400, POEM_COLOR),
    ("دلخوشی و انطفای قشنگ پی", 310.0, 18.0, 400, POEM_COLOR),
    (
        "تولدت مثل بهار میمونه، آدم یاد شکوفه و شادی میاره.",
        380.0,
        14.0,
        400,
        NOTE_COLOR,
    ),
    (
        "برات آرزو دارم سالی پر از دلخوشی و انطفای قشنگ باشه.",
        405.0,
        14.0,
        400,
        NOTE_COLOR,
    ),
];

/// Drawn after the placeholder, under the barcode box.
const SCAN_HINT: Caption = ("کد رو اسکن کن، صفحه رو باز کن.", 720.0, 14.0, 400, NOTE_COLOR);

/// Draw-ops of the fallback template in logical coordinates.
///
/// The placeholder rectangle is exactly `geometry.barcode_rect_logical()`.
pub fn fallback_ops(geometry: &GeometrySpec) -> Vec<DrawOp> {
    let mut ops = Vec::with_capacity(4 + BALLOONS.len() * 4 + CAPTIONS.len());

    ops.push(DrawOp::FillRect {
        rect: kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(geometry.logical_width),
            f64::from(geometry.logical_height),
        ),
        color: BACKGROUND,
    });

    for b in &BALLOONS {
        let (cx, cy) = b.center;
        let center = Point::new(cx, cy);
        ops.push(DrawOp::FillCircle {
            center,
            radius: BALLOON_RADIUS,
            color: b.fill,
        });
        ops.push(DrawOp::StrokeCircle {
            center,
            radius: BALLOON_RADIUS,
            color: b.rim,
            width: LINE_WIDTH,
        });
        ops.push(DrawOp::FillCircle {
            center: Point::new(cx - 10.0, cy - 10.0),
            radius: HIGHLIGHT_RADIUS,
            color: b.highlight,
        });

        let knot = cy + BALLOON_RADIUS;
        ops.push(DrawOp::StrokeCurve {
            start: Point::new(cx, knot),
            segments: vec![
                QuadSegment {
                    ctrl: Point::new(cx + b.sway, knot + 25.0),
                    to: Point::new(cx - b.sway, knot + 55.0),
                },
                QuadSegment {
                    ctrl: Point::new(cx - 2.0 * b.sway, knot + 85.0),
                    to: Point::new(cx, knot + 115.0),
                },
            ],
            color: STRING_COLOR,
            width: LINE_WIDTH,
        });
    }

    let mid_x = f64::from(geometry.logical_width) / 2.0;
    for c in &CAPTIONS {
        ops.push(caption_op(c, mid_x));
    }

    let placeholder = geometry.barcode_rect_logical();
    ops.push(DrawOp::FillRect {
        rect: placeholder,
        color: Rgba8::WHITE,
    });
    ops.push(DrawOp::StrokeRect {
        rect: placeholder,
        color: PLACEHOLDER_BORDER,
        width: 1.0,
    });

    ops.push(caption_op(&SCAN_HINT, mid_x));
    ops
}

fn caption_op(&(text, y, size_px, weight, color): &Caption, x: f64) -> DrawOp {
    DrawOp::Text {
        text: text.to_string(),
        anchor: Point::new(x, y),
        size_px,
        weight,
        color,
        align: TextAlign::Center,
        direction: TextDirection::Rtl,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/fallback.rs"]
mod tests;
