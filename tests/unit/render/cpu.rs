use super::*;
use crate::foundation::core::Point;
use crate::render::ops::{TextAlign, TextDirection};

fn surface(w: u32, h: u32) -> Box<dyn DrawSurface> {
    CpuBackend::new()
        .create_surface(Canvas {
            width: w,
            height: h,
        })
        .unwrap()
}

#[test]
fn oversized_and_empty_surfaces_fail_with_composition_error() {
    let backend = CpuBackend::new();
    let err = backend
        .create_surface(Canvas {
            width: 70_000,
            height: 10,
        })
        .err()
        .unwrap();
    assert!(matches!(err, GreetcardError::Composition(_)));
    assert!(
        backend
            .create_surface(Canvas {
                width: 0,
                height: 10
            })
            .is_err()
    );
}

#[test]
fn fill_rect_and_circle_land_where_requested() {
    let mut s = surface(64, 64);
    let fonts = FontSet::empty();
    s.draw(
        &DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, 64.0, 64.0),
            color: Rgba8::hex(0xF5F2E8),
        },
        &fonts,
    )
    .unwrap();
    s.draw(
        &DrawOp::FillCircle {
            center: Point::new(32.0, 32.0),
            radius: 10.0,
            color: Rgba8::hex(0xDC143C),
        },
        &fonts,
    )
    .unwrap();
    let out = s.export().unwrap();

    assert_eq!(out.pixel(32, 32), Some([0xDC, 0x14, 0x3C, 255]));
    assert_eq!(out.pixel(2, 2), Some([0xF5, 0xF2, 0xE8, 255]));
}

#[test]
fn draw_image_places_and_scales_exactly() {
    let mut s = surface(40, 40);
    let fonts = FontSet::empty();
    s.draw(
        &DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, 40.0, 40.0),
            color: Rgba8::WHITE,
        },
        &fonts,
    )
    .unwrap();
    let black = RasterImage::filled(5, 5, Rgba8::BLACK);
    s.draw_image(&black, Rect::new(10.0, 20.0, 20.0, 30.0))
        .unwrap();
    let out = s.export().unwrap();

    assert_eq!(out.pixel(10, 20), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(19, 29), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(15, 25), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(9, 25), Some([255, 255, 255, 255]));
    assert_eq!(out.pixel(20, 25), Some([255, 255, 255, 255]));
    assert_eq!(out.pixel(15, 30), Some([255, 255, 255, 255]));
}

#[test]
fn text_without_fonts_is_a_no_op() {
    let mut s = surface(32, 32);
    s.draw(
        &DrawOp::Text {
            text: "سلام".to_string(),
            anchor: Point::new(16.0, 20.0),
            size_px: 14.0,
            weight: 400,
            color: Rgba8::BLACK,
            align: TextAlign::Center,
            direction: TextDirection::Rtl,
        },
        &FontSet::empty(),
    )
    .unwrap();
    let out = s.export().unwrap();
    assert_eq!(out.pixel(16, 16), Some([0, 0, 0, 0]));
}

#[test]
fn undecoded_image_is_a_composition_error() {
    let mut s = surface(8, 8);
    let broken = RasterImage {
        width: 8,
        height: 8,
        rgba8_premul: Arc::new(Vec::new()),
    };
    let err = s
        .draw_image(&broken, Rect::new(0.0, 0.0, 8.0, 8.0))
        .unwrap_err();
    assert!(matches!(err, GreetcardError::Composition(_)));
}
