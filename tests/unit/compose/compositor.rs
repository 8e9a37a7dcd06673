use std::sync::Arc;

use super::*;
use crate::assets::decode::decode_image;
use crate::barcode::encode::encode;
use crate::config::ErrorCorrection;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::GreetcardError;
use crate::render::cpu::CpuBackend;
use crate::render::surface::{Recorded, RecordingBackend};
use crate::template::provider::TemplateOrigin;

const URL: &str = "http://localhost:5173/board/x";

fn template(color: Rgba8, origin: TemplateOrigin) -> TemplateImage {
    TemplateImage::new(
        RasterImage::filled(594, 840, color),
        GeometrySpec::CARD.logical_canvas(),
        origin,
    )
}

fn barcode() -> BarcodeImage {
    encode(URL, GeometrySpec::CARD.barcode_pixel_size(), ErrorCorrection::M).unwrap()
}

#[test]
fn draws_template_then_barcode_at_scaled_box() {
    let backend = RecordingBackend::new();
    Compositor::new(&backend)
        .compose_raster(
            template(Rgba8::WHITE, TemplateOrigin::Asset),
            barcode(),
            &GeometrySpec::CARD,
        )
        .unwrap();

    let out = Canvas {
        width: 1188,
        height: 1680,
    };
    assert_eq!(
        backend.calls(),
        vec![
            Recorded::Created(out),
            Recorded::Image {
                source: Canvas {
                    width: 594,
                    height: 840
                },
                dst: Rect::new(0.0, 0.0, 1188.0, 1680.0),
            },
            Recorded::Image {
                source: Canvas {
                    width: 320,
                    height: 320
                },
                dst: Rect::new(434.0, 1036.0, 754.0, 1356.0),
            },
            Recorded::Exported(out),
        ]
    );
}

#[test]
fn barcode_pixels_land_on_output_box() {
    let red = Rgba8::hex(0xDC143C);
    let code = barcode();
    let raster = Compositor::new(&CpuBackend::new())
        .compose_raster(
            template(red, TemplateOrigin::Fallback),
            code.clone(),
            &GeometrySpec::CARD,
        )
        .unwrap();

    assert_eq!((raster.width, raster.height), (1188, 1680));
    let red_px = Some([red.r, red.g, red.b, 255]);
    assert_eq!(raster.pixel(433, 1035), red_px);
    assert_eq!(raster.pixel(754, 1356), red_px);
    assert_eq!(raster.pixel(10, 10), red_px);

    // Barcode pixel (x, y) maps 1:1 onto output (434 + x, 1036 + y).
    for (x, y) in [(0, 0), (5, 300), (160, 160), (319, 319), (200, 17)] {
        assert_eq!(
            raster.pixel(434 + x, 1036 + y),
            code.raster().pixel(x, y),
            "barcode pixel ({x},{y})"
        );
    }
}

#[test]
fn compose_exports_png_tagged_with_board() {
    let result = Compositor::new(&CpuBackend::new())
        .compose(
            "tavalod-ali-1403",
            template(Rgba8::WHITE, TemplateOrigin::Asset),
            barcode(),
            &GeometrySpec::CARD,
        )
        .unwrap();
    assert_eq!(result.board_id, "tavalod-ali-1403");
    assert_eq!((result.width, result.height), (1188, 1680));
    let today = chrono::Utc::now().date_naive();
    assert!(result.generated_on == today || result.generated_on.succ_opt() == Some(today));

    let decoded = decode_image(&result.png).unwrap();
    assert_eq!((decoded.width, decoded.height), (1188, 1680));
    assert_eq!(decoded.pixel(434, 1036), Some([0, 0, 0, 255]));
}

#[test]
fn undecoded_template_is_a_composition_error() {
    let broken = TemplateImage::new(
        RasterImage {
            width: 594,
            height: 840,
            rgba8_premul: Arc::new(Vec::new()),
        },
        GeometrySpec::CARD.logical_canvas(),
        TemplateOrigin::Asset,
    );
    let err = Compositor::new(&RecordingBackend::new())
        .compose("x", broken, barcode(), &GeometrySpec::CARD)
        .unwrap_err();
    assert!(matches!(err, GreetcardError::Composition(_)));
}
