use std::io::Cursor;
use std::time::Instant;

use super::*;
use crate::assets::source::MemoryAssetSource;
use crate::foundation::core::Rgba8;
use crate::render::cpu::CpuBackend;
use crate::render::surface::{Recorded, RecordingBackend};

fn png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let [r, g, b] = rgb;
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([r, g, b, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn provider(source: MemoryAssetSource) -> TemplateProvider {
    TemplateProvider::new(
        Arc::new(source),
        "/birthcard-template.png",
        Duration::from_secs(5),
        GeometrySpec::CARD,
    )
}

#[test]
fn asset_path_is_used_when_it_decodes() {
    let source = MemoryAssetSource::new()
        .with("birthcard-template.png", png(297, 420, [10, 20, 30]))
        .unwrap();
    let backend = RecordingBackend::new();
    let t = provider(source)
        .resolve(&backend, &FontSet::empty())
        .unwrap();
    assert_eq!(t.origin(), TemplateOrigin::Asset);
    assert_eq!(t.logical_size(), GeometrySpec::CARD.logical_canvas());
    assert_eq!(t.raster().width, 297);
    assert!(backend.calls().is_empty());
}

#[test]
fn missing_asset_falls_back_to_synthesis() {
    let backend = RecordingBackend::new();
    let t = provider(MemoryAssetSource::new())
        .resolve(&backend, &FontSet::empty())
        .unwrap();
    assert_eq!(t.origin(), TemplateOrigin::Fallback);
    assert_eq!(
        t.logical_size(),
        Canvas {
            width: 594,
            height: 840
        }
    );
    let calls = backend.calls();
    assert_eq!(calls.first(), Some(&Recorded::Created(t.logical_size())));
    assert_eq!(calls.last(), Some(&Recorded::Exported(t.logical_size())));
}

#[test]
fn undecodable_or_misshapen_assets_fall_back() {
    let garbage = MemoryAssetSource::new()
        .with("birthcard-template.png", b"<html>404</html>".to_vec())
        .unwrap();
    let err = provider(garbage).load_asset().unwrap_err();
    assert!(matches!(err, GreetcardError::AssetUnavailable(_)));

    let square = MemoryAssetSource::new()
        .with("birthcard-template.png", png(100, 100, [0, 0, 0]))
        .unwrap();
    let err = provider(square).load_asset().unwrap_err();
    assert!(err.to_string().contains("aspect ratio"));
}

struct StallingSource;

impl AssetSource for StallingSource {
    fn fetch(&self, _path: &str) -> GreetcardResult<Vec<u8>> {
        std::thread::sleep(Duration::from_secs(3));
        Ok(Vec::new())
    }
}

#[test]
fn stalled_asset_times_out_into_fallback() {
    let p = TemplateProvider::new(
        Arc::new(StallingSource),
        "birthcard-template.png",
        Duration::from_millis(50),
        GeometrySpec::CARD,
    );
    let start = Instant::now();
    let t = p
        .resolve(&RecordingBackend::new(), &FontSet::empty())
        .unwrap();
    assert_eq!(t.origin(), TemplateOrigin::Fallback);
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn fallback_raster_keeps_barcode_box_clear() {
    let t = provider(MemoryAssetSource::new())
        .resolve(&CpuBackend::new(), &FontSet::empty())
        .unwrap();
    let r = t.raster();
    assert_eq!((r.width, r.height), (594, 840));

    for (x, y) in [(219, 520), (297, 598), (375, 676), (230, 670)] {
        assert_eq!(r.pixel(x, y), Some([255, 255, 255, 255]), "at ({x},{y})");
    }
    let bg = Rgba8::hex(0xF5F2E8);
    assert_eq!(r.pixel(5, 830), Some([bg.r, bg.g, bg.b, 255]));
    let red = Rgba8::hex(0xDC143C);
    assert_eq!(r.pixel(525, 100), Some([red.r, red.g, red.b, 255]));
}

struct BrokenBackend;

impl SurfaceBackend for BrokenBackend {
    fn create_surface(
        &self,
        _canvas: Canvas,
    ) -> GreetcardResult<Box<dyn crate::render::surface::DrawSurface>> {
        Err(GreetcardError::validation("out of memory"))
    }
}

#[test]
fn synthesis_failure_is_promoted_to_composition_error() {
    let err = provider(MemoryAssetSource::new())
        .resolve(&BrokenBackend, &FontSet::empty())
        .unwrap_err();
    assert!(matches!(err, GreetcardError::Composition(_)));
}
