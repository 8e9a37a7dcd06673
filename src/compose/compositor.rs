use chrono::NaiveDate;

use crate::assets::decode::encode_png;
use crate::barcode::encode::BarcodeImage;
use crate::foundation::core::{RasterImage, Rect};
use crate::foundation::error::{GreetcardError, GreetcardResult};
use crate::foundation::geometry::GeometrySpec;
use crate::render::surface::SurfaceBackend;
use crate::template::provider::TemplateImage;

/// Finished card: lossless PNG plus the board it was generated for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardResult {
    pub board_id: String,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
    /// UTC date the card was composed; names the downloaded file.
    pub generated_on: NaiveDate,
}

/// Draws template and barcode onto one output surface.
pub struct Compositor<'a> {
    backend: &'a dyn SurfaceBackend,
}

impl<'a> Compositor<'a> {
    pub fn new(backend: &'a dyn SurfaceBackend) -> Self {
        Self { backend }
    }

    /// Compose into a raster at output resolution.
    ///
    /// The template is stretched over the whole output; the barcode lands on the scaled barcode
    /// box. Both inputs are consumed.
    pub fn compose_raster(
        &self,
        template: TemplateImage,
        barcode: BarcodeImage,
        geometry: &GeometrySpec,
    ) -> GreetcardResult<RasterImage> {
        let out = geometry.output_canvas();
        let mut surface = self.backend.create_surface(out)?;

        let full = Rect::new(0.0, 0.0, f64::from(out.width), f64::from(out.height));
        surface.draw_image(template.raster(), full)?;
        surface.draw_image(barcode.raster(), geometry.barcode_rect_output())?;

        surface.export()
    }

    /// Compose and export as PNG.
    #[tracing::instrument(
        skip(self, board_id, template, barcode, geometry),
        fields(origin = ?template.origin())
    )]
    pub fn compose(
        &self,
        board_id: &str,
        template: TemplateImage,
        barcode: BarcodeImage,
        geometry: &GeometrySpec,
    ) -> GreetcardResult<CardResult> {
        let raster = self.compose_raster(template, barcode, geometry)?;
        let png = encode_png(&raster)
            .map_err(|e| GreetcardError::composition(format!("export card: {e:#}")))?;
        tracing::debug!(bytes = png.len(), "card exported");
        Ok(CardResult {
            board_id: board_id.to_string(),
            width: raster.width,
            height: raster.height,
            png,
            generated_on: chrono::Utc::now().date_naive(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
