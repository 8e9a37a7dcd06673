use std::{sync::Arc, time::Duration};

use crate::assets::{decode::decode_image, fonts::FontSet, source::AssetSource};
use crate::foundation::core::{Canvas, RasterImage};
use crate::foundation::error::{GreetcardError, GreetcardResult};
use crate::foundation::geometry::GeometrySpec;
use crate::foundation::wait::{Waited, wait_bounded};
use crate::render::surface::{SurfaceBackend, draw_all};
use crate::template::fallback::fallback_ops;

/// Largest relative aspect-ratio deviation accepted for a template asset.
const ASPECT_TOLERANCE: f64 = 0.01;

/// Which path produced a [`TemplateImage`]. Informational only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateOrigin {
    Asset,
    Fallback,
}

/// Decorative background, logically sized to the card canvas.
#[derive(Clone, Debug)]
pub struct TemplateImage {
    raster: RasterImage,
    logical: Canvas,
    origin: TemplateOrigin,
}

impl TemplateImage {
    pub fn new(raster: RasterImage, logical: Canvas, origin: TemplateOrigin) -> Self {
        Self {
            raster,
            logical,
            origin,
        }
    }

    pub fn raster(&self) -> &RasterImage {
        &self.raster
    }

    /// Logical canvas size, independent of the raster's pixel size.
    pub fn logical_size(&self) -> Canvas {
        self.logical
    }

    pub fn origin(&self) -> TemplateOrigin {
        self.origin
    }

    pub fn into_raster(self) -> RasterImage {
        self.raster
    }
}

/// Resolves the template: the named asset if it decodes, otherwise the procedural fallback.
pub struct TemplateProvider {
    source: Arc<dyn AssetSource>,
    path: String,
    timeout: Duration,
    geometry: GeometrySpec,
}

impl TemplateProvider {
    pub fn new(
        source: Arc<dyn AssetSource>,
        path: impl Into<String>,
        timeout: Duration,
        geometry: GeometrySpec,
    ) -> Self {
        Self {
            source,
            path: path.into(),
            timeout,
            geometry,
        }
    }

    /// Resolve the template.
    ///
    /// Asset failures are recovered here. The only error that escapes is a composition error
    /// raised while synthesizing the fallback.
    #[tracing::instrument(skip(self, backend, fonts), fields(path = %self.path))]
    pub fn resolve(
        &self,
        backend: &dyn SurfaceBackend,
        fonts: &FontSet,
    ) -> GreetcardResult<TemplateImage> {
        let (raster, origin) = match self.load_asset() {
            Ok(raster) => (raster, TemplateOrigin::Asset),
            Err(e) => {
                tracing::warn!(error = %e, "template asset unavailable; synthesizing fallback");
                (self.synthesize(backend, fonts)?, TemplateOrigin::Fallback)
            }
        };
        Ok(TemplateImage {
            raster,
            logical: self.geometry.logical_canvas(),
            origin,
        })
    }

    /// Fetch and decode the named asset within the configured timeout.
    ///
    /// Every failure is reported as [`GreetcardError::AssetUnavailable`].
    pub fn load_asset(&self) -> GreetcardResult<RasterImage> {
        let source = self.source.clone();
        let path = self.path.clone();
        let waited = wait_bounded("template", self.timeout, move || {
            source.fetch(&path).and_then(|bytes| decode_image(&bytes))
        });

        let raster = match waited {
            Waited::Done(Ok(raster)) => raster,
            Waited::Done(Err(e)) => {
                return Err(GreetcardError::asset_unavailable(format!(
                    "'{}': {e:#}",
                    self.path
                )));
            }
            Waited::TimedOut => {
                return Err(GreetcardError::asset_unavailable(format!(
                    "'{}': no response within {:?}",
                    self.path, self.timeout
                )));
            }
            Waited::Lost(reason) => {
                return Err(GreetcardError::asset_unavailable(format!(
                    "'{}': {reason}",
                    self.path
                )));
            }
        };

        let aspect = f64::from(raster.width) / f64::from(raster.height);
        let expected = self.geometry.aspect();
        if ((aspect - expected) / expected).abs() > ASPECT_TOLERANCE {
            return Err(GreetcardError::asset_unavailable(format!(
                "'{}': {}x{} does not match the card aspect ratio",
                self.path, raster.width, raster.height
            )));
        }
        Ok(raster)
    }

    /// Render the fallback template at logical size.
    ///
    /// Any failure is reported as a composition error.
    pub fn synthesize(
        &self,
        backend: &dyn SurfaceBackend,
        fonts: &FontSet,
    ) -> GreetcardResult<RasterImage> {
        let render = || -> GreetcardResult<RasterImage> {
            let mut surface = backend.create_surface(self.geometry.logical_canvas())?;
            draw_all(surface.as_mut(), &fallback_ops(&self.geometry), fonts)?;
            surface.export()
        };
        render().map_err(|e| match e {
            GreetcardError::Composition(_) => e,
            other => GreetcardError::composition(format!("fallback synthesis: {other}")),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/provider.rs"]
mod tests;
