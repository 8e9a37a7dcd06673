use std::sync::{Arc, Mutex};

use crate::assets::fonts::FontSet;
use crate::foundation::core::{Canvas, RasterImage, Rect, Rgba8};
use crate::foundation::error::{GreetcardError, GreetcardResult};
use crate::render::ops::DrawOp;

/// A 2D drawing surface owned by exactly one card run.
pub trait DrawSurface {
    fn canvas(&self) -> Canvas;

    fn draw(&mut self, op: &DrawOp, fonts: &FontSet) -> GreetcardResult<()>;

    /// Draw `image` stretched to exactly fill `dst`, normal opaque-over blending.
    fn draw_image(&mut self, image: &RasterImage, dst: Rect) -> GreetcardResult<()>;

    /// Finish drawing and read the pixels back.
    fn export(self: Box<Self>) -> GreetcardResult<RasterImage>;
}

/// Factory for drawing surfaces.
pub trait SurfaceBackend: Send + Sync {
    /// Allocate a transparent surface; fails with a composition error when it cannot.
    fn create_surface(&self, canvas: Canvas) -> GreetcardResult<Box<dyn DrawSurface>>;
}

pub fn draw_all(
    surface: &mut dyn DrawSurface,
    ops: &[DrawOp],
    fonts: &FontSet,
) -> GreetcardResult<()> {
    for op in ops {
        surface.draw(op, fonts)?;
    }
    Ok(())
}

/// What a [`RecordingBackend`] saw, in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum Recorded {
    Created(Canvas),
    Op(DrawOp),
    Image { source: Canvas, dst: Rect },
    Exported(Canvas),
}

/// Backend that records calls instead of rasterizing.
///
/// Exported rasters are solid `fill`, sized to the surface.
#[derive(Clone, Debug)]
pub struct RecordingBackend {
    log: Arc<Mutex<Vec<Recorded>>>,
    fill: Rgba8,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            fill: Rgba8::WHITE,
        }
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut l) = self.log.lock() {
            l.clear();
        }
    }
}

struct RecordingSurface {
    canvas: Canvas,
    log: Arc<Mutex<Vec<Recorded>>>,
    fill: Rgba8,
}

impl RecordingSurface {
    fn push(&self, r: Recorded) -> GreetcardResult<()> {
        self.log
            .lock()
            .map_err(|_| GreetcardError::unexpected("recording log poisoned"))?
            .push(r);
        Ok(())
    }
}

impl SurfaceBackend for RecordingBackend {
    fn create_surface(&self, canvas: Canvas) -> GreetcardResult<Box<dyn DrawSurface>> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(GreetcardError::composition("surface must be non-empty"));
        }
        let surface = RecordingSurface {
            canvas,
            log: self.log.clone(),
            fill: self.fill,
        };
        surface.push(Recorded::Created(canvas))?;
        Ok(Box::new(surface))
    }
}

impl DrawSurface for RecordingSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn draw(&mut self, op: &DrawOp, _fonts: &FontSet) -> GreetcardResult<()> {
        self.push(Recorded::Op(op.clone()))
    }

    fn draw_image(&mut self, image: &RasterImage, dst: Rect) -> GreetcardResult<()> {
        image.check_decoded()?;
        self.push(Recorded::Image {
            source: image.canvas(),
            dst,
        })
    }

    fn export(self: Box<Self>) -> GreetcardResult<RasterImage> {
        self.push(Recorded::Exported(self.canvas))?;
        Ok(RasterImage::filled(
            self.canvas.width,
            self.canvas.height,
            self.fill,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
