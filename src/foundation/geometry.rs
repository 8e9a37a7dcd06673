use crate::foundation::core::{Canvas, Rect};
use crate::foundation::error::{GreetcardError, GreetcardResult};

/// Layout constants of a card, authored in the logical (unscaled) coordinate space.
///
/// The fallback template paints its placeholder at [`GeometrySpec::barcode_rect_logical`] and the
/// compositor draws the barcode at the same box multiplied by `scale`; both read this one value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GeometrySpec {
    pub logical_width: u32,
    pub logical_height: u32,
    pub barcode_x: u32,
    pub barcode_y: u32,
    pub barcode_size: u32,
    pub scale: u32,
}

impl GeometrySpec {
    /// Geometry of the birthday card template.
    pub const CARD: Self = Self {
        logical_width: 594,
        logical_height: 840,
        barcode_x: 217,
        barcode_y: 518,
        barcode_size: 160,
        scale: 2,
    };

    pub fn validate(&self) -> GreetcardResult<()> {
        if self.logical_width == 0 || self.logical_height == 0 {
            return Err(GreetcardError::validation("logical canvas must be non-empty"));
        }
        if self.barcode_size == 0 {
            return Err(GreetcardError::validation("barcode box must be non-empty"));
        }
        if self.scale == 0 {
            return Err(GreetcardError::validation("scale factor must be > 0"));
        }
        let right = u64::from(self.barcode_x) + u64::from(self.barcode_size);
        let bottom = u64::from(self.barcode_y) + u64::from(self.barcode_size);
        if right > u64::from(self.logical_width) || bottom > u64::from(self.logical_height) {
            return Err(GreetcardError::validation(
                "barcode box must lie within the logical canvas",
            ));
        }
        let out_w = u64::from(self.logical_width) * u64::from(self.scale);
        let out_h = u64::from(self.logical_height) * u64::from(self.scale);
        if out_w > u64::from(u16::MAX) || out_h > u64::from(u16::MAX) {
            return Err(GreetcardError::validation(
                "scaled output exceeds the maximum surface size",
            ));
        }
        Ok(())
    }

    pub fn logical_canvas(&self) -> Canvas {
        Canvas {
            width: self.logical_width,
            height: self.logical_height,
        }
    }

    pub fn output_canvas(&self) -> Canvas {
        Canvas {
            width: self.logical_width * self.scale,
            height: self.logical_height * self.scale,
        }
    }

    /// Side of the rendered barcode raster in output pixels.
    pub fn barcode_pixel_size(&self) -> u32 {
        self.barcode_size * self.scale
    }

    pub fn barcode_rect_logical(&self) -> Rect {
        Rect::new(
            f64::from(self.barcode_x),
            f64::from(self.barcode_y),
            f64::from(self.barcode_x + self.barcode_size),
            f64::from(self.barcode_y + self.barcode_size),
        )
    }

    pub fn barcode_rect_output(&self) -> Rect {
        let s = f64::from(self.scale);
        let r = self.barcode_rect_logical();
        Rect::new(r.x0 * s, r.y0 * s, r.x1 * s, r.y1 * s)
    }

    /// Aspect ratio (width / height) of the logical canvas.
    pub fn aspect(&self) -> f64 {
        f64::from(self.logical_width) / f64::from(self.logical_height)
    }
}

impl Default for GeometrySpec {
    fn default() -> Self {
        Self::CARD
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;
