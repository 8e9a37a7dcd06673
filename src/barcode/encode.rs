//! Code Encoder: payload URL to a square barcode raster.

use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};

use crate::config::ErrorCorrection;
use crate::foundation::core::{RasterImage, Rgba8};
use crate::foundation::error::{GreetcardError, GreetcardResult};

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

/// Encoded barcode: module matrix plus its raster at the requested pixel size.
#[derive(Clone, Debug)]
pub struct BarcodeImage {
    payload: String,
    module_count: u32,
    modules: Vec<bool>,
    raster: RasterImage,
}

impl BarcodeImage {
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Modules per side, without quiet zone.
    pub fn module_count(&self) -> u32 {
        self.module_count
    }

    /// Row-major module matrix; `true` is dark.
    pub fn modules(&self) -> &[bool] {
        &self.modules
    }

    pub fn raster(&self) -> &RasterImage {
        &self.raster
    }

    pub fn into_raster(self) -> RasterImage {
        self.raster
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CodeEncoder {
    level: ErrorCorrection,
}

impl CodeEncoder {
    pub fn new(level: ErrorCorrection) -> Self {
        Self { level }
    }

    pub fn level(&self) -> ErrorCorrection {
        self.level
    }

    /// Encode `payload` into a `pixel_size` x `pixel_size` raster with no quiet zone.
    ///
    /// Fails with [`GreetcardError::Encoding`] when the payload exceeds the format's capacity or
    /// `pixel_size` cannot hold one pixel per module. Never truncates.
    #[tracing::instrument(
        skip(self, payload),
        fields(level = ?self.level, payload_len = payload.len())
    )]
    pub fn encode(&self, payload: &str, pixel_size: u32) -> GreetcardResult<BarcodeImage> {
        encode(payload, pixel_size, self.level)
    }
}

pub fn encode(
    payload: &str,
    pixel_size: u32,
    level: ErrorCorrection,
) -> GreetcardResult<BarcodeImage> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), level.into()).map_err(
        |e| match e {
            QrError::DataTooLong => GreetcardError::encoding(format!(
                "payload of {} bytes exceeds barcode capacity at level {level:?}",
                payload.len()
            )),
            other => GreetcardError::encoding(format!("encode payload: {other}")),
        },
    )?;

    let modules: Vec<bool> = code
        .to_colors()
        .into_iter()
        .map(|c| c == Color::Dark)
        .collect();
    let module_count = u32::try_from(code.width())
        .map_err(|_| GreetcardError::encoding("module count out of range"))?;

    if pixel_size < module_count {
        return Err(GreetcardError::encoding(format!(
            "pixel size {pixel_size} is smaller than {module_count} modules"
        )));
    }

    let raster = rasterize(&modules, module_count, pixel_size)?;
    tracing::debug!(module_count, pixel_size, "barcode encoded");

    Ok(BarcodeImage {
        payload: payload.to_string(),
        module_count,
        modules,
        raster,
    })
}

fn rasterize(modules: &[bool], module_count: u32, pixel_size: u32) -> GreetcardResult<RasterImage> {
    let dark = Rgba8::BLACK.premultiplied();
    let light = Rgba8::WHITE.premultiplied();

    let n = u64::from(module_count);
    let size = u64::from(pixel_size);
    // Pixel column/row to module index; the same lookup serves both axes.
    let cell: Vec<usize> = (0..size).map(|p| (p * n / size) as usize).collect();

    let side = pixel_size as usize;
    let stride = module_count as usize;
    let mut data = Vec::with_capacity(side * side * 4);
    for &my in &cell {
        let row = &modules[my * stride..(my + 1) * stride];
        for &mx in &cell {
            data.extend_from_slice(if row[mx] { &dark } else { &light });
        }
    }
    RasterImage::new(pixel_size, pixel_size, data)
}

#[cfg(test)]
#[path = "../../tests/unit/barcode/encode.rs"]
mod tests;
