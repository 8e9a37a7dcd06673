use std::io::Cursor;

use anyhow::Context;

use crate::foundation::core::{RasterImage, premultiply_rgba8_in_place, unpremultiply_in_place};
use crate::foundation::error::GreetcardResult;

/// Decode PNG/JPEG/... bytes into a premultiplied raster.
pub fn decode_image(bytes: &[u8]) -> GreetcardResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    RasterImage::new(width, height, rgba8_premul)
}

/// Encode a raster as a lossless PNG.
pub fn encode_png(img: &RasterImage) -> GreetcardResult<Vec<u8>> {
    img.check_decoded()?;
    let mut straight = img.rgba8_premul.as_ref().clone();
    unpremultiply_in_place(&mut straight);
    let rgba = image::RgbaImage::from_raw(img.width, img.height, straight)
        .context("wrap rgba buffer for png export")?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(rgba)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
