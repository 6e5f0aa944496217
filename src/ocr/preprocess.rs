//! Image preprocessing ahead of the OCR call.
//!
//! Label photos arrive at arbitrary sizes and lighting. Downscaling caps
//! OCR cost, grayscale plus contrast/sharpness boosts help the engine with
//! small ingredient print. Preprocessing is best-effort: any failure falls
//! back to the original bytes rather than aborting the extraction.

use image::ImageOutputFormat;
use log::warn;
use std::io::Cursor;

/// Maximum bounding box submitted to the OCR service.
const MAX_DIMENSION: u32 = 1600;

/// Multiplicative boost applied to contrast, as a percentage.
const CONTRAST_BOOST: f32 = 50.0;

const JPEG_QUALITY: u8 = 90;

/// Optimize an image for OCR, falling back to the original bytes on failure.
pub fn optimize(image_bytes: &[u8]) -> Vec<u8> {
    match try_optimize(image_bytes) {
        Ok(optimized) => optimized,
        Err(e) => {
            warn!("Image optimization failed, using original bytes: {}", e);
            image_bytes.to_vec()
        }
    }
}

fn try_optimize(image_bytes: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    let img = image::load_from_memory(image_bytes)?;

    // thumbnail preserves aspect ratio within the bounding box
    let img = img.thumbnail(MAX_DIMENSION, MAX_DIMENSION);
    let img = img.grayscale();
    let img = img.adjust_contrast(CONTRAST_BOOST);
    // light unsharp mask; threshold keeps flat regions untouched
    let img = img.unsharpen(1.0, 2);

    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageOutputFormat::Jpeg(JPEG_QUALITY))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_fn(64, 48, |x, _| image::Rgb([(x * 4) as u8, 128, 255]));
        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_optimize_produces_jpeg() {
        let out = optimize(&tiny_png());
        // JPEG SOI marker
        assert_eq!(&out[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_garbage_falls_back_to_original() {
        let garbage = b"not an image at all";
        assert_eq!(optimize(garbage), garbage.to_vec());
    }

    #[test]
    fn test_large_image_is_downscaled() {
        let img = image::RgbImage::new(3200, 2400);
        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .unwrap();

        let out = optimize(&buffer.into_inner());
        let reloaded = image::load_from_memory(&out).unwrap();
        assert!(reloaded.width() <= MAX_DIMENSION);
        assert!(reloaded.height() <= MAX_DIMENSION);
    }
}
