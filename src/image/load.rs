//! Image loading and pixel normalization.

use std::path::Path;

use image::{imageops::FilterType, GenericImageView, RgbImage};

use crate::error::{Error, Result};

use super::{CHANNEL_MID, MODEL_IMAGE_SIZE, RGB_CHANNELS};

/// Load an image from disk and prepare it for the generator.
///
/// The image is:
/// 1. Loaded from the specified path
/// 2. Resized to 224x224 (the generator's trained input size)
/// 3. Converted to RGB if necessary
///
/// Returns the prepared bitmap together with the original dimensions so
/// the stylized output can be resized back.
///
/// # Errors
///
/// Returns an error if the image cannot be loaded or decoded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<(RgbImage, (u32, u32))> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let original_dims = img.dimensions();

    let bitmap = img
        .resize_exact(MODEL_IMAGE_SIZE, MODEL_IMAGE_SIZE, FilterType::Lanczos3)
        .to_rgb8();

    Ok((bitmap, original_dims))
}

/// Convert an RGB bitmap into the flat input buffer the generator consumes.
///
/// Pixels are walked row-major (y outer, x inner) and each 8-bit channel is
/// normalized from [0, 255] to [-1, 1] with `(c - 127.5) / 127.5`. The
/// buffer is laid out NHWC, three floats per pixel in R, G, B order; this
/// flattening must match the layout the generator was exported with, since
/// a mismatch produces garbled output with no error raised.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the bitmap is zero-sized.
pub fn bitmap_to_tensor(bitmap: &RgbImage) -> Result<Vec<f32>> {
    let (width, height) = bitmap.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::InvalidInput {
            reason: format!("zero-sized bitmap ({width}x{height})"),
        });
    }

    let mut buffer = Vec::with_capacity(width as usize * height as usize * RGB_CHANNELS);

    for y in 0..height {
        for x in 0..width {
            let pixel = bitmap.get_pixel(x, y);
            buffer.push((f32::from(pixel[0]) - CHANNEL_MID) / CHANNEL_MID);
            buffer.push((f32::from(pixel[1]) - CHANNEL_MID) / CHANNEL_MID);
            buffer.push((f32::from(pixel[2]) - CHANNEL_MID) / CHANNEL_MID);
        }
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_buffer_length() {
        for (w, h) in [(1, 1), (3, 5), (224, 224)] {
            let bitmap = RgbImage::new(w, h);
            let buffer = bitmap_to_tensor(&bitmap).unwrap();
            assert_eq!(buffer.len(), (w * h) as usize * RGB_CHANNELS);
        }
    }

    #[test]
    fn test_normalization_extremes() {
        let mut bitmap = RgbImage::new(1, 2);
        bitmap.put_pixel(0, 0, Rgb([0, 0, 0]));
        bitmap.put_pixel(0, 1, Rgb([255, 255, 255]));

        let buffer = bitmap_to_tensor(&bitmap).unwrap();

        for v in &buffer[..3] {
            assert!((v - (-1.0)).abs() < 1e-6);
        }
        for v in &buffer[3..] {
            assert!((v - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_mid_gray_maps_near_zero() {
        let mut bitmap = RgbImage::new(1, 1);
        bitmap.put_pixel(0, 0, Rgb([127, 127, 127]));

        let buffer = bitmap_to_tensor(&bitmap).unwrap();

        for v in &buffer {
            assert!(v.abs() < 0.01);
        }
    }

    #[test]
    fn test_row_major_rgb_order() {
        let mut bitmap = RgbImage::new(2, 2);
        bitmap.put_pixel(0, 0, Rgb([255, 0, 0]));
        bitmap.put_pixel(1, 0, Rgb([0, 255, 0]));
        bitmap.put_pixel(0, 1, Rgb([0, 0, 255]));

        let buffer = bitmap_to_tensor(&bitmap).unwrap();

        // Pixel (0,0): R channel first
        assert!((buffer[0] - 1.0).abs() < 1e-6);
        assert!((buffer[1] - (-1.0)).abs() < 1e-6);
        // Pixel (1,0) follows in the same row
        assert!((buffer[4] - 1.0).abs() < 1e-6);
        // Pixel (0,1) starts the second row
        assert!((buffer[8] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_sized_bitmap_rejected() {
        let bitmap = RgbImage::new(0, 0);
        let err = bitmap_to_tensor(&bitmap).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }
}
