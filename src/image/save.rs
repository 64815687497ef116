//! Tensor denormalization and image saving.

use std::path::Path;

use image::{imageops::FilterType, RgbaImage};

use crate::error::{Error, Result};

use super::{OutputTensor, CHANNEL_MID, RGB_CHANNELS};

/// Save a stylized bitmap to disk.
///
/// The bitmap is:
/// 1. Resized to the original dimensions if provided
/// 2. Saved to the specified path (format inferred from extension)
///
/// # Arguments
///
/// * `bitmap` - Stylized RGBA bitmap
/// * `path` - Output file path
/// * `original_dims` - Optional original dimensions to resize to
/// * `quality` - JPEG quality (1-100), ignored for other formats
///
/// # Errors
///
/// Returns an error if the image cannot be saved.
pub fn save_image<P: AsRef<Path>>(
    bitmap: &RgbaImage,
    path: P,
    original_dims: Option<(u32, u32)>,
    quality: u8,
) -> Result<()> {
    let path = path.as_ref();

    let final_img = if let Some((width, height)) = original_dims {
        image::DynamicImage::ImageRgba8(bitmap.clone()).resize_exact(
            width,
            height,
            FilterType::Lanczos3,
        )
    } else {
        image::DynamicImage::ImageRgba8(bitmap.clone())
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png")
        .to_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => {
            // JPEG carries no alpha channel
            let rgb = final_img.to_rgb8();
            let mut output = std::fs::File::create(path)?;
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, quality);
            rgb.write_with_encoder(encoder)
                .map_err(|source| Error::ImageSave {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        _ => {
            final_img.save(path).map_err(|source| Error::ImageSave {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

/// Convert the generator's output tensor into a displayable bitmap.
///
/// Expects shape [1, H, W, 3]. Each channel is mapped back to 8 bits with
/// `(v + 1) * 127.5`, clamped to [0, 255], and truncated. Every pixel gets
/// full alpha. The pixel bytes are assembled row-major into one raw buffer
/// and handed to the bitmap in a single bulk write.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the tensor is not [1, H, W, 3].
#[allow(clippy::cast_possible_truncation)]
pub fn tensor_to_bitmap(tensor: &OutputTensor) -> Result<RgbaImage> {
    let shape = tensor.shape();
    if shape.len() != 4 || shape[0] != 1 || shape[3] != RGB_CHANNELS {
        return Err(Error::ShapeMismatch {
            expected: "[1, H, W, 3]".to_string(),
            actual: format!("{shape:?}"),
        });
    }

    let (height, width) = (shape[1], shape[2]);

    let mut raw = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            raw.push(denormalize(tensor[[0, y, x, 0]]));
            raw.push(denormalize(tensor[[0, y, x, 1]]));
            raw.push(denormalize(tensor[[0, y, x, 2]]));
            raw.push(0xFF);
        }
    }

    RgbaImage::from_raw(width as u32, height as u32, raw).ok_or_else(|| Error::ShapeMismatch {
        expected: format!("{width}x{height} RGBA buffer"),
        actual: "raw buffer length mismatch".to_string(),
    })
}

/// Denormalize a value from [-1, 1] to [0, 255] with clamping.
///
/// Truncates rather than rounds, matching the generator's trained
/// quantization. Clamping keeps out-of-range values from wrapping into
/// adjacent channels.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn denormalize(value: f32) -> u8 {
    // Safe: clamped to [0, 255] range before casting
    ((value + 1.0) * CHANNEL_MID).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    #[test]
    fn test_denormalize() {
        assert_eq!(denormalize(-1.0), 0);
        assert_eq!(denormalize(0.0), 127);
        assert_eq!(denormalize(1.0), 255);
    }

    #[test]
    fn test_denormalize_clamp() {
        assert_eq!(denormalize(-3.0), 0);
        assert_eq!(denormalize(5.0), 255);
    }

    #[test]
    fn test_round_trip_within_one() {
        // g(f(c)) truncated must land within 1 of c for every 8-bit value
        for c in 0u16..=255 {
            let normalized = (f32::from(c) - CHANNEL_MID) / CHANNEL_MID;
            let restored = denormalize(normalized);
            let diff = i32::from(restored) - i32::from(c);
            assert!(diff.abs() <= 1, "channel {c} round-tripped to {restored}");
        }
    }

    #[test]
    fn test_bitmap_dimensions_and_alpha() {
        let tensor = Array4::<f32>::zeros((1, 4, 6, 3));
        let bitmap = tensor_to_bitmap(&tensor).unwrap();

        assert_eq!(bitmap.dimensions(), (6, 4));
        for pixel in bitmap.pixels() {
            assert_eq!(pixel[3], 0xFF);
        }
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let mut tensor = Array4::<f32>::zeros((1, 2, 2, 3));
        tensor[[0, 0, 0, 0]] = 5.0;
        tensor[[0, 0, 0, 1]] = -5.0;

        let bitmap = tensor_to_bitmap(&tensor).unwrap();
        let pixel = bitmap.get_pixel(0, 0);

        assert_eq!(pixel[0], 255);
        assert_eq!(pixel[1], 0);
    }

    #[test]
    fn test_rejects_unexpected_shape() {
        let tensor = Array4::<f32>::zeros((2, 4, 4, 3));
        assert!(matches!(
            tensor_to_bitmap(&tensor),
            Err(Error::ShapeMismatch { .. })
        ));

        let tensor = Array4::<f32>::zeros((1, 4, 4, 4));
        assert!(matches!(
            tensor_to_bitmap(&tensor),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
