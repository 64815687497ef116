//! Bitmap loading, tensor conversion, and saving utilities.

mod load;
mod save;

pub use load::{bitmap_to_tensor, load_image};
pub use save::{save_image, tensor_to_bitmap};

use ndarray::Array4;

/// Output tensor in NHWC format (batch, height, width, channels).
/// Values are nominally in [-1, 1] as produced by the generator.
pub type OutputTensor = Array4<f32>;

/// Input edge length the generator was trained on.
pub const MODEL_IMAGE_SIZE: u32 = 224;

/// Number of channels in RGB images.
pub const RGB_CHANNELS: usize = 3;

/// Midpoint of the 8-bit channel range. The generator consumes values
/// scaled as `(c - 127.5) / 127.5` and its output is inverted with
/// `(v + 1) * 127.5`.
pub(crate) const CHANNEL_MID: f32 = 127.5;
