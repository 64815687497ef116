//! ONNX-backed generator session.

use std::path::Path;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Tensor;

use crate::error::{Error, Result};
use crate::image::{OutputTensor, MODEL_IMAGE_SIZE, RGB_CHANNELS};

use super::StyleModel;

/// CartoonGAN generator running on an `ort` session.
///
/// The exported graph takes a single NHWC float input of shape
/// [1, 224, 224, 3] with values in [-1, 1] and produces an output tensor
/// of the same shape.
pub struct OnnxModel {
    session: Session,
    side: usize,
}

impl OnnxModel {
    /// Load the generator from an ONNX file.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be constructed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let session = Session::builder()
            .map_err(|source| Error::ModelLoad {
                name: display_name(path),
                source,
            })?
            .commit_from_file(path)
            .map_err(|source| Error::ModelLoad {
                name: display_name(path),
                source,
            })?;

        Ok(Self {
            session,
            side: MODEL_IMAGE_SIZE as usize,
        })
    }
}

impl StyleModel for OnnxModel {
    fn input_len(&self) -> usize {
        self.side * self.side * RGB_CHANNELS
    }

    fn run(&mut self, input: &[f32]) -> Result<OutputTensor> {
        let array = Array4::from_shape_vec(
            (1, self.side, self.side, RGB_CHANNELS),
            input.to_vec(),
        )
        .map_err(|_| Error::ShapeMismatch {
            expected: format!("[1, {0}, {0}, {1}]", self.side, RGB_CHANNELS),
            actual: format!("{} floats", input.len()),
        })?;

        let input_value =
            Tensor::from_array(array).map_err(|source| Error::Inference { source })?;

        let outputs = self
            .session
            .run(ort::inputs![input_value])
            .map_err(|source| Error::Inference { source })?;

        let output = outputs
            .values()
            .next()
            .ok_or_else(|| Error::ShapeMismatch {
                expected: "stylized output".to_string(),
                actual: "no output".to_string(),
            })?;

        extract_array4(&output)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Extract a 4D array from an ONNX value.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn extract_array4(value: &ort::value::ValueRef<'_>) -> Result<OutputTensor> {
    let (shape_info, data) = value
        .try_extract_tensor::<f32>()
        .map_err(|source| Error::Inference { source })?;

    // Safe: tensor dimensions are always non-negative and within bounds
    let dims: Vec<usize> = shape_info.iter().map(|&x| x as usize).collect();

    if dims.len() != 4 {
        return Err(Error::ShapeMismatch {
            expected: "4D tensor".to_string(),
            actual: format!("{}D tensor", dims.len()),
        });
    }

    Array4::from_shape_vec((dims[0], dims[1], dims[2], dims[3]), data.to_vec()).map_err(|_| {
        Error::ShapeMismatch {
            expected: format!("{dims:?}"),
            actual: "reshape failed".to_string(),
        }
    })
}
