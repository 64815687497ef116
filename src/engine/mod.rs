//! Generator lifecycle management and the inference seam.
//!
//! The engine owns the loaded generator for the process lifetime and walks
//! the `Unloaded -> Loading -> Ready -> Closed` state machine. Requests are
//! serialized through `&mut self`; there is never more than one inference
//! in flight against a single handle.

mod onnx;

pub use onnx::OnnxModel;

use std::fmt;

use crate::error::{Error, Result};
use crate::image::OutputTensor;

/// Interface to the style-transfer generator.
///
/// Implementations wrap a fixed, already-trained model: for a given input
/// the output is deterministic. `run` is synchronous and blocking.
pub trait StyleModel: Send {
    /// Flat input buffer length the model expects (width x height x 3).
    fn input_len(&self) -> usize;

    /// Run the generator on a normalized input buffer, producing the
    /// [1, H, W, 3] output tensor.
    fn run(&mut self, input: &[f32]) -> Result<OutputTensor>;
}

/// Lifecycle states of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No model loaded yet.
    Unloaded,
    /// Model construction in progress.
    Loading,
    /// Model loaded and usable.
    Ready,
    /// Resources released; the engine cannot be reused.
    Closed,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Owns the generator handle for the process lifetime.
///
/// Exactly one model is loaded per engine; there is no hot-swapping. The
/// handle is an explicit owned resource rather than process-global state,
/// so construction and destruction stay scoped to whoever holds it.
pub struct Engine {
    state: EngineState,
    model: Option<Box<dyn StyleModel>>,
}

impl Engine {
    /// Create an engine with no model loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: EngineState::Unloaded,
            model: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Load a model, transitioning `Unloaded -> Loading -> Ready`.
    ///
    /// The constructor closure runs while the engine is in `Loading`. A
    /// failed construction returns the engine to `Unloaded` so a corrected
    /// model path can be retried.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineNotReady`] if a model is already loaded or
    /// the engine has been closed, or the constructor's error if it fails.
    pub fn load_with<F>(&mut self, construct: F) -> Result<()>
    where
        F: FnOnce() -> Result<Box<dyn StyleModel>>,
    {
        if self.state != EngineState::Unloaded {
            return Err(Error::EngineNotReady { state: self.state });
        }

        self.state = EngineState::Loading;
        match construct() {
            Ok(model) => {
                self.model = Some(model);
                self.state = EngineState::Ready;
                Ok(())
            }
            Err(err) => {
                self.state = EngineState::Unloaded;
                Err(err)
            }
        }
    }

    /// Run one inference request against the loaded model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineNotReady`] unless the engine is `Ready`, and
    /// [`Error::ShapeMismatch`] if the buffer length does not match the
    /// model's expected input size.
    pub fn run(&mut self, input: &[f32]) -> Result<OutputTensor> {
        let model = match (self.state, self.model.as_mut()) {
            (EngineState::Ready, Some(model)) => model,
            _ => return Err(Error::EngineNotReady { state: self.state }),
        };

        if input.len() != model.input_len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} floats", model.input_len()),
                actual: format!("{} floats", input.len()),
            });
        }

        model.run(input)
    }

    /// Release the model. Idempotent; closing twice is a no-op.
    pub fn close(&mut self) {
        self.model = None;
        self.state = EngineState::Closed;
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    struct IdentityModel {
        side: usize,
    }

    impl StyleModel for IdentityModel {
        fn input_len(&self) -> usize {
            self.side * self.side * 3
        }

        fn run(&mut self, input: &[f32]) -> Result<OutputTensor> {
            Ok(
                Array4::from_shape_vec((1, self.side, self.side, 3), input.to_vec())
                    .expect("stub shape matches input_len"),
            )
        }
    }

    fn ready_engine(side: usize) -> Engine {
        let mut engine = Engine::new();
        engine
            .load_with(|| Ok(Box::new(IdentityModel { side })))
            .unwrap();
        engine
    }

    #[test]
    fn test_run_before_load_fails() {
        let mut engine = Engine::new();
        let err = engine.run(&[0.0; 12]).unwrap_err();
        assert!(matches!(
            err,
            Error::EngineNotReady {
                state: EngineState::Unloaded
            }
        ));
    }

    #[test]
    fn test_load_and_run() {
        let mut engine = ready_engine(2);
        assert_eq!(engine.state(), EngineState::Ready);

        let input = vec![0.5; 2 * 2 * 3];
        let output = engine.run(&input).unwrap();
        assert_eq!(output.shape(), &[1, 2, 2, 3]);
        assert!((output[[0, 0, 0, 0]] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_buffer_length_mismatch() {
        let mut engine = ready_engine(2);
        let err = engine.run(&[0.0; 5]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut engine = ready_engine(2);
        engine.close();
        assert_eq!(engine.state(), EngineState::Closed);
        engine.close();
        assert_eq!(engine.state(), EngineState::Closed);
    }

    #[test]
    fn test_run_after_close_fails() {
        let mut engine = ready_engine(2);
        engine.close();
        let err = engine.run(&[0.0; 12]).unwrap_err();
        assert!(matches!(
            err,
            Error::EngineNotReady {
                state: EngineState::Closed
            }
        ));
    }

    #[test]
    fn test_double_load_rejected() {
        let mut engine = ready_engine(2);
        let err = engine
            .load_with(|| Ok(Box::new(IdentityModel { side: 2 })))
            .unwrap_err();
        assert!(matches!(err, Error::EngineNotReady { .. }));
    }

    #[test]
    fn test_failed_load_returns_to_unloaded() {
        let mut engine = Engine::new();
        let result = engine.load_with(|| {
            Err(Error::InvalidParameter {
                name: "model".to_string(),
                reason: "unreadable".to_string(),
            })
        });

        assert!(result.is_err());
        assert_eq!(engine.state(), EngineState::Unloaded);

        // A retry after the failure succeeds
        engine
            .load_with(|| Ok(Box::new(IdentityModel { side: 2 })))
            .unwrap();
        assert_eq!(engine.state(), EngineState::Ready);
    }
}
