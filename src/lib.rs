//! # cartoonize
//!
//! A library for turning photos into cartoon-style renderings with a
//! pre-trained `CartoonGAN` generator, executed locally through ONNX
//! Runtime.
//!
//! The pipeline converts a photo into the normalized tensor the generator
//! expects, runs the model, and converts the output tensor back into a
//! displayable bitmap.
//!
//! ## Example
//!
//! ```no_run
//! use cartoonize::{Config, Pipeline};
//!
//! # fn main() -> cartoonize::Result<()> {
//! let config = Config::default();
//! let mut pipeline = Pipeline::new(config)?;
//!
//! pipeline.process("photo.jpg", "cartoon.png")?;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod image;
pub mod model;
pub mod pipeline;

pub use engine::{Engine, EngineState, OnnxModel, StyleModel};
pub use error::{Error, Result};
pub use pipeline::{Config, Pipeline};
