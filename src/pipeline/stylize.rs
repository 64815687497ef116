//! Main stylization pipeline.

use std::path::{Path, PathBuf};

use image::{imageops::FilterType, DynamicImage, RgbImage, RgbaImage};

use crate::engine::{Engine, EngineState, OnnxModel, StyleModel};
use crate::error::{Error, Result};
use crate::image::{bitmap_to_tensor, load_image, save_image, tensor_to_bitmap, MODEL_IMAGE_SIZE};
use crate::model::ModelLocator;

/// Configuration for the stylization pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit generator file; resolved via the usual locations when unset.
    pub model: Option<PathBuf>,

    /// Output JPEG quality (1-100).
    pub output_quality: u8,

    /// Resize the stylized output back to the input's original dimensions.
    pub restore_dimensions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: None,
            output_quality: 95,
            restore_dimensions: true,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.output_quality) {
            return Err(Error::InvalidParameter {
                name: "output_quality".to_string(),
                reason: "must be between 1 and 100".to_string(),
            });
        }

        Ok(())
    }
}

/// Owns the engine and runs photo -> cartoon requests one at a time.
///
/// All stages of a request (load, normalize, invoke, denormalize, save)
/// run sequentially on the calling thread; `&mut self` keeps a second
/// request from entering while one is in flight.
pub struct Pipeline {
    config: Config,
    engine: Engine,
}

impl Pipeline {
    /// Create a pipeline, resolving and loading the generator.
    ///
    /// Downloads the published export into the cache on first use if the
    /// generator is not found locally.
    ///
    /// # Errors
    ///
    /// Returns an error if the generator cannot be located or loaded.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        tracing::info!("Initializing pipeline with config: {config:?}");

        let locator = ModelLocator::new()?;
        let model_path = locator.resolve(config.model.as_deref())?;

        tracing::info!("Loading generator from {}", model_path.display());
        let mut engine = Engine::new();
        engine.load_with(|| {
            Ok(Box::new(OnnxModel::from_file(&model_path)?) as Box<dyn StyleModel>)
        })?;

        tracing::info!("Pipeline ready");

        Ok(Self { config, engine })
    }

    /// Create a pipeline around a caller-supplied generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_model(config: Config, model: Box<dyn StyleModel>) -> Result<Self> {
        config.validate()?;

        let mut engine = Engine::new();
        engine.load_with(|| Ok(model))?;

        Ok(Self { config, engine })
    }

    /// Stylize one image file and write the result.
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the input photo
    /// * `output_path` - Path to save the stylized image
    ///
    /// # Errors
    ///
    /// Returns an error if any stage of the request fails. The request is
    /// aborted at the failing stage; nothing is retried.
    pub fn process<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        input_path: P,
        output_path: Q,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        tracing::info!("Processing image: {}", input_path.display());

        let (bitmap, original_dims) = load_image(input_path)?;

        let stylized = self.stylize_bitmap(&bitmap)?;

        let restore = self.config.restore_dimensions.then_some(original_dims);

        tracing::info!("Saving output to: {}", output_path.display());
        save_image(&stylized, output_path, restore, self.config.output_quality)?;

        tracing::info!("Processing complete");
        Ok(())
    }

    /// Stylize an in-memory image.
    ///
    /// The image is resized to the generator's 224x224 input before
    /// normalization; the returned bitmap has the generator's dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if normalization or inference fails.
    pub fn stylize(&mut self, img: &DynamicImage) -> Result<RgbaImage> {
        let bitmap = img
            .resize_exact(MODEL_IMAGE_SIZE, MODEL_IMAGE_SIZE, FilterType::Lanczos3)
            .to_rgb8();
        self.stylize_bitmap(&bitmap)
    }

    fn stylize_bitmap(&mut self, bitmap: &RgbImage) -> Result<RgbaImage> {
        tracing::debug!("Normalizing input");
        let buffer = bitmap_to_tensor(bitmap)?;

        tracing::debug!("Running inference");
        let output = self.engine.run(&buffer)?;

        tracing::debug!("Denormalizing output");
        tensor_to_bitmap(&output)
    }

    /// Engine lifecycle state.
    #[must_use]
    pub fn engine_state(&self) -> EngineState {
        self.engine.state()
    }

    /// Shut the engine down. Idempotent; later requests fail with
    /// [`Error::EngineNotReady`].
    pub fn close(&mut self) {
        self.engine.close();
    }
}
