//! Generator file resolution.

mod loader;

pub use loader::{ModelLocator, MODEL_FILENAME};
