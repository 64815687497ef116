//! Photo-to-cartoon stylization pipeline.

mod stylize;

pub use stylize::{Config, Pipeline};
