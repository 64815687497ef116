//! Generator file resolution and download.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{Error, Result};

/// Fixed name of the generator file.
pub const MODEL_FILENAME: &str = "cartoongan_generator.onnx";

/// Published ONNX export of the CartoonGAN generator.
const MODEL_URL: &str =
    "https://huggingface.co/cartoonize/cartoongan-onnx/resolve/main/cartoongan_generator.onnx";

/// Approximate download size in bytes, for progress indication.
const MODEL_APPROX_SIZE: u64 = 12_000_000; // ~12 MB

/// Resolves the generator file on disk.
///
/// Resolution order: an explicit path if given, then `models/` under the
/// working directory, then the platform cache directory (downloading the
/// published export there on first use).
pub struct ModelLocator {
    cache_dir: PathBuf,
}

impl ModelLocator {
    /// Create a new locator.
    ///
    /// Uses the platform-appropriate cache directory:
    /// - Windows: `%LOCALAPPDATA%\cartoonize\models`
    /// - Linux: `~/.cache/cartoonize/models`
    /// - macOS: `~/Library/Caches/cartoonize/models`
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created.
    pub fn new() -> Result<Self> {
        let base = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
        let cache_dir = base.join("cartoonize").join("models");

        fs::create_dir_all(&cache_dir).map_err(|source| Error::CacheDir {
            path: cache_dir.clone(),
            source,
        })?;

        Ok(Self { cache_dir })
    }

    /// Locate the generator file, downloading into the cache if it is
    /// nowhere on disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelNotFound`] if an explicit path does not
    /// exist, or a download error if fetching the export fails.
    pub fn resolve(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::ModelNotFound {
                    path: path.to_path_buf(),
                });
            }
            return Ok(path.to_path_buf());
        }

        let bundled = PathBuf::from("models").join(MODEL_FILENAME);
        if bundled.exists() {
            return Ok(bundled);
        }

        let cached = self.cache_dir.join(MODEL_FILENAME);
        if !cached.exists() {
            download_file(MODEL_URL, &cached, MODEL_FILENAME, MODEL_APPROX_SIZE)?;
        }

        Ok(cached)
    }
}

/// Download a file from a URL to a path with progress indication.
fn download_file(url: &str, path: &Path, name: &str, approx_size: u64) -> Result<()> {
    tracing::info!("Downloading {name} from {url}");

    let client = reqwest::blocking::Client::new();
    let response = client
        .get(url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|source| Error::ModelDownload {
            name: name.to_string(),
            source,
        })?;

    let total_size = response.content_length().unwrap_or(approx_size);

    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .expect("valid template")
            .progress_chars("#>-"),
    );
    pb.set_message(format!("Downloading {name}"));

    // Write to a temporary file first, then rename for atomicity
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;

    let mut reader = pb.wrap_read(response);
    std::io::copy(&mut reader, &mut file)?;

    pb.finish_with_message(format!("Downloaded {name}"));

    fs::rename(&temp_path, path)?;

    Ok(())
}
