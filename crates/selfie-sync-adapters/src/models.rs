//! Detector model download and caching.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Placeholder checksum indicating verification should be skipped.
const PLACEHOLDER_CHECKSUM: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Model metadata.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model name/identifier.
    pub name: &'static str,
    /// Download URL.
    pub url: &'static str,
    /// Expected SHA256 hash. All zeros skips verification.
    pub sha256: &'static str,
    /// Filename in the models directory.
    pub filename: &'static str,
}

/// The pretrained SeetaFace frontal cascade used by the cropper.
pub const DETECTOR_MODEL: ModelInfo = ModelInfo {
    name: "seeta-frontal",
    url: "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin",
    sha256: "0000000000000000000000000000000000000000000000000000000000000000", // TODO: pin hash
    filename: "seeta_fd_frontal_v1.0.bin",
};

/// Returns the models directory path.
///
/// Uses `XDG_DATA_HOME/selfie-sync/models` or `~/.local/share/selfie-sync/models`.
#[must_use]
pub fn models_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("selfie-sync")
        .join("models")
}

/// Default path of the detector model file.
#[must_use]
pub fn model_path() -> PathBuf {
    models_dir().join(DETECTOR_MODEL.filename)
}

/// Ensures the detector model is present, downloading it if needed.
///
/// # Errors
///
/// Returns an error if the models directory cannot be created, the download
/// fails, or the checksum does not match.
pub fn ensure_model() -> Result<PathBuf> {
    let dir = models_dir();
    fs::create_dir_all(&dir).context("failed to create models directory")?;

    let path = dir.join(DETECTOR_MODEL.filename);
    if path.exists() {
        debug!("Model {} already exists", DETECTOR_MODEL.name);
    } else {
        download_model(&DETECTOR_MODEL, &path)?;
    }
    Ok(path)
}

/// Downloads a model from its URL.
fn download_model(model: &ModelInfo, path: &PathBuf) -> Result<()> {
    info!("Downloading model: {}", model.name);

    let response = reqwest::blocking::get(model.url)
        .with_context(|| format!("failed to download {}", model.name))?;

    if !response.status().is_success() {
        anyhow::bail!("download failed with status: {}", response.status());
    }

    let bytes = response
        .bytes()
        .with_context(|| format!("failed to read response for {}", model.name))?;

    if model.sha256 == PLACEHOLDER_CHECKSUM {
        debug!(
            "Skipping checksum verification for {} (placeholder checksum)",
            model.name
        );
    } else {
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = format!("{:x}", hasher.finalize());

        if hash != model.sha256 {
            anyhow::bail!(
                "checksum mismatch for {}: expected {}, got {}. \
                 Delete {} and re-run to download a fresh copy.",
                model.name,
                model.sha256,
                hash,
                path.display()
            );
        }
    }

    fs::write(path, &bytes).with_context(|| format!("failed to write {}", model.name))?;

    info!("Downloaded {} ({} bytes)", model.name, bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_dir() {
        let dir = models_dir();
        assert!(dir.ends_with("selfie-sync/models"));
    }

    #[test]
    fn test_model_path() {
        assert!(model_path().ends_with("seeta_fd_frontal_v1.0.bin"));
    }
}
