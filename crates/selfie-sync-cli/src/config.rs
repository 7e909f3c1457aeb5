//! Configuration file support for selfie-sync.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/selfie-sync/config.toml` (lowest priority)
//! - Project-local: `.selfie-sync.toml` (searched up the directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Spreadsheet settings.
    pub sheet: SheetConfig,
    /// Filesystem layout.
    pub paths: PathsConfig,
    /// Face detector settings.
    pub detector: DetectorConfig,
    /// Sync settings.
    pub sync: SyncConfig,
}

/// Spreadsheet settings.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Spreadsheet identifier on the opensheet service.
    pub spreadsheet_id: Option<String>,
    /// Sheet (tab) name within the spreadsheet.
    pub sheet_name: Option<String>,
}

/// Filesystem layout.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory downloaded selfies land in.
    pub selfie_dir: Option<PathBuf>,
    /// Directory cropped faces land in.
    pub cropped_dir: Option<PathBuf>,
    /// Directory holding the JSON state files.
    pub state_dir: Option<PathBuf>,
}

/// Face detector settings.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Path of the cascade model file; defaults to the cached download.
    pub model: Option<PathBuf>,
    /// Smallest face edge considered, in pixels.
    pub min_face_size: Option<u32>,
    /// Classifier score threshold.
    pub score_thresh: Option<f64>,
}

/// Sync settings.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Sentinel filename reported when a download fails.
    pub fallback_image: Option<String>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/selfie-sync/config.toml`
    /// 2. Project-local: `.selfie-sync.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as
    /// warnings.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(size) = self.detector.min_face_size {
            if size < 8 {
                return Err(format!("detector.min_face_size must be >= 8, got {size}"));
            }
        }
        if let Some(thresh) = self.detector.score_thresh {
            if thresh <= 0.0 {
                return Err(format!("detector.score_thresh must be > 0, got {thresh}"));
            }
        }
        if let Some(ref fallback) = self.sync.fallback_image {
            if fallback.is_empty() {
                return Err("sync.fallback_image must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.sheet.spreadsheet_id = other
            .sheet
            .spreadsheet_id
            .or_else(|| self.sheet.spreadsheet_id.take());
        self.sheet.sheet_name = other
            .sheet
            .sheet_name
            .or_else(|| self.sheet.sheet_name.take());

        self.paths.selfie_dir = other
            .paths
            .selfie_dir
            .or_else(|| self.paths.selfie_dir.take());
        self.paths.cropped_dir = other
            .paths
            .cropped_dir
            .or_else(|| self.paths.cropped_dir.take());
        self.paths.state_dir = other.paths.state_dir.or_else(|| self.paths.state_dir.take());

        self.detector.model = other.detector.model.or_else(|| self.detector.model.take());
        self.detector.min_face_size = other.detector.min_face_size.or(self.detector.min_face_size);
        self.detector.score_thresh = other.detector.score_thresh.or(self.detector.score_thresh);

        self.sync.fallback_image = other
            .sync
            .fallback_image
            .or_else(|| self.sync.fallback_image.take());
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("selfie-sync").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.selfie-sync.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".selfie-sync.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.sheet.spreadsheet_id.is_none());
        assert!(config.paths.selfie_dir.is_none());
        assert!(config.detector.model.is_none());
    }

    #[test]
    fn test_parse_empty_config() {
        let config: AppConfig = toml::from_str("").expect("parse empty config");
        assert!(config.sheet.sheet_name.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r"
[sheet]
spreadsheet_id = '1iqLhPX7cjypuQqd741NkuWjM96AJAxOtlNPeNwXECQA'
sheet_name = 'Sheet1'

[paths]
selfie_dir = 'src/assets/selfies'
cropped_dir = 'src/assets/selfiescropped'
state_dir = '.'

[detector]
min_face_size = 24
score_thresh = 2.5

[sync]
fallback_image = 'fallback.png'
";
        let config: AppConfig = toml::from_str(toml).expect("parse full config");

        assert_eq!(
            config.sheet.spreadsheet_id.as_deref(),
            Some("1iqLhPX7cjypuQqd741NkuWjM96AJAxOtlNPeNwXECQA")
        );
        assert_eq!(config.sheet.sheet_name.as_deref(), Some("Sheet1"));
        assert_eq!(
            config.paths.selfie_dir,
            Some(PathBuf::from("src/assets/selfies"))
        );
        assert_eq!(config.detector.min_face_size, Some(24));
        assert_eq!(config.sync.fallback_image.as_deref(), Some("fallback.png"));
    }

    #[test]
    fn test_merge_override_wins() {
        let mut base: AppConfig = toml::from_str(
            r"
[sheet]
spreadsheet_id = 'base-id'
sheet_name = 'Sheet1'
",
        )
        .expect("parse base");

        let override_config: AppConfig = toml::from_str(
            r"
[sheet]
spreadsheet_id = 'override-id'
",
        )
        .expect("parse override");

        base.merge(override_config);

        assert_eq!(base.sheet.spreadsheet_id.as_deref(), Some("override-id"));
        // Untouched value preserved from base.
        assert_eq!(base.sheet.sheet_name.as_deref(), Some("Sheet1"));
    }

    #[test]
    fn test_merge_empty_override_preserves_base() {
        let mut base: AppConfig = toml::from_str(
            r"
[detector]
min_face_size = 30
",
        )
        .expect("parse base");

        base.merge(AppConfig::default());
        assert_eq!(base.detector.min_face_size, Some(30));
    }

    #[test]
    fn test_validate_min_face_size() {
        let mut config = AppConfig::default();
        config.detector.min_face_size = Some(4);

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("min_face_size"));
    }

    #[test]
    fn test_validate_score_thresh() {
        let mut config = AppConfig::default();
        config.detector.score_thresh = Some(0.0);

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("score_thresh"));
    }

    #[test]
    fn test_validate_empty_fallback() {
        let mut config = AppConfig::default();
        config.sync.fallback_image = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_syntax_is_an_error() {
        let toml = r"
[sheet
spreadsheet_id = 'x'
";
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_find_config_in_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".selfie-sync.toml"), "").unwrap();

        let found = find_config_in_parents(&nested).expect("config found upward");
        assert_eq!(found, dir.path().join(".selfie-sync.toml"));
    }
}
