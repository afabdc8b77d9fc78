//! Gallery configuration.
//!
//! Handles loading and validating `config.toml`. Every value has a
//! stock default, so a gallery builds with no config file at all. A config
//! file is sparse: it names only the values it overrides.
//!
//! ## Config File Location
//!
//! The builder looks for `config.toml` in the source root. `--config <FILE>`
//! points at an explicit file instead.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! gallery_name = "Hall of Light"  # Top-level page title and first breadcrumb
//! extension = "jpeg"              # Photo extension read and written
//! quality = 90                    # JPEG encoding quality (1-100)
//! # stylesheet = "carousel.css"   # Copied to <target>/carousel.css (omit for built-in)
//!
//! [bounds]
//! view = [700, 500]               # Photo page image (width, height)
//! preview = [200, 200]            # Thumbnail in directory listings
//! directory = [100, 100]          # Directory thumbnail from .preview.<ext>
//!
//! [staleness]
//! directories = "shallow"         # "shallow" or "recursive"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::naming::NamingPolicy;
use crate::staleness::DirectoryPolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Display name of the gallery (title of the top-level page).
    pub gallery_name: String,
    /// Extension of source photos, also used for every generated image.
    pub extension: String,
    /// JPEG encoding quality for resized variants.
    pub quality: u8,
    /// Stylesheet to publish as `carousel.css`. `None` uses the built-in one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<PathBuf>,
    /// Bounding boxes for the resized variants.
    pub bounds: BoundsConfig,
    /// Rebuild policy.
    pub staleness: StalenessConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            gallery_name: "Hall of Light".to_string(),
            extension: "jpeg".to_string(),
            quality: 90,
            stylesheet: None,
            bounds: BoundsConfig::default(),
            staleness: StalenessConfig::default(),
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quality == 0 || self.quality > 100 {
            return Err(ConfigError::Validation("quality must be 1-100".into()));
        }
        if self.extension.is_empty() || self.extension.contains(['.', '/']) {
            return Err(ConfigError::Validation(
                "extension must be a bare extension like \"jpeg\"".into(),
            ));
        }
        for (name, bounds) in [
            ("view", self.bounds.view),
            ("preview", self.bounds.preview),
            ("directory", self.bounds.directory),
        ] {
            if bounds[0] == 0 || bounds[1] == 0 {
                return Err(ConfigError::Validation(format!(
                    "bounds.{name} values must be non-zero"
                )));
            }
        }
        Ok(())
    }

    /// Naming rules for this gallery.
    pub fn naming(&self) -> NamingPolicy {
        NamingPolicy::new(&self.gallery_name)
    }
}

/// Bounding boxes as `[width, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoundsConfig {
    pub view: [u32; 2],
    pub preview: [u32; 2],
    pub directory: [u32; 2],
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            view: [700, 500],
            preview: [200, 200],
            directory: [100, 100],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StalenessConfig {
    /// How a directory's modification time is derived.
    pub directories: DirectoryPolicy,
}

// =============================================================================
// Config loading
// =============================================================================

/// Load `config.toml` from `dir`, falling back to defaults when absent.
pub fn load_config(dir: &Path) -> Result<GalleryConfig, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(GalleryConfig::default());
    }
    load_config_file(&config_path)
}

/// Load an explicit config file. The file must exist.
///
/// Keys missing from the file keep their defaults; the result is validated
/// before it is returned.
pub fn load_config_file(path: &Path) -> Result<GalleryConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GalleryConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
