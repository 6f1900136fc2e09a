//! Application Configuration
//!
//! User settings stored in TOML format: matching thresholds, the projection
//! fallback policy, and the classifier endpoint.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Token matching settings
    pub matching: MatchingSettings,
    /// Overlay projection settings
    pub projection: ProjectionSettings,
    /// Ingredient classifier settings
    pub classifier: ClassifierSettings,
}

/// Settings for the token matcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingSettings {
    /// Minimum OCR confidence (0-100) for a token to be eligible
    pub min_confidence: f32,
    /// Normalized token length must be strictly greater than this to match
    pub min_token_length: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_confidence: 60.0,
            min_token_length: 3,
        }
    }
}

/// Settings for the overlay projector's degraded fallback path,
/// used when true image dimensions are unknown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSettings {
    /// Assumed image dimension for anchoring when real dimensions are missing
    pub fallback_reference_dim: f32,
    /// Fixed overlay width as a fraction of the image
    pub fallback_width: f32,
    /// Fixed overlay height as a fraction of the image
    pub fallback_height: f32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            fallback_reference_dim: 400.0,
            fallback_width: 0.15,
            fallback_height: 0.05,
        }
    }
}

/// Settings for the ingredient classifier endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Endpoint accepting `{"text": ...}` and returning `{"bad_ingredients": [...]}`
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/analyze".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "labellens", "LabelLens")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
