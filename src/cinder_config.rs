//! Unified configuration for cinder.
//!
//! Reads `.cinder/cinder.toml` with sensible defaults and layered overrides
//! (file → CLI flags). Expected shape:
//!
//! ```toml
//! [model]
//! name = "glm-4.7"
//!
//! [compression]
//! enabled = true
//! threshold = 80
//! strategy = "summary"
//! preserve_tool_history = false
//! preserve_recent_messages = 10
//! notify_before_compression = false
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::compression::CompressionConfig;

/// Name of the per-project state directory.
pub const CINDER_DIR: &str = ".cinder";

/// Configuration file name inside the state directory.
pub const CONFIG_FILE: &str = "cinder.toml";

/// Session file name inside the state directory.
pub const SESSION_FILE: &str = "session.json";

/// Template written by `cinder config init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# cinder configuration

[model]
name = "glm-4.7"

[compression]
enabled = true
threshold = 80
strategy = "summary"
preserve_tool_history = false
preserve_recent_messages = 10
notify_before_compression = false
"#;

/// Model selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSection {
    /// Model identifier, matched against the limit table by substring.
    #[serde(default = "default_model_name")]
    pub name: String,
}

fn default_model_name() -> String {
    "glm-4.7".to_string()
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            name: default_model_name(),
        }
    }
}

/// The full `cinder.toml` contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CinderToml {
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub compression: CompressionConfig,
}

/// Resolve the state directory for a project.
pub fn get_cinder_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(CINDER_DIR)
}

impl CinderToml {
    /// Path of the config file under `project_dir`.
    pub fn path(project_dir: &Path) -> PathBuf {
        get_cinder_dir(project_dir).join(CONFIG_FILE)
    }

    /// Load the config file, or defaults when it does not exist.
    ///
    /// A present but malformed or out-of-domain file fails loudly; silent
    /// fallback would mask a configuration defect.
    pub fn load_or_default(project_dir: &Path) -> Result<Self> {
        let path = Self::path(project_dir);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Invalid TOML in {}", path.display()))?;
        config
            .compression
            .validate()
            .with_context(|| format!("Invalid compression settings in {}", path.display()))?;
        Ok(config)
    }

    /// Write the default template, creating the state directory if needed.
    ///
    /// Returns false when a config file already exists.
    pub fn init(project_dir: &Path) -> Result<bool> {
        let path = Self::path(project_dir);
        if path.exists() {
            return Ok(false);
        }
        let dir = get_cinder_dir(project_dir);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(true)
    }
}
