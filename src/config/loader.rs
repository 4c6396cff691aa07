//! Configuration file discovery and loading.

use crate::config::merger::merge_configs;
use crate::config::schema::PreflightConfig;
use crate::error::{PreflightError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding preflight configuration inside a project.
pub const CONFIG_DIR: &str = ".preflight";

/// Paths to configuration files in merge order (later overrides earlier).
///
/// 1. Project config (`.preflight/config.yml`)
/// 2. Local overrides (`.preflight/config.local.yml`)
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Project config: .preflight/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .preflight/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let dir = project_root.join(CONFIG_DIR);
        Self {
            project: existing(dir.join("config.yml")),
            project_local: existing(dir.join("config.local.yml")),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project
            .iter()
            .chain(self.project_local.iter())
            .collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Load a config file as a raw YAML value for merging.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| PreflightError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and merge the project's configuration.
///
/// Both files are optional; a project with neither gets the defaults.
///
/// # Errors
///
/// Returns `ConfigParseError` if a file is not valid YAML or does not
/// match the schema.
pub fn load_config(project_root: &Path) -> Result<PreflightConfig> {
    let paths = ConfigPaths::discover(project_root);

    let layers = paths
        .all_existing()
        .into_iter()
        .map(|path| load_config_value(path))
        .collect::<Result<Vec<_>>>()?;

    if layers.is_empty() {
        tracing::debug!("No config found under {}, using defaults", project_root.display());
        return Ok(PreflightConfig::default());
    }

    let merged = merge_configs(&layers);
    serde_yaml::from_value(merged).map_err(|e| PreflightError::ConfigParseError {
        path: project_root.join(CONFIG_DIR).join("config.yml"),
        message: format!("Failed to parse merged config: {}", e),
    })
}
