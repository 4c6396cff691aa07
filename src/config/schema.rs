//! Configuration schema definitions for preflight.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root configuration structure for `.preflight/config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreflightConfig {
    /// Global settings
    pub settings: Settings,

    /// Per-rule settings
    pub rules: RulesConfig,
}

/// Global settings that apply to every scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Lowest severity that fails the build gate
    pub fail_on: FailOn,

    /// Addressable settings file, relative to the project root
    pub addressables: String,

    /// Asset root, relative to the project root
    pub assets_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fail_on: FailOn::default(),
            addressables: "Assets/AddressableAssetsData/addressables.yml".to_string(),
            assets_dir: "Assets".to_string(),
        }
    }
}

/// Build gate threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailOn {
    /// Fail only when an error is present
    #[default]
    Error,
    /// Fail on warnings as well
    Warning,
    /// Never fail; report only
    Never,
}

impl fmt::Display for FailOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailOn::Error => write!(f, "error"),
            FailOn::Warning => write!(f, "warning"),
            FailOn::Never => write!(f, "never"),
        }
    }
}

/// Rule selection and per-rule tuning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule ids to skip entirely
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disabled: Vec<String>,

    pub offscreen_update: OffscreenUpdateConfig,

    pub obody_avatar: ObodyAvatarConfig,
}

impl RulesConfig {
    /// Whether a rule id is switched off.
    pub fn is_disabled(&self, rule_id: &str) -> bool {
        self.disabled.iter().any(|id| id == rule_id)
    }
}

/// Settings for the offscreen-update rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffscreenUpdateConfig {
    /// Path fragment that marks the model category the rule covers
    pub category_marker: String,
}

impl Default for OffscreenUpdateConfig {
    fn default() -> Self {
        Self {
            category_marker: "uBody".to_string(),
        }
    }
}

/// Settings for the oBody avatar rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObodyAvatarConfig {
    /// Any of these path fragments selects a prefab
    pub path_markers: Vec<String>,
}

impl Default for ObodyAvatarConfig {
    fn default() -> Self {
        Self {
            path_markers: vec!["/oBody/".to_string(), "oBody_".to_string()],
        }
    }
}
