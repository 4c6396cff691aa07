//! Configuration loading for preflight.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Layering in [`merger`]
//!
//! # Example
//!
//! ```
//! use preflight::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".preflight");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "settings:\n  fail_on: warning\n").unwrap();
//!
//! let config = load_config(temp.path()).unwrap();
//! assert_eq!(config.settings.fail_on.to_string(), "warning");
//! ```
//!
//! # Configuration File Locations
//!
//! 1. Project config (`.preflight/config.yml`)
//! 2. Local overrides (`.preflight/config.local.yml`)

pub mod loader;
pub mod merger;
pub mod schema;

pub use loader::{load_config, load_config_value, ConfigPaths, CONFIG_DIR};
pub use merger::{deep_merge, merge_configs};
pub use schema::{
    FailOn, ObodyAvatarConfig, OffscreenUpdateConfig, PreflightConfig, RulesConfig, Settings,
};
