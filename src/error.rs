//! Error types for pre-flight operations.
//!
//! This module defines [`PreflightError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `PreflightError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `PreflightError::Other`) for unexpected errors
//! - A scan never propagates a single rule's failure; those are collected
//!   into the scan report instead

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pre-flight operations.
#[derive(Debug, Error)]
pub enum PreflightError {
    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The project has no addressable settings, so no scan can run.
    #[error("Addressable settings not found. Cannot run pre-flight checks.")]
    SettingsMissing,

    /// An asset path did not resolve to anything in the project.
    #[error("Asset not found: {path}")]
    AssetNotFound { path: String },

    /// An asset exists but its contents could not be read.
    #[error("Failed to parse asset {path}: {message}")]
    AssetParseError { path: String, message: String },

    /// An operation that needs a prefab was handed some other asset.
    #[error("Asset is not a prefab: {path}")]
    NotAPrefab { path: String },

    /// A scene path could not be opened.
    #[error("Scene not found: {path}")]
    SceneNotFound { path: String },

    /// A rule call panicked.
    #[error("Rule '{rule}' panicked: {message}")]
    RulePanicked { rule: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for pre-flight operations.
pub type Result<T> = std::result::Result<T, PreflightError>;
