//! Preflight - validation before an addressable content build.
//!
//! Preflight scans every asset registered for addressable packaging,
//! reports rule violations that would break the build or the mod at
//! runtime, and repairs the ones that can be repaired mechanically.
//!
//! # Modules
//!
//! - [`check`] - Rules, the check manager, grouping and report formatters
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and merging
//! - [`error`] - Error types and result aliases
//! - [`project`] - Project model and the host interfaces rules run against
//! - [`ui`] - Terminal output, progress bar and styling
//!
//! # Example
//!
//! ```
//! use preflight::check::{has_errors, CheckManager, NoopObserver};
//! use preflight::config::RulesConfig;
//! use preflight::project::model::{Asset, GameObject};
//! use preflight::project::MemoryProject;
//!
//! let mut project = MemoryProject::new();
//! project.add_addressable("Assets/oBody/oBody_Crate.prefab", Asset::Prefab(GameObject::new("oBody_Crate")));
//!
//! let manager = CheckManager::new(&RulesConfig::default(), &project);
//! let report = manager.run_all_checks(&mut project, &mut NoopObserver).unwrap();
//! assert!(has_errors(&report.issues));
//! ```
//!
//! For file-based projects, see the integration tests.

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod project;
pub mod ui;

pub use error::{PreflightError, Result};
