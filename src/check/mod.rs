//! Pre-flight validation engine.
//!
//! Runs a fixed set of rules over every addressable asset of a project
//! before it is packaged, and optionally repairs what it can.
//!
//! # Overview
//!
//! - **Rules** - Individual checks ([`PreflightRule`] trait)
//! - **Registry** - The ordered rule set ([`RuleRegistry`])
//! - **Issues** - One violation each ([`Issue`])
//! - **Manager** - Scanning and batch auto-fix ([`CheckManager`])
//!
//! # Example
//!
//! ```
//! use preflight::check::{has_warnings, CheckManager, NoopObserver};
//! use preflight::config::RulesConfig;
//! use preflight::project::model::{Asset, Component, GameObject, SkinnedMeshRenderer};
//! use preflight::project::MemoryProject;
//!
//! let mut project = MemoryProject::new();
//! project.add_addressable(
//!     "Assets/uBody/uBody_Knight.prefab",
//!     Asset::Prefab(GameObject::new("uBody_Knight").with_component(
//!         Component::SkinnedMeshRenderer(SkinnedMeshRenderer::default()),
//!     )),
//! );
//!
//! let manager = CheckManager::new(&RulesConfig::default(), &project);
//! let report = manager.run_all_checks(&mut project, &mut NoopObserver).unwrap();
//! assert!(has_warnings(&report.issues));
//!
//! let summary = manager.auto_fix_all(&report.issues, &mut project);
//! assert_eq!(summary.assumed_fixed, 1);
//! ```

pub mod group;
pub mod issue;
pub mod manager;
pub mod observer;
pub mod output;
pub mod registry;
pub mod rule;
pub mod rules;

pub use issue::{Issue, ObjectRef};
pub use manager::{
    has_errors, has_warnings, CheckManager, FixFailure, FixSummary, FixVerification, RuleFailure,
    ScanReport,
};
pub use observer::{NoopObserver, ScanObserver, ScanProgress};
pub use output::{GroupBy, HumanFormatter, JsonFormatter, OutputFormat, ReportFormatter};
pub use registry::RuleRegistry;
pub use rule::{PreflightRule, RuleId, ScanContext, Scope, Severity, PROJECT_SCOPE};
pub use rules::{
    AddressableShaderRule, ObodyAvatarRule, OffscreenUpdateRule, PrefabOverridesInScenesRule,
};
