//! Pre-flight rule definitions.
//!
//! This module provides the core traits and types for defining rules:
//!
//! - [`PreflightRule`] - The trait that all rules must implement
//! - [`RuleId`] - Unique identifier for a rule
//! - [`Severity`] - Severity level for issues (Info, Warning, Error)
//! - [`Scope`] - What a rule is asked to look at

use serde::Serialize;

use super::issue::Issue;
use super::observer::ScanObserver;
use crate::error::Result;
use crate::project::model::Asset;
use crate::project::Host;

/// Reserved path for the single project-wide pass of a scan.
pub const PROJECT_SCOPE: &str = "SCENE_CHECK";

/// Unique identifier for a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleId(pub String);

impl RuleId {
    /// Create a new rule ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity level for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, never blocks a build.
    Info,
    /// Should be addressed before packaging.
    Warning,
    /// Will break the build or the mod at runtime.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// What a rule is asked to look at.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    /// One registered asset.
    Asset { path: &'a str, asset: &'a Asset },
    /// The whole project, visited once per scan after every asset.
    Project,
}

impl<'a> Scope<'a> {
    /// The asset path, or [`PROJECT_SCOPE`] for the project pass.
    pub fn path(&self) -> &'a str {
        match self {
            Scope::Asset { path, .. } => path,
            Scope::Project => PROJECT_SCOPE,
        }
    }

    /// The asset, if this is an asset scope.
    pub fn asset(&self) -> Option<&'a Asset> {
        match self {
            Scope::Asset { asset, .. } => Some(asset),
            Scope::Project => None,
        }
    }

    /// Path and prefab root, when the scope is a `.prefab` asset holding a prefab.
    pub fn prefab(&self) -> Option<(&'a str, &'a crate::project::model::GameObject)> {
        match self {
            Scope::Asset { path, asset } if path.ends_with(".prefab") => {
                asset.as_prefab().map(|root| (*path, root))
            }
            _ => None,
        }
    }
}

/// Host access and scan plumbing handed to [`PreflightRule::validate`].
pub struct ScanContext<'a> {
    /// The project being scanned.
    pub host: &'a mut dyn Host,
    /// Progress and cancellation.
    pub observer: &'a mut dyn ScanObserver,
}

/// A pre-flight rule.
///
/// Each rule checks for one kind of problem and produces issues when it
/// finds it. Rules may hold caches built at construction, but are
/// otherwise stateless across calls.
pub trait PreflightRule: Send + Sync {
    /// Unique identifier for this rule.
    fn id(&self) -> RuleId;

    /// Human-readable name of the rule.
    fn name(&self) -> &str;

    /// Description of what this rule checks.
    fn description(&self) -> &str;

    /// Severity of every issue this rule produces.
    fn default_severity(&self) -> Severity;

    /// Whether this rule should validate the given scope. Must not touch
    /// the host.
    fn applies_to(&self, scope: &Scope<'_>) -> bool;

    /// Check the scope and return any issues.
    ///
    /// Missing or empty sub-fields mean there is nothing to report. An
    /// `Err` means the rule itself failed.
    fn validate(&self, scope: &Scope<'_>, ctx: &mut ScanContext<'_>) -> Result<Vec<Issue>>;

    /// Whether this rule supports auto-fix.
    fn can_auto_fix(&self) -> bool {
        false
    }

    /// Fix the asset an issue points at.
    ///
    /// Implementations persist the change before returning `Ok(true)` and
    /// report `Ok(true)` without writing when the asset is already fixed.
    fn auto_fix(&self, _issue: &Issue, _host: &mut dyn Host) -> Result<bool> {
        Ok(false)
    }
}
