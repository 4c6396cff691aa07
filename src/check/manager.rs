//! Scan orchestration and batch auto-fix.
//!
//! [`CheckManager`] walks the addressable registry once, hands every
//! resolvable asset to the rules that apply to it, then runs the
//! project-wide pass. Rule failures are isolated per invocation and never
//! abort a scan.

use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Local};
use indexmap::IndexMap;

use super::issue::Issue;
use super::observer::{NoopObserver, ScanObserver, ScanProgress};
use super::registry::RuleRegistry;
use super::rule::{PreflightRule, RuleId, ScanContext, Scope, Severity};
use crate::config::RulesConfig;
use crate::error::{PreflightError, Result};
use crate::project::{AssetDatabase, Host};

/// A rule invocation that returned an error or panicked.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFailure {
    pub rule_id: RuleId,
    /// Asset being validated, or the project-scope path.
    pub asset_path: String,
    pub message: String,
}

/// Outcome of one scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Issues in rule application order.
    pub issues: Vec<Issue>,
    /// Registry entries that resolved to an asset.
    pub assets_scanned: usize,
    /// Registry entries whose GUID or asset did not resolve.
    pub entries_skipped: usize,
    pub rule_failures: Vec<RuleFailure>,
    /// Set when the observer stopped the scan early.
    pub cancelled: bool,
    pub completed_at: DateTime<Local>,
}

impl ScanReport {
    fn new() -> Self {
        Self {
            issues: Vec::new(),
            assets_scanned: 0,
            entries_skipped: 0,
            rule_failures: Vec::new(),
            cancelled: false,
            completed_at: Local::now(),
        }
    }

    /// A completed report holding just these issues.
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        Self {
            issues,
            ..Self::new()
        }
    }

    pub fn has_errors(&self) -> bool {
        has_errors(&self.issues)
    }

    pub fn has_warnings(&self) -> bool {
        has_warnings(&self.issues)
    }

    /// Number of issues at the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == severity)
            .count()
    }
}

/// A fix call that did not succeed.
#[derive(Debug, Clone, PartialEq)]
pub struct FixFailure {
    pub asset_path: String,
    pub rule_id: RuleId,
    pub message: String,
}

/// Outcome of [`CheckManager::auto_fix_all`].
///
/// A successful fix call is assumed to resolve every fixable issue on that
/// asset, so `assumed_fixed` can overstate what actually changed. Use
/// [`CheckManager::auto_fix_all_verified`] for a re-checked count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixSummary {
    /// Fix calls issued, one per asset.
    pub fix_calls: usize,
    /// Issues counted as fixed because their asset's fix call succeeded.
    pub assumed_fixed: usize,
    /// Assets whose fix call succeeded, in first-seen order.
    pub fixed_assets: Vec<String>,
    pub failures: Vec<FixFailure>,
}

/// Re-scan after a batch fix.
#[derive(Debug, Clone)]
pub struct FixVerification {
    /// Fixable issues that no longer appear.
    pub resolved: usize,
    /// Fixable issues that still appear.
    pub still_present: usize,
    /// The re-scan itself.
    pub report: ScanReport,
}

/// Whether any issue is an error.
pub fn has_errors(issues: &[Issue]) -> bool {
    issues.iter().any(|issue| issue.severity() == Severity::Error)
}

/// Whether any issue is a warning.
pub fn has_warnings(issues: &[Issue]) -> bool {
    issues.iter().any(|issue| issue.severity() == Severity::Warning)
}

/// Runs the registered rules over a project.
pub struct CheckManager {
    rules_config: RulesConfig,
    registry: RuleRegistry,
}

impl CheckManager {
    /// Build the built-in rules, reading rule caches from `db`.
    pub fn new(rules_config: &RulesConfig, db: &dyn AssetDatabase) -> Self {
        Self {
            rules_config: rules_config.clone(),
            registry: RuleRegistry::with_builtins(rules_config, db),
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut RuleRegistry {
        &mut self.registry
    }

    /// Rebuild the built-in rules and their caches after the registry
    /// changed. Rules registered by hand are dropped.
    pub fn refresh(&mut self, db: &dyn AssetDatabase) {
        self.registry = RuleRegistry::with_builtins(&self.rules_config, db);
    }

    /// Scan every addressable asset, then run the project-wide pass.
    ///
    /// # Errors
    ///
    /// Returns `SettingsMissing` when the project has no addressable
    /// settings. Nothing else fails a scan.
    pub fn run_all_checks(
        &self,
        host: &mut dyn Host,
        observer: &mut dyn ScanObserver,
    ) -> Result<ScanReport> {
        let guids: Vec<String> = match host.addressable_settings() {
            Some(settings) => settings
                .entries()
                .map(|(_, entry)| entry.guid.clone())
                .collect(),
            None => {
                let err = PreflightError::SettingsMissing;
                tracing::error!("{}", err);
                return Err(err);
            }
        };

        let mut report = ScanReport::new();
        let total = guids.len();

        for (index, guid) in guids.iter().enumerate() {
            if observer.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let Some(path) = host.guid_to_asset_path(guid).filter(|p| !p.is_empty()) else {
                tracing::debug!("Skipping unresolved entry {}", guid);
                report.entries_skipped += 1;
                continue;
            };
            observer.on_progress(ScanProgress::Asset {
                path: &path,
                index,
                total,
            });

            let Some(asset) = host.load_asset(&path) else {
                tracing::debug!("Skipping unloadable asset {}", path);
                report.entries_skipped += 1;
                continue;
            };
            report.assets_scanned += 1;

            let scope = Scope::Asset {
                path: &path,
                asset: &asset,
            };
            self.apply_rules(&scope, host, observer, &mut report);
        }

        if !report.cancelled {
            self.apply_rules(&Scope::Project, host, observer, &mut report);
            report.cancelled = observer.is_cancelled();
        }

        report.completed_at = Local::now();
        tracing::info!(
            "Pre-flight check complete. Found {} issues.",
            report.issues.len()
        );
        Ok(report)
    }

    fn apply_rules(
        &self,
        scope: &Scope<'_>,
        host: &mut dyn Host,
        observer: &mut dyn ScanObserver,
        report: &mut ScanReport,
    ) {
        for rule in self.registry.iter() {
            let outcome = isolated(rule, || Ok(rule.applies_to(scope))).and_then(|applies| {
                if !applies {
                    return Ok(Vec::new());
                }
                let mut ctx = ScanContext {
                    host: &mut *host,
                    observer: &mut *observer,
                };
                isolated(rule, || rule.validate(scope, &mut ctx))
            });

            match outcome {
                Ok(issues) => report.issues.extend(issues),
                Err(e) => {
                    tracing::warn!("Rule '{}' failed on {}: {}", rule.id(), scope.path(), e);
                    report.rule_failures.push(RuleFailure {
                        rule_id: rule.id(),
                        asset_path: scope.path().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    /// Fix every auto-fixable issue, one fix call per asset.
    ///
    /// Issues are grouped by asset path in first-seen order and only the
    /// first issue of each group is handed to its rule. The host is
    /// refreshed once afterwards if anything was fixed.
    pub fn auto_fix_all(&self, issues: &[Issue], host: &mut dyn Host) -> FixSummary {
        let mut by_asset: IndexMap<&str, Vec<&Issue>> = IndexMap::new();
        for issue in issues {
            if self
                .registry
                .get(issue.rule_id())
                .is_some_and(|rule| rule.can_auto_fix())
            {
                by_asset.entry(issue.asset_path()).or_default().push(issue);
            }
        }

        let mut summary = FixSummary::default();

        for (asset_path, group) in by_asset {
            let first = group[0];
            let Some(rule) = self.registry.get(first.rule_id()) else {
                continue;
            };

            summary.fix_calls += 1;
            let outcome = match isolated(rule, || rule.auto_fix(first, &mut *host)) {
                Ok(true) => Ok(()),
                Ok(false) => Err("fix reported no success".to_string()),
                Err(e) => Err(e.to_string()),
            };

            match outcome {
                Ok(()) => {
                    summary.assumed_fixed += group.len();
                    summary.fixed_assets.push(asset_path.to_string());
                }
                Err(message) => {
                    tracing::warn!("Could not fix {}: {}", asset_path, message);
                    summary.failures.push(FixFailure {
                        asset_path: asset_path.to_string(),
                        rule_id: rule.id(),
                        message,
                    });
                }
            }
        }

        if summary.assumed_fixed > 0 {
            if let Err(e) = host.refresh() {
                tracing::warn!("Refresh after auto-fix failed: {}", e);
            }
            tracing::info!(
                "Fixed {} issue(s) across {} asset(s)",
                summary.assumed_fixed,
                summary.fixed_assets.len()
            );
        }

        summary
    }

    /// [`auto_fix_all`](Self::auto_fix_all), then re-scan and count which
    /// fixable issues are really gone.
    ///
    /// # Errors
    ///
    /// Fails only if the re-scan cannot run.
    pub fn auto_fix_all_verified(
        &self,
        issues: &[Issue],
        host: &mut dyn Host,
    ) -> Result<(FixSummary, FixVerification)> {
        let fixable: Vec<&Issue> = issues
            .iter()
            .filter(|issue| {
                self.registry
                    .get(issue.rule_id())
                    .is_some_and(|rule| rule.can_auto_fix())
            })
            .collect();

        let summary = self.auto_fix_all(issues, host);
        let report = self.run_all_checks(host, &mut NoopObserver)?;

        let still_present = fixable
            .iter()
            .filter(|before| report.issues.iter().any(|after| after == **before))
            .count();

        let verification = FixVerification {
            resolved: fixable.len() - still_present,
            still_present,
            report,
        };
        Ok((summary, verification))
    }
}

/// Run one rule call, turning a panic into `RulePanicked`.
fn isolated<T>(rule: &dyn PreflightRule, call: impl FnOnce() -> Result<T>) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => Err(PreflightError::RulePanicked {
            rule: rule.id().to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
