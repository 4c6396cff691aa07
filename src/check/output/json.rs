//! JSON output formatter.
//!
//! Formats a scan report as machine-readable JSON for build pipelines.

use super::ReportFormatter;
use crate::check::{RuleRegistry, ScanReport, Severity};
use serde::Serialize;
use std::io::Write;

/// Formats scan output as JSON.
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    issues: Vec<JsonIssue<'a>>,
    rule_failures: Vec<JsonRuleFailure<'a>>,
    summary: JsonSummary,
    completed_at: String,
}

#[derive(Serialize)]
struct JsonIssue<'a> {
    rule_id: &'a str,
    severity: Severity,
    asset_path: &'a str,
    message: &'a str,
    object: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    component: Option<&'a str>,
    auto_fixable: bool,
}

#[derive(Serialize)]
struct JsonRuleFailure<'a> {
    rule_id: &'a str,
    asset_path: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    errors: usize,
    warnings: usize,
    info: usize,
    assets_scanned: usize,
    entries_skipped: usize,
    cancelled: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    /// Build the JSON document for a report.
    pub fn to_value(
        &self,
        report: &ScanReport,
        registry: &RuleRegistry,
    ) -> serde_json::Result<serde_json::Value> {
        let issues = report
            .issues
            .iter()
            .map(|issue| JsonIssue {
                rule_id: issue.rule_id().as_str(),
                severity: issue.severity(),
                asset_path: issue.asset_path(),
                message: issue.message(),
                object: &issue.asset().hierarchy_path,
                component: issue
                    .specific_component()
                    .map(|c| c.hierarchy_path.as_str()),
                auto_fixable: registry
                    .get(issue.rule_id())
                    .is_some_and(|rule| rule.can_auto_fix()),
            })
            .collect();

        let rule_failures = report
            .rule_failures
            .iter()
            .map(|f| JsonRuleFailure {
                rule_id: f.rule_id.as_str(),
                asset_path: &f.asset_path,
                message: &f.message,
            })
            .collect();

        serde_json::to_value(JsonOutput {
            issues,
            rule_failures,
            summary: JsonSummary {
                total: report.issues.len(),
                errors: report.count(Severity::Error),
                warnings: report.count(Severity::Warning),
                info: report.count(Severity::Info),
                assets_scanned: report.assets_scanned,
                entries_skipped: report.entries_skipped,
                cancelled: report.cancelled,
            },
            completed_at: report.completed_at.to_rfc3339(),
        })
    }
}

impl ReportFormatter for JsonFormatter {
    fn format<W: Write>(
        &self,
        report: &ScanReport,
        registry: &RuleRegistry,
        writer: &mut W,
    ) -> std::io::Result<()> {
        let value = self
            .to_value(report, registry)
            .map_err(std::io::Error::other)?;
        serde_json::to_writer_pretty(&mut *writer, &value).map_err(std::io::Error::other)?;
        writeln!(writer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{Issue, ObjectRef, RuleId};
    use crate::config::RulesConfig;
    use crate::project::MemoryProject;

    fn render(report: &ScanReport) -> serde_json::Value {
        let registry = RuleRegistry::with_builtins(&RulesConfig::default(), &MemoryProject::new());
        let mut output = Vec::new();
        JsonFormatter::new()
            .format(report, &registry, &mut output)
            .unwrap();
        serde_json::from_slice(&output).unwrap()
    }

    #[test]
    fn produces_valid_json() {
        let report = ScanReport::from_issues(vec![Issue::new(
            RuleId::new("offscreen-update"),
            Severity::Warning,
            "Assets/uBody/a.prefab",
            "msg",
            ObjectRef::new("Assets/uBody/a.prefab", "a"),
        )
        .with_component(ObjectRef::new("Assets/uBody/a.prefab", "a/Mesh"))]);

        let json = render(&report);

        assert_eq!(json["issues"][0]["rule_id"], "offscreen-update");
        assert_eq!(json["issues"][0]["severity"], "warning");
        assert_eq!(json["issues"][0]["component"], "a/Mesh");
        assert_eq!(json["issues"][0]["auto_fixable"], true);
        assert_eq!(json["summary"]["total"], 1);
        assert_eq!(json["summary"]["warnings"], 1);
        assert!(json["completed_at"].is_string());
    }

    #[test]
    fn component_omitted_when_absent() {
        let report = ScanReport::from_issues(vec![Issue::new(
            RuleId::new("obody-avatar"),
            Severity::Error,
            "Assets/oBody/a.prefab",
            "msg",
            ObjectRef::new("Assets/oBody/a.prefab", "a"),
        )]);

        let json = render(&report);

        assert!(json["issues"][0].get("component").is_none());
        assert_eq!(json["issues"][0]["auto_fixable"], false);
        assert_eq!(json["summary"]["errors"], 1);
    }

    #[test]
    fn empty_report() {
        let json = render(&ScanReport::from_issues(vec![]));
        assert_eq!(json["issues"].as_array().unwrap().len(), 0);
        assert_eq!(json["summary"]["cancelled"], false);
    }
}
