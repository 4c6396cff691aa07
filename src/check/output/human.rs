//! Human-readable output formatter.
//!
//! Formats a scan report for terminal display with optional color support.

use super::{GroupBy, ReportFormatter};
use crate::check::group::{group_by_asset, group_by_rule};
use crate::check::{Issue, RuleRegistry, ScanReport, Severity};
use crate::ui::format_relative_time;
use console::Style;
use std::io::Write;

/// Formats scan output for human consumption.
pub struct HumanFormatter {
    /// Whether to use colors (ANSI escape codes).
    pub use_color: bool,
    /// Section layout.
    pub group_by: GroupBy,
}

impl HumanFormatter {
    /// Create a new human formatter with a flat layout.
    pub fn new(use_color: bool) -> Self {
        Self {
            use_color,
            group_by: GroupBy::None,
        }
    }

    /// Choose the section layout.
    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = group_by;
        self
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.use_color {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn severity_label(&self, severity: Severity) -> String {
        let style = match severity {
            Severity::Info => Style::new().cyan(),
            Severity::Warning => Style::new().yellow().bold(),
            Severity::Error => Style::new().red().bold(),
        };
        self.paint(style, &severity.to_string())
    }

    fn write_issue<W: Write>(&self, writer: &mut W, issue: &Issue, indent: &str) -> std::io::Result<()> {
        writeln!(
            writer,
            "{}{}[{}]: {}",
            indent,
            self.severity_label(issue.severity()),
            issue.rule_id(),
            issue.message()
        )?;

        let object = issue.specific_component().unwrap_or(issue.asset());
        writeln!(
            writer,
            "{}  --> {} ({})",
            indent,
            issue.asset_path(),
            object.hierarchy_path
        )
    }

    fn write_flat<W: Write>(&self, report: &ScanReport, writer: &mut W) -> std::io::Result<()> {
        for issue in &report.issues {
            self.write_issue(writer, issue, "")?;
            writeln!(writer)?;
        }
        Ok(())
    }

    fn write_by_rule<W: Write>(
        &self,
        report: &ScanReport,
        registry: &RuleRegistry,
        writer: &mut W,
    ) -> std::io::Result<()> {
        for group in group_by_rule(&report.issues, registry) {
            let rule = group
                .issues
                .first()
                .and_then(|issue| registry.get(issue.rule_id()));
            let fixable = if rule.is_some_and(|r| r.can_auto_fix()) {
                " [auto-fixable]"
            } else {
                ""
            };

            writeln!(
                writer,
                "{} ({} issues){}",
                self.paint(Style::new().bold(), &group.title),
                group.issues.len(),
                fixable
            )?;
            if let Some(rule) = rule {
                writeln!(writer, "  {}", self.paint(Style::new().dim(), rule.description()))?;
            }
            writeln!(writer)?;
            for issue in group.issues {
                self.write_issue(writer, issue, "  ")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    fn write_by_asset<W: Write>(&self, report: &ScanReport, writer: &mut W) -> std::io::Result<()> {
        for group in group_by_asset(&report.issues) {
            writeln!(
                writer,
                "{} ({} issues)",
                self.paint(Style::new().bold(), group.file_name()),
                group.issues.len()
            )?;
            if !group.directory().is_empty() {
                writeln!(writer, "  {}", self.paint(Style::new().dim(), group.directory()))?;
            }
            for issue in &group.issues {
                writeln!(
                    writer,
                    "  {}[{}]: {}",
                    self.severity_label(issue.severity()),
                    issue.rule_id(),
                    issue.message()
                )?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

impl ReportFormatter for HumanFormatter {
    fn format<W: Write>(
        &self,
        report: &ScanReport,
        registry: &RuleRegistry,
        writer: &mut W,
    ) -> std::io::Result<()> {
        if report.issues.is_empty() && !report.rule_failures.is_empty() {
            writeln!(
                writer,
                "No issues found, but {} rule(s) failed to run",
                report.rule_failures.len()
            )?;
        } else if report.issues.is_empty() {
            writeln!(writer, "No issues found! Your build is ready.")?;
        } else {
            match self.group_by {
                GroupBy::None => self.write_flat(report, writer)?,
                GroupBy::Rule => self.write_by_rule(report, registry, writer)?,
                GroupBy::Asset => self.write_by_asset(report, writer)?,
            }
        }

        for failure in &report.rule_failures {
            writeln!(
                writer,
                "note: rule '{}' failed on {}: {}",
                failure.rule_id, failure.asset_path, failure.message
            )?;
        }
        if report.entries_skipped > 0 {
            writeln!(
                writer,
                "note: skipped {} unresolvable registry entr{}",
                report.entries_skipped,
                if report.entries_skipped == 1 { "y" } else { "ies" }
            )?;
        }
        if report.cancelled {
            writeln!(writer, "note: scan cancelled, results are partial")?;
        }

        let error_count = report.count(Severity::Error);
        let warning_count = report.count(Severity::Warning);
        if error_count > 0 || warning_count > 0 {
            writeln!(
                writer,
                "Found {} error(s) and {} warning(s)",
                error_count, warning_count
            )?;
        }

        writeln!(
            writer,
            "Last checked: {} ({})",
            report.completed_at.format("%H:%M:%S"),
            format_relative_time(report.completed_at)
        )?;

        Ok(())
    }
}
