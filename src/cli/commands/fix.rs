//! Fix command implementation.
//!
//! The `preflight fix` command scans, repairs every auto-fixable issue,
//! re-scans and gates on what remains. `--rule` and `--asset` narrow the
//! repair to one rule's issues or one asset's.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::check::{
    FixSummary, FixVerification, GroupBy, Issue, JsonFormatter, OutputFormat, RuleId,
    RuleRegistry,
};
use crate::cli::args::FixArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::project::{
    gate_fails, render_report, scan_failed, LoadedProject, EXIT_GATE_FAILED, EXIT_SCAN_FAILED,
};

/// The fix command implementation.
pub struct FixCommand {
    project_root: PathBuf,
    args: FixArgs,
}

#[derive(Serialize)]
struct JsonFixOutcome<'a> {
    fix_calls: usize,
    assumed_fixed: usize,
    resolved: usize,
    still_present: usize,
    fixed_assets: &'a [String],
    failures: Vec<JsonFixFailure<'a>>,
}

#[derive(Serialize)]
struct JsonFixFailure<'a> {
    asset_path: &'a str,
    rule_id: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct JsonFixOutput<'a> {
    fix: JsonFixOutcome<'a>,
    report: serde_json::Value,
}

impl FixCommand {
    /// Create a new fix command.
    pub fn new(project_root: &Path, args: FixArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }

    /// Issues matching the `--rule` and `--asset` filters.
    fn select(&self, issues: &[Issue]) -> Vec<Issue> {
        issues
            .iter()
            .filter(|issue| {
                self.args
                    .rule
                    .as_deref()
                    .is_none_or(|rule| issue.rule_id().as_str() == rule)
            })
            .filter(|issue| {
                self.args
                    .asset
                    .as_deref()
                    .is_none_or(|asset| issue.asset_path() == asset)
            })
            .cloned()
            .collect()
    }

    fn render_json(
        &self,
        summary: &FixSummary,
        verification: &FixVerification,
        registry: &RuleRegistry,
    ) -> Result<String> {
        let output = JsonFixOutput {
            fix: JsonFixOutcome {
                fix_calls: summary.fix_calls,
                assumed_fixed: summary.assumed_fixed,
                resolved: verification.resolved,
                still_present: verification.still_present,
                fixed_assets: &summary.fixed_assets,
                failures: summary
                    .failures
                    .iter()
                    .map(|f| JsonFixFailure {
                        asset_path: &f.asset_path,
                        rule_id: f.rule_id.as_str(),
                        message: &f.message,
                    })
                    .collect(),
            },
            report: JsonFormatter::new()
                .to_value(&verification.report, registry)
                .map_err(anyhow::Error::from)?,
        };
        Ok(serde_json::to_string_pretty(&output).map_err(anyhow::Error::from)?)
    }

    fn report_human(
        &self,
        ui: &mut dyn UserInterface,
        summary: &FixSummary,
        verification: &FixVerification,
    ) {
        if summary.fix_calls == 0 {
            ui.message("Nothing to auto-fix.");
        } else {
            ui.success(&format!(
                "Fixed {} issue(s) across {} asset(s)",
                verification.resolved,
                summary.fixed_assets.len()
            ));
        }

        for failure in &summary.failures {
            ui.warning(&format!(
                "Could not fix {} ({}): {}",
                failure.asset_path, failure.rule_id, failure.message
            ));
        }
        if verification.still_present > 0 {
            ui.warning(&format!(
                "{} fixable issue(s) still present after auto-fix",
                verification.still_present
            ));
        }
        if ui.output_mode().shows_detail() {
            ui.message(&format!(
                "{} fix call(s), {} issue(s) reported fixed",
                summary.fix_calls, summary.assumed_fixed
            ));
        }
    }
}

impl Command for FixCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut loaded = match LoadedProject::open(&self.project_root) {
            Ok(loaded) => loaded,
            Err(e) => return Ok(scan_failed(ui, &e)),
        };
        let format = OutputFormat::from_name(&self.args.format);

        if let Some(rule) = &self.args.rule {
            if loaded.manager.registry().get(&RuleId::new(rule)).is_none() {
                ui.error(&format!("Unknown rule: {}", rule));
                return Ok(CommandResult::failure(EXIT_SCAN_FAILED));
            }
        }

        let scanned = {
            let mut observer = ui.start_scan();
            loaded
                .manager
                .run_all_checks(&mut loaded.project, observer.as_mut())
        };
        let report = match scanned {
            Ok(report) => report,
            Err(e) => return Ok(scan_failed(ui, &e)),
        };

        let selected = self.select(&report.issues);
        tracing::debug!(
            "Selected {} of {} issue(s) for auto-fix",
            selected.len(),
            report.issues.len()
        );
        let (summary, verification) = match loaded
            .manager
            .auto_fix_all_verified(&selected, &mut loaded.project)
        {
            Ok(outcome) => outcome,
            Err(e) => return Ok(scan_failed(ui, &e)),
        };

        let registry = loaded.manager.registry();
        match format {
            OutputFormat::Json => {
                let output = self.render_json(&summary, &verification, registry)?;
                ui.message(&output);
            }
            OutputFormat::Human => {
                self.report_human(ui, &summary, &verification);
                let output = render_report(
                    &verification.report,
                    registry,
                    format,
                    GroupBy::from_name(&self.args.group_by),
                    ui.use_color(),
                );
                ui.message(output.trim_end());
            }
        }

        let remaining = &verification.report.issues;
        if gate_fails(remaining, loaded.config.settings.fail_on, self.args.strict) {
            return Ok(CommandResult::failure(EXIT_GATE_FAILED));
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::project::fixture;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn run(root: &Path, args: FixArgs) -> (CommandResult, MockUI) {
        let mut ui = MockUI::new();
        let result = FixCommand::new(root, args).execute(&mut ui).unwrap();
        (result, ui)
    }

    #[test]
    fn fixes_offscreen_updates_on_disk() {
        let temp = fixture::ubody_project();
        let (result, ui) = run(temp.path(), FixArgs::default());

        assert!(result.success);
        assert_eq!(ui.successes(), ["Fixed 1 issue(s) across 1 asset(s)"]);
        assert!(ui.has_message("No issues found!"));

        let saved =
            fs::read_to_string(temp.path().join("Assets/uBody/uBody_Knight.prefab")).unwrap();
        assert!(saved.contains("update_when_offscreen: true"));
    }

    #[test]
    fn second_run_has_nothing_to_fix() {
        let temp = fixture::ubody_project();
        run(temp.path(), FixArgs::default());
        let (result, ui) = run(temp.path(), FixArgs::default());

        assert!(result.success);
        assert!(ui.has_message("Nothing to auto-fix."));
    }

    #[test]
    fn unfixable_errors_remain_and_fail() {
        let temp = fixture::obody_project();
        let (result, ui) = run(temp.path(), FixArgs::default());

        assert_eq!(result.exit_code, EXIT_GATE_FAILED);
        assert!(ui.has_message("Nothing to auto-fix."));
        assert!(ui.has_message("error[obody-avatar]"));
    }

    #[test]
    fn missing_settings_cannot_fix() {
        let temp = TempDir::new().unwrap();
        let (result, ui) = run(temp.path(), FixArgs::default());

        assert_eq!(result.exit_code, EXIT_SCAN_FAILED);
        assert!(ui.has_error("Addressable settings not found"));
    }

    fn knight_saved(root: &Path) -> bool {
        fs::read_to_string(root.join("Assets/uBody/uBody_Knight.prefab"))
            .unwrap()
            .contains("update_when_offscreen: true")
    }

    fn rogue_saved(root: &Path) -> bool {
        fs::read_to_string(root.join("Assets/uBody/uBody_Rogue.prefab"))
            .unwrap()
            .contains("update_when_offscreen: true")
    }

    #[test]
    fn asset_filter_fixes_only_that_asset() {
        let temp = fixture::ubody_project();
        fixture::second_body(temp.path());
        let args = FixArgs {
            asset: Some("Assets/uBody/uBody_Rogue.prefab".to_string()),
            ..FixArgs::default()
        };
        let (result, ui) = run(temp.path(), args);

        // the knight still warns, which the default threshold allows
        assert!(result.success);
        assert_eq!(ui.successes(), ["Fixed 1 issue(s) across 1 asset(s)"]);
        assert!(ui.has_message("warning[offscreen-update]"));
        assert!(rogue_saved(temp.path()));
        assert!(!knight_saved(temp.path()));
    }

    #[test]
    fn rule_filter_skips_other_rules() {
        let temp = fixture::ubody_project();
        let args = FixArgs {
            rule: Some("addressable-shader".to_string()),
            ..FixArgs::default()
        };
        let (result, ui) = run(temp.path(), args);

        assert!(result.success);
        assert!(ui.has_message("Nothing to auto-fix."));
        assert!(!knight_saved(temp.path()));
    }

    #[test]
    fn rule_filter_fixes_matching_rule() {
        let temp = fixture::ubody_project();
        fixture::second_body(temp.path());
        let args = FixArgs {
            rule: Some("offscreen-update".to_string()),
            ..FixArgs::default()
        };
        let (result, ui) = run(temp.path(), args);

        assert!(result.success);
        assert_eq!(ui.successes(), ["Fixed 2 issue(s) across 2 asset(s)"]);
        assert!(knight_saved(temp.path()));
        assert!(rogue_saved(temp.path()));
    }

    #[test]
    fn unknown_rule_is_rejected() {
        let temp = fixture::ubody_project();
        let args = FixArgs {
            rule: Some("no-such-rule".to_string()),
            ..FixArgs::default()
        };
        let (result, ui) = run(temp.path(), args);

        assert_eq!(result.exit_code, EXIT_SCAN_FAILED);
        assert!(ui.has_error("Unknown rule: no-such-rule"));
        assert!(!knight_saved(temp.path()));
    }

    #[test]
    fn json_reports_fix_and_remaining() {
        let temp = fixture::ubody_project();
        let args = FixArgs {
            format: "json".to_string(),
            ..FixArgs::default()
        };
        let (result, ui) = run(temp.path(), args);

        assert!(result.success);
        let json: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(json["fix"]["fix_calls"], 1);
        assert_eq!(json["fix"]["resolved"], 1);
        assert_eq!(json["fix"]["still_present"], 0);
        assert_eq!(json["fix"]["fixed_assets"][0], "Assets/uBody/uBody_Knight.prefab");
        assert_eq!(json["report"]["summary"]["total"], 0);
    }
}
