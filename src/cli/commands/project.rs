//! Project loading shared by the scanning commands.

use std::path::Path;

use crate::check::{
    has_errors, has_warnings, CheckManager, GroupBy, HumanFormatter, Issue, JsonFormatter,
    OutputFormat, ReportFormatter, RuleRegistry, ScanReport,
};
use crate::config::{load_config, FailOn, PreflightConfig};
use crate::error::{PreflightError, Result};
use crate::project::{FsProject, ProjectLayout};
use crate::ui::UserInterface;

use super::dispatcher::CommandResult;

/// Exit code when the build gate fails.
pub const EXIT_GATE_FAILED: i32 = 1;

/// Exit code when a scan could not run at all.
pub const EXIT_SCAN_FAILED: i32 = 2;

/// A project opened from disk with its configuration and rules.
pub struct LoadedProject {
    pub config: PreflightConfig,
    pub project: FsProject,
    pub manager: CheckManager,
}

impl LoadedProject {
    /// Load configuration, index the project and build the rule set.
    pub fn open(project_root: &Path) -> Result<Self> {
        let config = load_config(project_root)?;
        let layout = ProjectLayout {
            assets_dir: config.settings.assets_dir.clone(),
            addressables: config.settings.addressables.clone(),
        };
        let project = FsProject::open(project_root, layout)?;
        let manager = CheckManager::new(&config.rules, &project);
        tracing::debug!(
            "Loaded {} rule(s) for {}",
            manager.registry().len(),
            project_root.display()
        );

        Ok(Self {
            config,
            project,
            manager,
        })
    }
}

/// Report an error that stopped a scan before it produced results.
pub fn scan_failed(ui: &mut dyn UserInterface, err: &PreflightError) -> CommandResult {
    match err {
        PreflightError::ConfigParseError { path, message } => {
            ui.error(&format!("Parse error in {}: {}", path.display(), message));
        }
        other => ui.error(&other.to_string()),
    }
    CommandResult::failure(EXIT_SCAN_FAILED)
}

/// Whether the remaining issues fail the build gate.
///
/// `strict` fails on warnings regardless of the configured threshold.
pub fn gate_fails(issues: &[Issue], fail_on: FailOn, strict: bool) -> bool {
    if strict {
        return has_errors(issues) || has_warnings(issues);
    }
    match fail_on {
        FailOn::Error => has_errors(issues),
        FailOn::Warning => has_errors(issues) || has_warnings(issues),
        FailOn::Never => false,
    }
}

/// Render a report in the requested format.
pub fn render_report(
    report: &ScanReport,
    registry: &RuleRegistry,
    format: OutputFormat,
    group_by: GroupBy,
    use_color: bool,
) -> String {
    let mut output = Vec::new();
    match format {
        OutputFormat::Json => {
            JsonFormatter::new()
                .format(report, registry, &mut output)
                .ok();
        }
        OutputFormat::Human => {
            HumanFormatter::new(use_color)
                .with_group_by(group_by)
                .format(report, registry, &mut output)
                .ok();
        }
    }
    String::from_utf8(output).unwrap_or_default()
}
