//! Check command implementation.
//!
//! The `preflight check` command scans every addressable asset and
//! gates on the issues it finds.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::check::{GroupBy, OutputFormat};
use crate::cli::args::CheckArgs;
use crate::error::Result;
use crate::ui::{format_duration, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::project::{gate_fails, render_report, scan_failed, LoadedProject, EXIT_GATE_FAILED};

/// The check command implementation.
pub struct CheckCommand {
    project_root: PathBuf,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(project_root: &Path, args: CheckArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &CheckArgs {
        &self.args
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut loaded = match LoadedProject::open(&self.project_root) {
            Ok(loaded) => loaded,
            Err(e) => return Ok(scan_failed(ui, &e)),
        };
        let format = OutputFormat::from_name(&self.args.format);

        let started = Instant::now();
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

        if format == OutputFormat::Human && ui.output_mode().shows_detail() {
            ui.message(&format!(
                "Scanned {} asset(s) in {}",
                report.assets_scanned,
                format_duration(started.elapsed())
            ));
        }

        let output = render_report(
            &report,
            loaded.manager.registry(),
            format,
            GroupBy::from_name(&self.args.group_by),
            ui.use_color(),
        );
        ui.message(output.trim_end());

        let fail_on = loaded.config.settings.fail_on;
        if gate_fails(&report.issues, fail_on, self.args.strict) {
            if format == OutputFormat::Human {
                let threshold = if self.args.strict {
                    "warning".to_string()
                } else {
                    fail_on.to_string()
                };
                ui.error(&format!("Pre-flight check failed (fail_on: {})", threshold));
            }
            return Ok(CommandResult::failure(EXIT_GATE_FAILED));
        }

        Ok(CommandResult::success())
    }
}
