//! Rules command implementation.
//!
//! The `preflight rules` command lists the rules a scan would apply.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::check::{RuleRegistry, Severity};
use crate::cli::args::RulesArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::project::{scan_failed, LoadedProject};

/// The rules command implementation.
pub struct RulesCommand {
    project_root: PathBuf,
    args: RulesArgs,
}

#[derive(Serialize)]
struct JsonRule<'a> {
    id: String,
    name: &'a str,
    severity: Severity,
    auto_fixable: bool,
    description: &'a str,
}

impl RulesCommand {
    /// Create a new rules command.
    pub fn new(project_root: &Path, args: RulesArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }

    fn render_json(&self, registry: &RuleRegistry) -> Result<String> {
        let rules: Vec<JsonRule<'_>> = registry
            .iter()
            .map(|rule| JsonRule {
                id: rule.id().to_string(),
                name: rule.name(),
                severity: rule.default_severity(),
                auto_fixable: rule.can_auto_fix(),
                description: rule.description(),
            })
            .collect();
        Ok(serde_json::to_string_pretty(&rules).map_err(anyhow::Error::from)?)
    }
}

impl Command for RulesCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let loaded = match LoadedProject::open(&self.project_root) {
            Ok(loaded) => loaded,
            Err(e) => return Ok(scan_failed(ui, &e)),
        };
        let registry = loaded.manager.registry();

        if self.args.json {
            ui.message(&self.render_json(registry)?);
            return Ok(CommandResult::success());
        }

        ui.show_header("Rules");
        for rule in registry.iter() {
            let fix = if rule.can_auto_fix() { " (auto-fix)" } else { "" };
            ui.message(&format!(
                "{:<28} {:<8} {}{}",
                rule.id().to_string(),
                rule.default_severity().to_string(),
                rule.name(),
                fix
            ));
            ui.message(&format!("    {}", rule.description()));
        }

        let disabled = &loaded.config.rules.disabled;
        if !disabled.is_empty() {
            ui.message("");
            ui.message(&format!("Disabled: {}", disabled.join(", ")));
        }

        Ok(CommandResult::success())
    }
}
