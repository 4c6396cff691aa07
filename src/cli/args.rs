//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Pre-flight validation for addressable mod projects.
#[derive(Debug, Parser)]
#[command(name = "preflight")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run every check and report issues (default if no command specified)
    Check(CheckArgs),

    /// Auto-fix what can be fixed, then report what remains
    Fix(FixArgs),

    /// List the registered rules
    Rules(RulesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Output format: human, json
    #[arg(long, default_value = "human", value_parser = ["human", "json"])]
    pub format: String,

    /// Group human output: none, rule, asset
    #[arg(long, default_value = "none", value_parser = ["none", "rule", "asset"])]
    pub group_by: String,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

impl Default for CheckArgs {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            group_by: "none".to_string(),
            strict: false,
        }
    }
}

/// Arguments for the `fix` command.
#[derive(Debug, Clone, clap::Args)]
pub struct FixArgs {
    /// Output format: human, json
    #[arg(long, default_value = "human", value_parser = ["human", "json"])]
    pub format: String,

    /// Group human output of remaining issues: none, rule, asset
    #[arg(long, default_value = "none", value_parser = ["none", "rule", "asset"])]
    pub group_by: String,

    /// Treat remaining warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Only fix issues raised by this rule
    #[arg(long, value_name = "ID")]
    pub rule: Option<String>,

    /// Only fix issues on this asset
    #[arg(long, value_name = "PATH")]
    pub asset: Option<String>,
}

impl Default for FixArgs {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            group_by: "none".to_string(),
            strict: false,
            rule: None,
            asset: None,
        }
    }
}

/// Arguments for the `rules` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RulesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
