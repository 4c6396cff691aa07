//! Scan report formatters.
//!
//! This module provides formatters for writing a [`ScanReport`] in
//! different formats (human-readable, JSON).

pub mod human;
pub mod json;

use super::manager::ScanReport;
use super::registry::RuleRegistry;
use std::io::Write;

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    /// Parse a `--format` value. Unknown values fall back to human output.
    pub fn from_name(name: &str) -> Self {
        match name {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Human,
        }
    }
}

/// How human output groups issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupBy {
    /// One flat list in scan order.
    #[default]
    None,
    /// One section per rule.
    Rule,
    /// One section per asset.
    Asset,
}

impl GroupBy {
    /// Parse a `--group-by` value. Unknown values mean no grouping.
    pub fn from_name(name: &str) -> Self {
        match name {
            "rule" => GroupBy::Rule,
            "asset" => GroupBy::Asset,
            _ => GroupBy::None,
        }
    }
}

/// Trait for formatting scan output.
pub trait ReportFormatter {
    /// Format a report to the given writer. The registry resolves rule
    /// names and capabilities.
    fn format<W: Write>(
        &self,
        report: &ScanReport,
        registry: &RuleRegistry,
        writer: &mut W,
    ) -> std::io::Result<()>;
}

pub use human::HumanFormatter;
pub use json::JsonFormatter;
