//! Terminal user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for terminal usage
//! - [`MockUI`] for tests
//! - A scan progress bar and time formatting helpers
//!
//! # Example
//!
//! ```
//! use preflight::ui::{MockUI, OutputMode, UserInterface};
//!
//! let mut ui = MockUI::with_mode(OutputMode::Quiet);
//! ui.error("Addressable settings not found");
//! assert_eq!(ui.errors().len(), 1);
//! ```

pub mod mock;
pub mod output;
pub mod progress;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use progress::{format_duration, format_relative_time, ScanProgressBar};
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, PreflightTheme};

use crate::check::ScanObserver;

/// Abstraction over where command output goes.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Change the output mode.
    fn set_output_mode(&mut self, mode: OutputMode);

    /// Show a plain message. Always shown; used for results.
    fn message(&mut self, msg: &str);

    /// Show a success status line.
    fn success(&mut self, msg: &str);

    /// Show a warning status line.
    fn warning(&mut self, msg: &str);

    /// Show an error. Shown in every mode.
    fn error(&mut self, msg: &str);

    /// Show a section header.
    fn show_header(&mut self, title: &str);

    /// Start following a scan. Dropping the observer ends the display.
    fn start_scan(&mut self) -> Box<dyn ScanObserver>;

    /// Whether styled output should be produced.
    fn use_color(&self) -> bool;

}
