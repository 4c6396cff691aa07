//! Terminal UI.

use console::Term;
use std::io::Write;

use crate::check::{NoopObserver, ScanObserver};

use super::{should_use_colors, OutputMode, PreflightTheme, ScanProgressBar, UserInterface};

/// Terminal UI writing results to stdout and errors to stderr.
pub struct TerminalUI {
    term: Term,
    err_term: Term,
    theme: PreflightTheme,
    mode: OutputMode,
    colors: bool,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let colors = should_use_colors();
        let theme = if colors {
            PreflightTheme::new()
        } else {
            PreflightTheme::plain()
        };

        Self {
            term: Term::stdout(),
            err_term: Term::stderr(),
            theme,
            mode,
            colors,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        writeln!(self.term, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err_term, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn start_scan(&mut self) -> Box<dyn ScanObserver> {
        if self.mode.shows_progress() && self.err_term.is_term() {
            Box::new(ScanProgressBar::new())
        } else {
            Box::new(NoopObserver)
        }
    }

    fn use_color(&self) -> bool {
        self.colors
    }
}

/// Create the UI for the current process.
pub fn create_ui(mode: OutputMode) -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new(mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ui_keeps_mode() {
        let mut ui = TerminalUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
        ui.set_output_mode(OutputMode::Verbose);
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
    }

    #[test]
    fn quiet_scan_has_no_progress_bar() {
        let mut ui = TerminalUI::new(OutputMode::Quiet);
        let observer = ui.start_scan();
        assert!(!observer.is_cancelled());
    }

    #[test]
    fn create_ui_uses_requested_mode() {
        let ui = create_ui(OutputMode::Verbose);
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
    }
}
