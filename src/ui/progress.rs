//! Scan progress display and time formatting.

use std::time::Duration;

use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};

use crate::check::{ScanObserver, ScanProgress};

/// A progress bar that follows a scan.
///
/// The bar length is taken from the first progress event, and switches
/// over when the scan moves from assets to scenes.
pub struct ScanProgressBar {
    bar: ProgressBar,
}

impl ScanProgressBar {
    /// Create a visible progress bar on stderr.
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:24.cyan/dim}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("█▓░"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Create a bar that never draws.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Current position and length.
    pub fn position(&self) -> (u64, Option<u64>) {
        (self.bar.position(), self.bar.length())
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ScanProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanObserver for ScanProgressBar {
    fn on_progress(&mut self, progress: ScanProgress<'_>) {
        let (index, total, label) = match progress {
            ScanProgress::Asset { index, total, .. } => (index, total, "asset"),
            ScanProgress::Scene { index, total, .. } => (index, total, "scene"),
        };
        self.bar.set_length(total as u64);
        self.bar.set_position(index as u64 + 1);
        self.bar
            .set_message(format!("{} {}", label, progress.path()));
    }
}

impl Drop for ScanProgressBar {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Format a timestamp as a relative time string (e.g., "2 minutes ago").
pub fn format_relative_time(timestamp: DateTime<Local>) -> String {
    let seconds = Local::now().signed_duration_since(timestamp).num_seconds();

    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return if minutes == 1 {
            "1 minute ago".to_string()
        } else {
            format!("{} minutes ago", minutes)
        };
    }

    let hours = minutes / 60;
    if hours < 24 {
        return if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        };
    }

    let days = hours / 24;
    if days < 30 {
        return if days == 1 {
            "yesterday".to_string()
        } else {
            format!("{} days ago", days)
        };
    }

    let months = days / 30;
    if months < 12 {
        return if months == 1 {
            "1 month ago".to_string()
        } else {
            format!("{} months ago", months)
        };
    }

    let years = months / 12;
    if years == 1 {
        "1 year ago".to_string()
    } else {
        format!("{} years ago", years)
    }
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
