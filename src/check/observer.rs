//! Scan progress reporting and cancellation.

/// One step of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanProgress<'a> {
    /// About to validate a registered asset.
    Asset {
        path: &'a str,
        index: usize,
        total: usize,
    },
    /// About to inspect a scene during the project-wide pass.
    Scene {
        path: &'a str,
        index: usize,
        total: usize,
    },
}

impl ScanProgress<'_> {
    pub fn path(&self) -> &str {
        match self {
            ScanProgress::Asset { path, .. } | ScanProgress::Scene { path, .. } => path,
        }
    }
}

/// Receives scan progress and can ask the scan to stop.
///
/// Cancellation is checked between assets and between scenes; a cancelled
/// scan returns what it found so far.
pub trait ScanObserver {
    fn on_progress(&mut self, progress: ScanProgress<'_>);

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Observer that ignores progress and never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {
    fn on_progress(&mut self, _progress: ScanProgress<'_>) {}
}
