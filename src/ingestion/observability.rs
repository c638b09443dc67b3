use std::fmt;
use std::sync::Arc;

use crate::error::SweepError;

use super::unified::FileFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    /// Warning-level event (file skipped, processing continues).
    Warning,
    /// Error-level event (the file could not be parsed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

impl LoadSeverity {
    /// Classify a load error.
    pub fn of(error: &SweepError) -> Self {
        match error {
            SweepError::Io(_) => Self::Critical,
            SweepError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            SweepError::UnsupportedFormat { .. } => Self::Warning,
            _ => Self::Error,
        }
    }
}

/// Context about a load attempt.
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// Uploaded file name.
    pub file_name: String,
    /// Format picked for the file, if the extension was recognised.
    pub format: Option<FileFormat>,
}

/// Minimal stats reported on a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of loaded rows.
    pub rows: usize,
    /// Number of loaded columns.
    pub columns: usize,
}

/// Observer interface for load outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait LoadObserver: Send + Sync {
    /// Called when a load succeeds.
    fn on_success(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    /// Called when a load fails.
    fn on_failure(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &SweepError) {}

    /// Called when a load failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &SweepError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl LoadObserver for CompositeObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &SweepError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &SweepError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Forwards load events to the `log` facade (target `data_sweeper::load`).
#[derive(Debug, Default)]
pub struct LogObserver;

const LOG_TARGET: &str = "data_sweeper::load";

impl LoadObserver for LogObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        log::info!(
            target: LOG_TARGET,
            "ok format={:?} file={} rows={} columns={}",
            ctx.format,
            ctx.file_name,
            stats.rows,
            stats.columns
        );
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &SweepError) {
        let level = match severity {
            LoadSeverity::Warning => log::Level::Warn,
            LoadSeverity::Error | LoadSeverity::Critical => log::Level::Error,
        };
        log::log!(
            target: LOG_TARGET,
            level,
            "[{severity:?}] format={:?} file={} err={error}",
            ctx.format,
            ctx.file_name
        );
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &SweepError) {
        log::error!(
            target: LOG_TARGET,
            "ALERT [{severity:?}] format={:?} file={} err={error}",
            ctx.format,
            ctx.file_name
        );
    }
}
