use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::DecodeError;

/// Severity classification used for observer callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TransformSeverity {
    /// Informational event (e.g. a silent skip).
    Info,
    /// Non-fatal failure; the event may carry partial output.
    Warning,
    /// The transform failed and the event was left as found.
    Error,
}

/// Context about one transform invocation.
#[derive(Debug, Clone)]
pub struct TransformContext {
    /// Display name of the transform (e.g. `decode_csv_fields=msg`).
    pub transform: String,
    /// Dotted path of the source field.
    pub field: String,
}

/// Observer interface for transform outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait TransformObserver: Send + Sync {
    /// Called when the source field was decoded and merged into the event.
    fn on_decoded(&self, _ctx: &TransformContext) {}

    /// Called on a silent skip (source field absent or not a string).
    fn on_skipped(&self, _ctx: &TransformContext) {}

    /// Called when the transform returns an error.
    fn on_failure(&self, _ctx: &TransformContext, _severity: TransformSeverity, _error: &DecodeError) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn TransformObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn TransformObserver>>) -> Self {
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

impl TransformObserver for CompositeObserver {
    fn on_decoded(&self, ctx: &TransformContext) {
        for o in &self.observers {
            o.on_decoded(ctx);
        }
    }

    fn on_skipped(&self, ctx: &TransformContext) {
        for o in &self.observers {
            o.on_skipped(ctx);
        }
    }

    fn on_failure(&self, ctx: &TransformContext, severity: TransformSeverity, error: &DecodeError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }
}

/// Logs transform outcomes to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl TransformObserver for StdErrObserver {
    fn on_decoded(&self, ctx: &TransformContext) {
        eprintln!("[transform][ok] {} field={}", ctx.transform, ctx.field);
    }

    fn on_skipped(&self, ctx: &TransformContext) {
        eprintln!("[transform][skip] {} field={}", ctx.transform, ctx.field);
    }

    fn on_failure(&self, ctx: &TransformContext, severity: TransformSeverity, error: &DecodeError) {
        eprintln!(
            "[transform][{:?}] {} field={} err={}",
            severity, ctx.transform, ctx.field, error
        );
    }
}

/// Appends transform outcomes to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl TransformObserver for FileObserver {
    fn on_decoded(&self, ctx: &TransformContext) {
        self.append_line(&format!("{} ok {} field={}", unix_ts(), ctx.transform, ctx.field));
    }

    fn on_skipped(&self, ctx: &TransformContext) {
        self.append_line(&format!("{} skip {} field={}", unix_ts(), ctx.transform, ctx.field));
    }

    fn on_failure(&self, ctx: &TransformContext, severity: TransformSeverity, error: &DecodeError) {
        self.append_line(&format!(
            "{} fail severity={:?} {} field={} err={}",
            unix_ts(),
            severity,
            ctx.transform,
            ctx.field,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
