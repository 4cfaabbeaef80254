//! Observer hooks for compile runs and table loads.
//!
//! Nothing in this crate prints on its own. Attach a [`CompileObserver`] to a
//! [`crate::execution::ProjectCompiler`] or to [`crate::ingestion::TableOptions`] to receive
//! lifecycle events and diagnostics; [`StdErrObserver`], [`FileObserver`] and
//! [`CompositeObserver`] cover the common cases.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::diagnostics::{Diagnostic, Severity, Stage};
use crate::execution::CompileMetricsSnapshot;
use crate::ingestion::TableFormat;

/// Lifecycle events.
#[derive(Debug, Clone)]
pub enum CompileEvent {
    RunStarted {
        rows: usize,
    },
    StageFinished {
        stage: Stage,
        elapsed: Duration,
        /// Number of top-level items the stage produced.
        items: usize,
    },
    TableLoaded {
        path: PathBuf,
        format: TableFormat,
        rows: usize,
    },
    RunFinished {
        elapsed: Duration,
        metrics: CompileMetricsSnapshot,
    },
}

/// Observer interface for compile runs.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait CompileObserver: Send + Sync {
    /// Called for every lifecycle event.
    fn on_event(&self, _event: &CompileEvent) {}

    /// Called for every diagnostic.
    fn on_diagnostic(&self, _diagnostic: &Diagnostic) {}

    /// Called when a diagnostic meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_diagnostic`].
    fn on_alert(&self, diagnostic: &Diagnostic) {
        self.on_diagnostic(diagnostic)
    }
}

/// Send `diagnostic` to `observer`, and to `on_alert` too when at or above `alert_at_or_above`.
pub fn report(observer: Option<&Arc<dyn CompileObserver>>, diagnostic: &Diagnostic, alert_at_or_above: Severity) {
    if let Some(obs) = observer {
        obs.on_diagnostic(diagnostic);
        if diagnostic.severity >= alert_at_or_above {
            obs.on_alert(diagnostic);
        }
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn CompileObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn CompileObserver>>) -> Self {
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

impl CompileObserver for CompositeObserver {
    fn on_event(&self, event: &CompileEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }

    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        for o in &self.observers {
            o.on_diagnostic(diagnostic);
        }
    }

    fn on_alert(&self, diagnostic: &Diagnostic) {
        for o in &self.observers {
            o.on_alert(diagnostic);
        }
    }
}

/// Logs events and diagnostics to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl CompileObserver for StdErrObserver {
    fn on_event(&self, event: &CompileEvent) {
        eprintln!("[compile] {}", describe(event));
    }

    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        eprintln!("[compile]{diagnostic}");
    }

    fn on_alert(&self, diagnostic: &Diagnostic) {
        eprintln!("[ALERT][compile]{diagnostic}");
    }
}

/// Appends events and diagnostics to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends to `path`.
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

impl CompileObserver for FileObserver {
    fn on_event(&self, event: &CompileEvent) {
        self.append_line(&format!("{} event {}", unix_ts(), describe(event)));
    }

    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        self.append_line(&format!("{} diagnostic {}", unix_ts(), diagnostic));
    }

    fn on_alert(&self, diagnostic: &Diagnostic) {
        self.append_line(&format!("{} ALERT {}", unix_ts(), diagnostic));
    }
}

fn describe(event: &CompileEvent) -> String {
    match event {
        CompileEvent::RunStarted { rows } => format!("run started rows={rows}"),
        CompileEvent::StageFinished { stage, elapsed, items } => {
            format!("stage={stage} items={items} elapsed={elapsed:?}")
        }
        CompileEvent::TableLoaded { path, format, rows } => {
            format!("loaded format={format:?} path={} rows={rows}", path.display())
        }
        CompileEvent::RunFinished { elapsed, metrics } => format!("run finished elapsed={elapsed:?} {metrics}"),
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recording {
        diagnostics: Mutex<Vec<Severity>>,
        alerts: Mutex<Vec<Severity>>,
    }

    impl CompileObserver for Recording {
        fn on_diagnostic(&self, diagnostic: &Diagnostic) {
            self.diagnostics.lock().unwrap().push(diagnostic.severity);
        }

        fn on_alert(&self, diagnostic: &Diagnostic) {
            self.alerts.lock().unwrap().push(diagnostic.severity);
        }
    }

    #[test]
    fn report_alerts_at_threshold_only() {
        let rec = Arc::new(Recording::default());
        let obs: Arc<dyn CompileObserver> = rec.clone();
        let warn = Diagnostic::warning(Stage::Results, 3, "unknown block");
        let err = Diagnostic::new(Severity::Error, Stage::Sectors, None, "failed");

        report(Some(&obs), &warn, Severity::Error);
        report(Some(&obs), &err, Severity::Error);

        assert_eq!(*rec.diagnostics.lock().unwrap(), vec![Severity::Warning, Severity::Error]);
        assert_eq!(*rec.alerts.lock().unwrap(), vec![Severity::Error]);
    }

    #[test]
    fn composite_fans_out() {
        let a = Arc::new(Recording::default());
        let b = Arc::new(Recording::default());
        let composite = CompositeObserver::new(vec![a.clone() as Arc<dyn CompileObserver>, b.clone()]);
        composite.on_diagnostic(&Diagnostic::warning(Stage::Actions, 0, "x"));
        assert_eq!(a.diagnostics.lock().unwrap().len(), 1);
        assert_eq!(b.diagnostics.lock().unwrap().len(), 1);
    }

    #[test]
    fn file_observer_appends_lines() {
        let path = std::env::temp_dir().join(format!("sheet-compiler-observer-{}.log", unix_ts_nanos()));
        let obs = FileObserver::new(&path);
        obs.on_event(&CompileEvent::RunStarted { rows: 4 });
        obs.on_alert(&Diagnostic::new(Severity::Critical, Stage::Load, None, "io"));

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("run started rows=4"));
        assert!(lines[1].contains("ALERT [load][Critical] io"));
        let _ = std::fs::remove_file(path);
    }

    fn unix_ts_nanos() -> u128 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos()
    }
}
