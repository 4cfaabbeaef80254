use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters maintained by a [`super::ProjectCompiler`].
///
/// Counts accumulate across runs; `last_elapsed` only reflects the most recent one. Callers can
/// snapshot at any time, including from another thread while a compile is running.
#[derive(Debug, Default)]
pub struct CompileMetrics {
    runs: AtomicU64,
    rows_scanned: AtomicU64,
    parameters_built: AtomicU64,
    field_errors: AtomicU64,
    results_parsed: AtomicU64,
    blocks_skipped: AtomicU64,
    actions_kept: AtomicU64,
    diagnostics: AtomicU64,
    last_elapsed_ns: AtomicU64,
}

impl CompileMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn begin_run(&self, rows: usize) {
        let _ = self.runs.fetch_add(1, Ordering::SeqCst);
        let _ = self.rows_scanned.fetch_add(rows as u64, Ordering::SeqCst);
    }

    pub(crate) fn end_run(&self, elapsed: Duration) {
        self.last_elapsed_ns.store(nanos(elapsed), Ordering::SeqCst);
    }

    pub(crate) fn on_parameters(&self, built: usize, with_errors: usize) {
        let _ = self.parameters_built.fetch_add(built as u64, Ordering::SeqCst);
        let _ = self.field_errors.fetch_add(with_errors as u64, Ordering::SeqCst);
    }

    pub(crate) fn on_results(&self, parsed: usize, skipped: usize) {
        let _ = self.results_parsed.fetch_add(parsed as u64, Ordering::SeqCst);
        let _ = self.blocks_skipped.fetch_add(skipped as u64, Ordering::SeqCst);
    }

    pub(crate) fn on_actions(&self, kept: usize) {
        let _ = self.actions_kept.fetch_add(kept as u64, Ordering::SeqCst);
    }

    pub(crate) fn on_diagnostics(&self, n: usize) {
        let _ = self.diagnostics.fetch_add(n as u64, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> CompileMetricsSnapshot {
        let elapsed_ns = self.last_elapsed_ns.load(Ordering::SeqCst);
        CompileMetricsSnapshot {
            runs: self.runs.load(Ordering::SeqCst),
            rows_scanned: self.rows_scanned.load(Ordering::SeqCst),
            parameters_built: self.parameters_built.load(Ordering::SeqCst),
            field_errors: self.field_errors.load(Ordering::SeqCst),
            results_parsed: self.results_parsed.load(Ordering::SeqCst),
            blocks_skipped: self.blocks_skipped.load(Ordering::SeqCst),
            actions_kept: self.actions_kept.load(Ordering::SeqCst),
            diagnostics: self.diagnostics.load(Ordering::SeqCst),
            last_elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
        }
    }
}

fn nanos(d: Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}

/// Immutable snapshot of [`CompileMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileMetricsSnapshot {
    pub runs: u64,
    pub rows_scanned: u64,
    /// Parameters built from the rows, including those later removed by cleanup.
    pub parameters_built: u64,
    /// Built parameters carrying at least one field error.
    pub field_errors: u64,
    pub results_parsed: u64,
    /// Marker rows that produced no block (unknown kind or reserved `Actions`).
    pub blocks_skipped: u64,
    pub actions_kept: u64,
    pub diagnostics: u64,
    pub last_elapsed: Option<Duration>,
}

impl fmt::Display for CompileMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "runs={}, rows_scanned={}, parameters={} ({} with errors), results={} ({} skipped), actions_kept={}, diagnostics={}, last_elapsed={:?}",
            self.runs,
            self.rows_scanned,
            self.parameters_built,
            self.field_errors,
            self.results_parsed,
            self.blocks_skipped,
            self.actions_kept,
            self.diagnostics,
            self.last_elapsed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_and_elapsed_tracks_last_run() {
        let m = CompileMetrics::new();
        assert_eq!(m.snapshot(), CompileMetricsSnapshot::default());

        m.begin_run(10);
        m.on_parameters(4, 1);
        m.end_run(Duration::from_millis(5));
        m.begin_run(2);
        m.on_results(3, 1);
        m.end_run(Duration::from_millis(1));

        let snap = m.snapshot();
        assert_eq!(snap.runs, 2);
        assert_eq!(snap.rows_scanned, 12);
        assert_eq!(snap.parameters_built, 4);
        assert_eq!(snap.field_errors, 1);
        assert_eq!(snap.results_parsed, 3);
        assert_eq!(snap.blocks_skipped, 1);
        assert_eq!(snap.last_elapsed, Some(Duration::from_millis(1)));
        assert!(snap.to_string().contains("results=3 (1 skipped)"));
    }
}
