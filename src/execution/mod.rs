//! Project-level compile engine.
//!
//! [`ProjectCompiler`] runs the three stage compilers on its own rayon pool:
//!
//! - sectors, results and actions run concurrently (they share no mutable state)
//! - the completion-rate collaborator runs on the finished sector tree
//! - every diagnostic and lifecycle event goes to the attached observer, and counters are kept
//!   in [`CompileMetrics`]

mod metrics;

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;

use crate::compile::{actions, results, sectors};
use crate::config::ProjectConfig;
use crate::diagnostics::{Compiled, Diagnostic, Severity, Stage};
use crate::model::sector::all_parameters;
use crate::model::{Completion, CompiledProject, Parameter, Sector, UncompletedParameter};
use crate::observability::{CompileEvent, CompileObserver, report};
use crate::types::Row;

pub use metrics::{CompileMetrics, CompileMetricsSnapshot};

/// The external completion-rate collaborator.
///
/// Given the compiled sector tree, answer how complete the project's inputs are and which
/// parameters still need a value. Any pure function of the tree is acceptable.
pub trait CompletionRate: Send + Sync {
    fn rate(&self, sectors: &[Sector]) -> Completion;
}

impl<F> CompletionRate for F
where
    F: Fn(&[Sector]) -> Completion + Send + Sync,
{
    fn rate(&self, sectors: &[Sector]) -> Completion {
        self(sectors)
    }
}

/// Configuration for the [`ProjectCompiler`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the compiler.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Diagnostics at or above this severity are also sent to [`CompileObserver::on_alert`].
    pub alert_at_or_above: Severity,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            num_threads: None,
            alert_at_or_above: Severity::Error,
        }
    }
}

/// Compiles a whole project: sector tree, result blocks and action catalogue.
pub struct ProjectCompiler {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn CompileObserver>>,
    completion: Arc<dyn CompletionRate>,
    metrics: Arc<CompileMetrics>,
}

impl ProjectCompiler {
    /// Create a compiler with the given options and completion-rate collaborator.
    ///
    /// # Panics
    ///
    /// Panics if `num_threads == Some(0)` or the thread pool cannot be built.
    pub fn new(opts: ExecutionOptions, completion: impl CompletionRate + 'static) -> Self {
        if let Some(n) = opts.num_threads {
            assert!(n > 0, "num_threads must be > 0 when set");
        }

        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);

        let pool = ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .build()
            .expect("failed to build rayon thread pool");

        Self {
            pool,
            opts,
            observer: None,
            completion: Arc::new(completion),
            metrics: Arc::new(CompileMetrics::new()),
        }
    }

    /// Attach an observer for compile events and diagnostics.
    pub fn with_observer(mut self, observer: Arc<dyn CompileObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to the compiler's metrics.
    pub fn metrics(&self) -> Arc<CompileMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Compile the three tables of a project.
    ///
    /// Never fails: a stage that cannot run is reported as an `Error` diagnostic and contributes
    /// an empty output.
    pub fn compile(
        &self,
        parameter_rows: &[Row],
        action_rows: &[Row],
        result_rows: &[Row],
        config: &ProjectConfig,
    ) -> Compiled<CompiledProject> {
        self.compile_with_filter(parameter_rows, action_rows, result_rows, config, |_| true)
    }

    /// Like [`Self::compile`], but only parameters accepted by `predicate` enter the sector tree.
    pub fn compile_with_filter<F>(
        &self,
        parameter_rows: &[Row],
        action_rows: &[Row],
        result_rows: &[Row],
        config: &ProjectConfig,
        predicate: F,
    ) -> Compiled<CompiledProject>
    where
        F: Fn(&Parameter) -> bool + Send + Sync,
    {
        self.pool
            .install(|| self.compile_impl(parameter_rows, action_rows, result_rows, config, &predicate))
    }

    fn compile_impl(
        &self,
        parameter_rows: &[Row],
        action_rows: &[Row],
        result_rows: &[Row],
        config: &ProjectConfig,
        predicate: &(dyn Fn(&Parameter) -> bool + Send + Sync),
    ) -> Compiled<CompiledProject> {
        let start = Instant::now();
        let total_rows = parameter_rows.len() + action_rows.len() + result_rows.len();
        self.metrics.begin_run(total_rows);
        self.emit(CompileEvent::RunStarted { rows: total_rows });

        let ((sector_out, sector_elapsed), ((result_out, result_elapsed), action_out)) = rayon::join(
            || {
                timed(|| {
                    sectors::build_tree(parameter_rows, &config.parameters, predicate).map(|built| {
                        let seen = all_parameters(&built.value);
                        let counts = (seen.len(), seen.iter().filter(|p| p.error.is_some()).count());
                        (counts, Compiled::new(sectors::cleanup(built.value), built.diagnostics))
                    })
                })
            },
            || {
                rayon::join(
                    || timed(|| results::compile(result_rows)),
                    || config.actions.as_ref().map(|ac| timed(|| actions::compile(action_rows, ac))),
                )
            },
        );

        let mut diagnostics = Vec::new();

        let sectors = match sector_out {
            Ok(((built, with_errors), compiled)) => {
                self.metrics.on_parameters(built, with_errors);
                diagnostics.extend(compiled.diagnostics);
                compiled.value
            }
            Err(e) => {
                diagnostics.push(Diagnostic::new(
                    Severity::Error,
                    Stage::Sectors,
                    None,
                    format!("sector compilation failed: {e}"),
                ));
                Vec::new()
            }
        };
        self.emit(CompileEvent::StageFinished {
            stage: Stage::Sectors,
            elapsed: sector_elapsed,
            items: sectors.len(),
        });

        let markers = result_rows.iter().filter(|r| results::marker_name(r).is_some()).count();
        let parsed = result_out.value.len();
        self.metrics.on_results(parsed, markers.saturating_sub(parsed));
        diagnostics.extend(result_out.diagnostics);
        let result_blocks = result_out.value;
        self.emit(CompileEvent::StageFinished {
            stage: Stage::Results,
            elapsed: result_elapsed,
            items: parsed,
        });

        let action_list = action_out.map(|(compiled, elapsed)| {
            diagnostics.extend(compiled.diagnostics);
            self.metrics.on_actions(compiled.value.len());
            self.emit(CompileEvent::StageFinished {
                stage: Stage::Actions,
                elapsed,
                items: compiled.value.len(),
            });
            compiled.value
        });

        let (completion, completion_elapsed) = timed(|| self.completion.rate(&sectors));
        let completion_rate = if completion.completion_rate.is_finite() {
            completion.completion_rate
        } else {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                Stage::Completion,
                None,
                format!("completion rate {} is not a finite number; using 0", completion.completion_rate),
            ));
            0.0
        };
        let uncompleted: Vec<UncompletedParameter> =
            completion.uncompleted.into_iter().map(UncompletedParameter::from).collect();
        self.emit(CompileEvent::StageFinished {
            stage: Stage::Completion,
            elapsed: completion_elapsed,
            items: uncompleted.len(),
        });

        self.metrics.on_diagnostics(diagnostics.len());
        for d in &diagnostics {
            report(self.observer.as_ref(), d, self.opts.alert_at_or_above);
        }

        self.metrics.end_run(start.elapsed());
        self.emit(CompileEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });

        Compiled::new(
            CompiledProject {
                sectors,
                completion_rate,
                uncompleted,
                results: result_blocks,
                actions: action_list,
            },
            diagnostics,
        )
    }

    fn emit(&self, event: CompileEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}
