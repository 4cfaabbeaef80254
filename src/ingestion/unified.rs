//! Unified table loading entrypoint.
//!
//! - If [`TableOptions::format`] is `None`, the format is inferred from the file extension.
//! - If [`TableOptions::rows`] is set, only that row range is kept (clamped to the table).
//! - If an observer is provided, the load or its failure is reported to it.

use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

use crate::diagnostics::{Diagnostic, Severity, Stage};
use crate::error::{CompileError, CompileResult};
use crate::observability::{CompileEvent, CompileObserver, report};
use crate::types::Row;

use super::{csv, json};

/// Supported table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values, no header row.
    Csv,
    /// JSON array of rows.
    Json,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl TableFormat {
    /// Parse a table format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Options controlling [`read_table_from_path`].
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct TableOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<TableFormat>,
    /// Workbook sheet to read; the first sheet when `None`. Ignored for CSV and JSON.
    pub sheet: Option<String>,
    /// Keep only these rows (zero-based, end exclusive).
    pub rows: Option<Range<usize>>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn CompileObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for TableOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableOptions")
            .field("format", &self.format)
            .field("sheet", &self.sheet)
            .field("rows", &self.rows)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            format: None,
            sheet: None,
            rows: None,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// Load an exported table from `path`.
///
/// When an observer is configured, this function reports:
///
/// - a [`CompileEvent::TableLoaded`] event on success
/// - a [`Stage::Load`] diagnostic on failure (`Critical` for I/O failures, `Error` otherwise),
///   which is also an alert when at or above `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use sheet_compiler::ingestion::{read_table_from_path, TableOptions};
/// use sheet_compiler::observability::StdErrObserver;
///
/// # fn main() -> Result<(), sheet_compiler::CompileError> {
/// let opts = TableOptions {
///     rows: Some(0..200),
///     observer: Some(Arc::new(StdErrObserver)),
///     ..Default::default()
/// };
/// let rows = read_table_from_path("results.csv", &opts)?;
/// println!("rows={}", rows.len());
/// # Ok(())
/// # }
/// ```
pub fn read_table_from_path(path: impl AsRef<Path>, options: &TableOptions) -> CompileResult<Vec<Row>> {
    let path = path.as_ref();
    let format = match options.format {
        Some(f) => Ok(f),
        None => infer_format_from_path(path),
    };

    let result = format.and_then(|f| {
        let rows = match f {
            TableFormat::Csv => csv::read_table_from_path(path),
            TableFormat::Json => json::read_table_from_path(path),
            TableFormat::Excel => read_excel(path, options.sheet.as_deref()),
        }?;
        Ok((f, select_rows(rows, options.rows.as_ref())))
    });

    match result {
        Ok((format, rows)) => {
            if let Some(obs) = options.observer.as_ref() {
                obs.on_event(&CompileEvent::TableLoaded {
                    path: path.to_path_buf(),
                    format,
                    rows: rows.len(),
                });
            }
            Ok(rows)
        }
        Err(e) => {
            let diagnostic = Diagnostic::new(
                severity_for_error(&e),
                Stage::Load,
                None,
                format!("failed to load {}: {e}", path.display()),
            );
            report(options.observer.as_ref(), &diagnostic, options.alert_at_or_above);
            Err(e)
        }
    }
}

fn select_rows(rows: Vec<Row>, range: Option<&Range<usize>>) -> Vec<Row> {
    match range {
        None => rows,
        Some(r) => rows
            .into_iter()
            .skip(r.start)
            .take(r.end.saturating_sub(r.start))
            .collect(),
    }
}

fn severity_for_error(e: &CompileError) -> Severity {
    match e {
        CompileError::Io(_) => Severity::Critical,
        CompileError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        _ => Severity::Error,
    }
}

fn infer_format_from_path(path: &Path) -> CompileResult<TableFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CompileError::InvalidInput {
            message: format!("cannot infer format: path has no extension ({})", path.display()),
        })?;

    TableFormat::from_extension(ext).ok_or_else(|| CompileError::InvalidInput {
        message: format!("cannot infer format from extension '{ext}' for path ({})", path.display()),
    })
}

fn read_excel(path: &Path, sheet: Option<&str>) -> CompileResult<Vec<Row>> {
    #[cfg(feature = "excel")]
    {
        super::excel::read_table_from_path(path, sheet)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (path, sheet);
        Err(CompileError::InvalidInput {
            message: "excel loading not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
