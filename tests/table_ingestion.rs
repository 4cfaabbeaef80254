use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use sheet_compiler::CompileError;
use sheet_compiler::diagnostics::{Diagnostic, Severity, Stage};
use sheet_compiler::ingestion::{TableFormat, TableOptions, read_table_from_path};
use sheet_compiler::observability::{CompileEvent, CompileObserver};
use sheet_compiler::types::{Cell, text_row};

fn tmp_file(ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sheet-compiler-ingestion-{nanos}.{ext}"))
}

#[derive(Default)]
struct RecordingObserver {
    loaded: Mutex<Vec<(TableFormat, usize)>>,
    failures: Mutex<Vec<Severity>>,
    alerts: Mutex<Vec<Severity>>,
}

impl CompileObserver for RecordingObserver {
    fn on_event(&self, event: &CompileEvent) {
        if let CompileEvent::TableLoaded { format, rows, .. } = event {
            self.loaded.lock().unwrap().push((*format, *rows));
        }
    }

    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        assert_eq!(diagnostic.stage, Stage::Load);
        self.failures.lock().unwrap().push(diagnostic.severity);
    }

    fn on_alert(&self, diagnostic: &Diagnostic) {
        self.alerts.lock().unwrap().push(diagnostic.severity);
    }
}

#[test]
fn csv_fixture_keeps_ragged_rows_and_number_cells() {
    let rows = read_table_from_path("tests/fixtures/actions.csv", &TableOptions::default()).unwrap();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0][0], Cell::from("Insulate walls"));
    assert_eq!(rows[0][5], Cell::Number(-1.0));
    assert!(rows[5].iter().all(|c| *c == Cell::Empty));
}

#[test]
fn json_fixture_loads_with_row_range() {
    let opts = TableOptions {
        rows: Some(3..6),
        ..Default::default()
    };
    let rows = read_table_from_path("tests/fixtures/results.json", &opts).unwrap();
    assert_eq!(
        rows,
        vec![
            text_row(&["##Indicator"]),
            text_row(&["code", "co2"]),
            text_row(&["title", "CO2"]),
        ]
    );
}

#[test]
fn forced_format_overrides_extension() {
    let path = tmp_file("txt");
    std::fs::write(&path, "a,1\nb,2.5\n").unwrap();
    let opts = TableOptions {
        format: Some(TableFormat::Csv),
        ..Default::default()
    };
    let rows = read_table_from_path(&path, &opts).unwrap();
    assert_eq!(rows[1], vec![Cell::from("b"), Cell::Number(2.5)]);
    let _ = std::fs::remove_file(path);
}

#[test]
fn observer_receives_table_loaded_event() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = TableOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };
    let _ = read_table_from_path("tests/fixtures/parameters.csv", &opts).unwrap();
    assert_eq!(*obs.loaded.lock().unwrap(), vec![(TableFormat::Csv, 6)]);
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn missing_file_is_critical_and_alerts() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = TableOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: Severity::Critical,
        ..Default::default()
    };

    let err = read_table_from_path("tests/fixtures/does_not_exist.json", &opts).unwrap_err();
    assert!(matches!(err, CompileError::Io(_)));
    assert_eq!(*obs.failures.lock().unwrap(), vec![Severity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![Severity::Critical]);
}

#[test]
fn malformed_table_is_an_error_without_alert() {
    let path = tmp_file("json");
    std::fs::write(&path, r#"{"not": "a table"}"#).unwrap();

    let obs = Arc::new(RecordingObserver::default());
    let opts = TableOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: Severity::Critical,
        ..Default::default()
    };
    let err = read_table_from_path(&path, &opts).unwrap_err();
    assert!(matches!(err, CompileError::InvalidInput { .. }));
    assert_eq!(*obs.failures.lock().unwrap(), vec![Severity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
    let _ = std::fs::remove_file(path);
}

#[cfg(not(feature = "excel"))]
#[test]
fn workbooks_need_the_excel_feature() {
    let err = read_table_from_path("book.xlsx", &TableOptions::default()).unwrap_err();
    assert!(err.to_string().contains("excel"));
}
