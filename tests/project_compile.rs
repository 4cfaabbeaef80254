use std::sync::{Arc, Mutex};

use sheet_compiler::config::ProjectConfig;
use sheet_compiler::diagnostics::{Diagnostic, Severity, Stage};
use sheet_compiler::execution::{ExecutionOptions, ProjectCompiler};
use sheet_compiler::ingestion::{TableOptions, read_table_from_path};
use sheet_compiler::model::sector::all_parameters;
use sheet_compiler::model::{Completion, ParameterValue, ResultBlock, Sector};
use sheet_compiler::observability::{CompileEvent, CompileObserver};
use sheet_compiler::types::Row;

fn load(path: &str) -> Vec<Row> {
    read_table_from_path(path, &TableOptions::default()).unwrap()
}

fn config() -> ProjectConfig {
    ProjectConfig::from_path("tests/fixtures/project.json").unwrap()
}

/// Percentage of parameters with a value; the empty ones are uncompleted.
fn completion(sectors: &[Sector]) -> Completion {
    let all = all_parameters(sectors);
    let uncompleted: Vec<_> = all
        .iter()
        .filter(|p| p.value.is_empty())
        .map(|p| (*p).clone())
        .collect();
    Completion {
        completion_rate: 100.0 * (all.len() - uncompleted.len()) as f64 / all.len().max(1) as f64,
        uncompleted,
    }
}

#[derive(Default)]
struct RecordingObserver {
    stages: Mutex<Vec<Stage>>,
    diagnostics: Mutex<Vec<Diagnostic>>,
    alerts: Mutex<Vec<Severity>>,
}

impl CompileObserver for RecordingObserver {
    fn on_event(&self, event: &CompileEvent) {
        if let CompileEvent::StageFinished { stage, .. } = event {
            self.stages.lock().unwrap().push(*stage);
        }
    }

    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        self.diagnostics.lock().unwrap().push(diagnostic.clone());
    }

    fn on_alert(&self, diagnostic: &Diagnostic) {
        self.alerts.lock().unwrap().push(diagnostic.severity);
    }
}

fn compiler() -> ProjectCompiler {
    ProjectCompiler::new(
        ExecutionOptions {
            num_threads: Some(3),
            ..Default::default()
        },
        completion,
    )
}

#[test]
fn compiles_fixture_project() {
    let out = compiler().compile(
        &load("tests/fixtures/parameters.csv"),
        &load("tests/fixtures/actions.csv"),
        &load("tests/fixtures/results.json"),
        &config(),
    );
    let project = out.value;

    let names: Vec<&str> = project.sectors.iter().map(Sector::name).collect();
    assert_eq!(names, vec!["Housing", "Transport", "Food"]);

    let housing = &project.sectors[0];
    assert_eq!(housing.information.color.as_deref(), Some("#f00"));
    assert_eq!(housing.information.icon.as_deref(), Some("house"));
    let subs: Vec<(&str, Option<&str>)> = housing
        .sectors
        .iter()
        .map(|s| (s.name(), s.information.color.as_deref()))
        .collect();
    assert_eq!(subs, vec![("Heating", Some("#a00")), ("Appliances", Some("#b00"))]);

    // Ordinals restart under each top-level sector; the third top-level sector has no style.
    assert_eq!(project.sectors[1].sectors[0].information.color.as_deref(), Some("#a00"));
    assert_eq!(project.sectors[2].information.color, None);

    let heating = &housing.sectors[0];
    assert_eq!(heating.parameters[0].value, ParameterValue::Text("80".into()));
    assert_eq!(heating.parameters[0].min, Some(10.0));
    assert_eq!(heating.parameters[1].kind, "list");
    assert_eq!(heating.parameters[1].value, ParameterValue::List(vec!["gas".into()]));
    assert_eq!(
        heating.parameters[1].possible_values,
        Some(vec!["gas".into(), "fuel".into(), "wood".into()])
    );

    let indexes: Vec<usize> = all_parameters(&project.sectors).iter().map(|p| p.index).collect();
    assert_eq!(indexes, vec![0, 1, 2, 3, 5]);

    let distance = &project.sectors[1].sectors[0].parameters[0];
    assert_eq!(distance.error.as_deref(), Some("min: invalid number 'abc'"));
    let meat = &project.sectors[2].sectors[0].parameters[0];
    assert_eq!(meat.error.as_deref(), Some("type: unknown type 'unknown'"));
    assert_eq!(meat.kind, "");

    assert_eq!(project.completion_rate, 80.0);
    assert_eq!(project.uncompleted.len(), 1);
    assert_eq!(project.uncompleted[0].name, "Fridges");
    assert_eq!(project.uncompleted[0].index, 2);

    let kinds: Vec<&str> = project
        .results
        .iter()
        .map(|b| match b {
            ResultBlock::Title(_) => "title",
            ResultBlock::Indicator(_) => "indicator",
            ResultBlock::Table(_) => "table",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["title", "indicator", "table"]);

    let actions = project.actions.unwrap();
    let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Eat local", "Insulate walls"]);
    assert_eq!(actions[1].types, vec!["building", "energy"]);
    assert_eq!(actions[1].impacts[0].value, -1.0);

    // Two field errors, one unknown block, one truncated action table.
    assert_eq!(out.diagnostics.len(), 4);
    assert_eq!(
        out.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count(),
        3
    );
}

#[test]
fn observer_sees_every_stage_and_diagnostic() {
    let recording = Arc::new(RecordingObserver::default());
    let obs: Arc<dyn CompileObserver> = recording.clone();
    let compiler = ProjectCompiler::new(
        ExecutionOptions {
            num_threads: Some(2),
            alert_at_or_above: Severity::Warning,
        },
        completion,
    )
    .with_observer(obs);

    let out = compiler.compile(
        &load("tests/fixtures/parameters.csv"),
        &load("tests/fixtures/actions.csv"),
        &load("tests/fixtures/results.json"),
        &config(),
    );

    assert_eq!(
        *recording.stages.lock().unwrap(),
        vec![Stage::Sectors, Stage::Results, Stage::Actions, Stage::Completion]
    );
    assert_eq!(*recording.diagnostics.lock().unwrap(), out.diagnostics);
    assert_eq!(recording.alerts.lock().unwrap().len(), 3);
}

#[test]
fn project_serializes_without_actions_when_unconfigured() {
    let mut cfg = config();
    cfg.actions = None;
    let project = compiler()
        .compile(
            &load("tests/fixtures/parameters.csv"),
            &load("tests/fixtures/actions.csv"),
            &load("tests/fixtures/results.json"),
            &cfg,
        )
        .value;
    assert!(project.actions.is_none());

    let json = serde_json::to_value(&project).unwrap();
    assert!(json.get("actions").is_none());
    assert_eq!(json["completionRate"], 80.0);
    assert_eq!(json["uncompleted"][0], serde_json::json!({"index": 2, "name": "Fridges"}));
    assert_eq!(json["sectors"][0]["information"]["name"], "Housing");
}

#[test]
fn repeated_compiles_are_identical_and_counted() {
    let compiler = compiler();
    let params = load("tests/fixtures/parameters.csv");
    let actions = load("tests/fixtures/actions.csv");
    let results = load("tests/fixtures/results.json");
    let cfg = config();

    let first = compiler.compile(&params, &actions, &results, &cfg);
    let second = compiler.compile(&params, &actions, &results, &cfg);
    assert_eq!(first.value, second.value);

    let snap = compiler.metrics().snapshot();
    assert_eq!(snap.runs, 2);
    assert_eq!(snap.parameters_built, 12);
    assert_eq!(snap.field_errors, 4);
    assert_eq!(snap.results_parsed, 6);
    assert_eq!(snap.blocks_skipped, 2);
    assert_eq!(snap.actions_kept, 4);
}
