//! Parameter resolution order, cycles and undefined references.

use super::{definition, RejectingEngine};
use crate::engine::{EngineError, PlanEngine};
use crate::errors::{BuildPhase, HydronetError};
use crate::model::GraphBuilder;
use rstest::rstest;
use serde_json::{json, Value};

fn negative(name: &str, of: &str) -> Value {
    json!({"type": "negative", "name": name, "parameter": of})
}

fn constant(name: &str) -> Value {
    json!({"type": "constant", "name": name, "value": 1.0})
}

fn with_parameters(parameters: Vec<Value>) -> crate::model::ModelDefinition {
    definition(json!({ "parameters": parameters }))
}

#[test]
fn chain_resolves_dependencies_first() {
    let model = with_parameters(vec![negative("A", "B"), negative("B", "C"), constant("C")]);
    let mut engine = PlanEngine::new();
    let report = GraphBuilder::new(&model).build(&mut engine).unwrap();

    assert_eq!(report.resolution.order, vec!["C", "B", "A"]);
    assert_eq!(engine.parameter_names(), vec!["C", "B", "A"]);
    assert_eq!(report.resolution.rounds, 3);
}

#[rstest]
#[case(&["A", "B", "C"])]
#[case(&["A", "C", "B"])]
#[case(&["B", "A", "C"])]
#[case(&["B", "C", "A"])]
#[case(&["C", "A", "B"])]
#[case(&["C", "B", "A"])]
fn chain_order_is_independent_of_declaration(#[case] declared: &[&str]) {
    let parameters = declared
        .iter()
        .map(|name| match *name {
            "A" => negative("A", "B"),
            "B" => negative("B", "C"),
            _ => constant("C"),
        })
        .collect();
    let model = with_parameters(parameters);
    let mut engine = PlanEngine::new();
    let report = GraphBuilder::new(&model).build(&mut engine).unwrap();

    assert_eq!(report.resolution.order, vec!["C", "B", "A"]);
}

#[test]
fn deferred_parameters_keep_their_order() {
    // x and y both wait on z; they must be created in declaration order
    let model = with_parameters(vec![
        negative("x", "z"),
        constant("w"),
        negative("y", "z"),
        constant("z"),
    ]);
    let mut engine = PlanEngine::new();
    let report = GraphBuilder::new(&model).build(&mut engine).unwrap();

    assert_eq!(report.resolution.order, vec!["w", "z", "x", "y"]);
    assert_eq!(report.resolution.rounds, 2);
}

#[test]
fn independent_parameters_take_one_round() {
    let parameters = (0..25).map(|i| constant(&format!("p{i}"))).collect();
    let model = with_parameters(parameters);
    let mut engine = PlanEngine::new();
    let report = GraphBuilder::new(&model).build(&mut engine).unwrap();

    assert_eq!(report.resolution.rounds, 1);
    assert_eq!(report.parameters(), 25);
}

#[test]
fn cycle_names_every_parameter() {
    let model = with_parameters(vec![negative("A", "B"), negative("B", "A")]);
    let mut engine = PlanEngine::new();
    let err = GraphBuilder::new(&model).build(&mut engine).unwrap_err();

    match &err {
        HydronetError::CyclicDependency { parameters } => {
            assert_eq!(parameters, &vec!["A".to_string(), "B".to_string()]);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().contains("A, B"));
    assert!(engine.parameter_names().is_empty());
}

#[test]
fn cycle_after_progress() {
    let model = with_parameters(vec![
        constant("base"),
        json!({"type": "aggregated", "name": "total", "agg_func": "sum", "parameters": ["base", "loop"]}),
        negative("loop", "total"),
        negative("derived", "base"),
    ]);
    let mut engine = PlanEngine::new();
    let err = GraphBuilder::new(&model).build(&mut engine).unwrap_err();

    match err {
        HydronetError::CyclicDependency { parameters } => {
            assert_eq!(parameters, vec!["total", "loop"]);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(engine.parameter_names(), vec!["base", "derived"]);
}

#[test]
fn undefined_reference_is_reported() {
    let model = with_parameters(vec![negative("A", "ghost"), constant("B")]);
    let mut engine = PlanEngine::new();
    let err = GraphBuilder::new(&model).build(&mut engine).unwrap_err();

    match err {
        HydronetError::UnresolvedReference {
            parameters,
            missing,
            cyclic,
        } => {
            assert_eq!(parameters, vec!["A"]);
            assert_eq!(missing, vec!["ghost"]);
            assert!(cyclic.is_empty());
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn undefined_reference_alongside_cycle() {
    let model = with_parameters(vec![
        negative("A", "ghost"),
        negative("B", "C"),
        negative("C", "B"),
        negative("D", "A"),
    ]);
    let mut engine = PlanEngine::new();
    let err = GraphBuilder::new(&model).build(&mut engine).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to load parameters A, D because they reference undefined parameters: ghost. \
         Parameters in a dependency cycle: B, C"
    );

    match err {
        HydronetError::UnresolvedReference {
            parameters,
            missing,
            cyclic,
        } => {
            assert_eq!(parameters, vec!["A", "D"]);
            assert_eq!(missing, vec!["ghost"]);
            assert_eq!(cyclic, vec!["B", "C"]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn other_failures_are_not_retried() {
    let model = with_parameters(vec![negative("A", "B"), constant("B"), constant("C")]);
    let mut engine = RejectingEngine::new("B");
    let err = GraphBuilder::new(&model).build(&mut engine).unwrap_err();

    match err {
        HydronetError::Engine {
            phase,
            entity,
            source,
        } => {
            assert_eq!(phase, BuildPhase::Parameters);
            assert_eq!(entity, "B");
            assert_eq!(source, EngineError::Other("B rejected".to_string()));
        }
        other => panic!("unexpected error {other:?}"),
    }
    // A was deferred, B failed; C was never attempted
    assert_eq!(engine.attempts, 2);
}

#[test]
fn missing_table_is_fatal() {
    let model = with_parameters(vec![
        constant("A"),
        json!({"type": "dataframe", "name": "inflow", "table": "flows", "column": "river"}),
    ]);
    let mut engine = PlanEngine::new();
    let err = GraphBuilder::new(&model).build(&mut engine).unwrap_err();

    assert!(matches!(err, HydronetError::NotFound { .. }));
    assert!(engine.parameter_names().is_empty());
}
