use hydronet_core::engine::{EngineCall, NodeKind};
use hydronet_core::errors::CollectionKind;
use hydronet_core::outputs::{FileOutput, Output};
use hydronet_core::{
    run_model, Entity, GraphBuilder, HydronetError, LoadOptions, ModelDefinition, PlanEngine,
};
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("models")
        .join(name)
}

fn load(name: &str) -> ModelDefinition {
    ModelDefinition::from_path(&fixture(name), &LoadOptions::strict()).unwrap()
}

#[test]
fn simple_json() {
    let model = load("simple.json");
    assert_eq!(model.nodes.len(), 3);
    assert_eq!(model.timestepper.num_timesteps(), 365);
    let models_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("models");
    assert_eq!(model.path, Some(models_dir));

    let mut engine = PlanEngine::new();
    let report = run_model(&model, &mut engine, "clp").unwrap();
    assert_eq!(report.parameters(), 1);
    assert_eq!(report.resolution.rounds, 1);
    assert!(engine.has_run());

    let output_files: Vec<PathBuf> = engine
        .calls()
        .iter()
        .filter_map(|call| match call {
            EngineCall::CreateOutput { files, .. } => Some(files.clone()),
            _ => None,
        })
        .flatten()
        .collect();
    assert_eq!(output_files, vec![fixture("outputs/simple.h5")]);
}

#[test]
fn reservoir_yaml() {
    let model = load("reservoir.yaml");
    assert_eq!(model.timestepper.timestep, 7);
    assert_eq!(model.tables.len(), 1);

    let mut engine = PlanEngine::new();
    let report = GraphBuilder::new(&model).build(&mut engine).unwrap();

    assert_eq!(
        report.resolution.order,
        vec![
            "control-curve",
            "demand",
            "inflow-data",
            "restriction-factor",
            "restricted-demand"
        ]
    );
    assert_eq!(report.resolution.rounds, 3);
    assert_eq!(report.constraints, 7);
    assert_eq!(engine.node_kind("inflow"), Some(NodeKind::Input));
}

#[test]
fn cycle_json() {
    let model = load("cycle.json");
    let mut engine = PlanEngine::new();
    let err = GraphBuilder::new(&model).build(&mut engine).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to load parameters due to a cycle in the dependency tree. Unresolved parameters: a, b"
    );
    // Nodes and edges were built, nothing after the parameter phase
    assert_eq!(engine.calls().len(), 3);
}

#[test]
fn strictness_of_unknown_fields() {
    let err = ModelDefinition::from_path(&fixture("unknown_field.yml"), &LoadOptions::strict())
        .unwrap_err();
    assert_eq!(err.collection(), Some(CollectionKind::Nodes));
    assert!(err.to_string().contains("\"supply\""));
    assert!(err.to_string().contains("colour"));

    let model =
        ModelDefinition::from_path(&fixture("unknown_field.yml"), &LoadOptions::permissive())
            .unwrap();
    assert_eq!(model.nodes.len(), 2);
}

#[test]
fn extension_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("MODEL.JSON");
    fs::copy(fixture("simple.json"), &path).unwrap();

    let model = ModelDefinition::from_path(&path, &LoadOptions::strict()).unwrap();
    assert_eq!(model.path.as_deref(), Some(dir.path()));
}

#[test]
fn unsupported_extension() {
    let err = ModelDefinition::from_path(Path::new("model.txt"), &LoadOptions::strict())
        .unwrap_err();
    match err {
        HydronetError::UnsupportedFileType { extension, path } => {
            assert_eq!(extension, "txt");
            assert_eq!(path, PathBuf::from("model.txt"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelDefinition::from_path(&dir.path().join("absent.yaml"), &LoadOptions::strict())
        .unwrap_err();
    assert!(matches!(err, HydronetError::Io { .. }));
}

#[test]
fn invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"timestepper\": ").unwrap();
    let err = ModelDefinition::from_path(&path, &LoadOptions::strict()).unwrap_err();
    assert!(matches!(err, HydronetError::Json(_)));
}

#[test]
fn round_trip_through_yaml() {
    let model = load("reservoir.yaml");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("copy.yml");
    fs::write(&path, model.to_yaml_string().unwrap()).unwrap();

    let copy = ModelDefinition::from_path(&path, &LoadOptions::strict()).unwrap();
    let names = |m: &ModelDefinition| -> Vec<String> {
        m.nodes
            .iter()
            .map(|n| format!("{}:{}", n.type_name(), n.name()))
            .chain(m.parameters.iter().map(|p| format!("{}:{}", p.type_name(), p.name())))
            .collect()
    };
    assert_eq!(names(&copy), names(&model));
    assert_eq!(copy.edges, model.edges);
}

#[test]
fn output_override() {
    let mut model = load("simple.json");
    model
        .add_output(Output::Hdf5(FileOutput::new("cli-output", "/tmp/override.h5")))
        .unwrap();
    assert_eq!(model.outputs.len(), 2);

    let mut engine = PlanEngine::new();
    GraphBuilder::new(&model).build(&mut engine).unwrap();
    assert!(engine.calls().iter().any(|call| matches!(
        call,
        EngineCall::CreateOutput { name, files, .. }
            if name == "cli-output" && files == &vec![PathBuf::from("/tmp/override.h5")]
    )));

    let err = model
        .add_output(Output::Hdf5(FileOutput::new("cli-output", "again.h5")))
        .unwrap_err();
    assert!(matches!(err, HydronetError::DuplicateName { .. }));
}
