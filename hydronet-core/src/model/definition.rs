use crate::collection::{unknown_fields, value_kind, EntityCollection};
use crate::engine::SpecContext;
use crate::errors::{CollectionKind, HydronetError, HydronetResult};
use crate::nodes::Node;
use crate::outputs::Output;
use crate::parameters::Parameter;
use crate::recorders::Recorder;
use crate::settings::LoadOptions;
use crate::tables::Table;
use crate::timestepper::Timestepper;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const MODEL_KEYS: [&str; 7] = [
    "timestepper",
    "nodes",
    "edges",
    "parameters",
    "recorders",
    "tables",
    "outputs",
];

/// A directed connection between two nodes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from_node: String,
    pub to_node: String,
}

impl Edge {
    pub fn new(from_node: &str, to_node: &str) -> Self {
        Self {
            from_node: from_node.to_string(),
            to_node: to_node.to_string(),
        }
    }
}

/// A fully loaded and validated model document.
///
/// The definition is read-only while a model is built from it.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ModelDefinition {
    pub timestepper: Timestepper,
    pub nodes: EntityCollection<Node>,
    pub edges: Vec<Edge>,
    pub parameters: EntityCollection<Parameter>,
    pub recorders: EntityCollection<Recorder>,
    pub tables: EntityCollection<Table>,
    pub outputs: EntityCollection<Output>,
    /// Directory that relative file references are resolved against
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

/// Take a sequence out of the document.
///
/// Optional sequences may be absent or `null`, which both read as empty.
fn take_sequence(
    fields: &mut Map<String, Value>,
    collection: CollectionKind,
    required: bool,
) -> HydronetResult<Vec<Value>> {
    match fields.remove(collection.key()) {
        Some(Value::Array(documents)) => Ok(documents),
        None | Some(Value::Null) if !required => Ok(vec![]),
        None => Err(HydronetError::schema(
            collection,
            None,
            format!("\"{}\" is required", collection.key()),
        )),
        Some(other) => Err(HydronetError::schema(
            collection,
            None,
            format!("expected a sequence, found {}", value_kind(&other)),
        )),
    }
}

fn load_edges(documents: Vec<Value>, options: &LoadOptions) -> HydronetResult<Vec<Edge>> {
    documents
        .into_iter()
        .enumerate()
        .map(|(index, document)| {
            let fields = match document {
                Value::Object(fields) => fields,
                other => {
                    return Err(HydronetError::schema(
                        CollectionKind::Edges,
                        None,
                        format!(
                            "entry {index} must be a mapping, found {}",
                            value_kind(&other)
                        ),
                    ))
                }
            };
            let edge: Edge = serde_json::from_value(Value::Object(fields.clone())).map_err(|e| {
                HydronetError::schema(CollectionKind::Edges, None, format!("entry {index}: {e}"))
            })?;
            let unknown = unknown_fields(&fields, &serde_json::to_value(&edge)?);
            let label = format!("{} -> {}", edge.from_node, edge.to_node);
            options.check_unknown_fields(CollectionKind::Edges, Some(&label), &unknown)?;
            Ok(edge)
        })
        .collect()
}

impl ModelDefinition {
    /// An empty model over the given schedule.
    pub fn new(timestepper: Timestepper) -> Self {
        Self {
            timestepper,
            nodes: EntityCollection::new(),
            edges: vec![],
            parameters: EntityCollection::new(),
            recorders: EntityCollection::new(),
            tables: EntityCollection::new(),
            outputs: EntityCollection::new(),
            path: None,
        }
    }

    /// Load a model from a parsed document tree.
    ///
    /// The first invalid entry aborts the load.
    pub fn from_value(document: Value, options: &LoadOptions) -> HydronetResult<Self> {
        let mut fields = match document {
            Value::Object(fields) => fields,
            other => {
                return Err(HydronetError::schema(
                    CollectionKind::Model,
                    None,
                    format!("expected a mapping, found {}", value_kind(&other)),
                ))
            }
        };

        let unknown: Vec<String> = fields
            .keys()
            .filter(|key| !MODEL_KEYS.contains(&key.as_str()))
            .cloned()
            .collect();
        options.check_unknown_fields(CollectionKind::Model, None, &unknown)?;

        let timestepper = match fields.remove(CollectionKind::Timestepper.key()) {
            Some(document) => Timestepper::from_document(document, options)?,
            None => {
                return Err(HydronetError::schema(
                    CollectionKind::Timestepper,
                    None,
                    "\"timestepper\" is required",
                ))
            }
        };

        let nodes = take_sequence(&mut fields, CollectionKind::Nodes, true)?;
        let nodes = EntityCollection::from_documents(&nodes, options)?;
        let edges = load_edges(take_sequence(&mut fields, CollectionKind::Edges, false)?, options)?;
        let parameters = take_sequence(&mut fields, CollectionKind::Parameters, false)?;
        let parameters = EntityCollection::from_documents(&parameters, options)?;
        let recorders = take_sequence(&mut fields, CollectionKind::Recorders, false)?;
        let recorders = EntityCollection::from_documents(&recorders, options)?;
        let tables = take_sequence(&mut fields, CollectionKind::Tables, false)?;
        let tables = EntityCollection::from_documents(&tables, options)?;
        let outputs = take_sequence(&mut fields, CollectionKind::Outputs, false)?;
        let outputs = EntityCollection::from_documents(&outputs, options)?;

        debug!(
            "Loaded model with {} node(s), {} edge(s), {} parameter(s), {} recorder(s), {} table(s) and {} output(s)",
            nodes.len(),
            edges.len(),
            parameters.len(),
            recorders.len(),
            tables.len(),
            outputs.len()
        );

        Ok(Self {
            timestepper,
            nodes,
            edges,
            parameters,
            recorders,
            tables,
            outputs,
            path: None,
        })
    }

    pub fn from_json_str(content: &str, options: &LoadOptions) -> HydronetResult<Self> {
        let document: Value = serde_json::from_str(content)?;
        Self::from_value(document, options)
    }

    pub fn from_yaml_str(content: &str, options: &LoadOptions) -> HydronetResult<Self> {
        let document: Value = serde_yaml::from_str(content)?;
        Self::from_value(document, options)
    }

    /// Load a model file, picking the format from its extension.
    ///
    /// Relative file references in the model are resolved against the
    /// directory containing `path`.
    pub fn from_path(path: &Path, options: &LoadOptions) -> HydronetResult<Self> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let read = || {
            std::fs::read_to_string(path).map_err(|source| HydronetError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        let mut definition = match extension.as_str() {
            "json" => Self::from_json_str(&read()?, options)?,
            "yaml" | "yml" => Self::from_yaml_str(&read()?, options)?,
            _ => {
                return Err(HydronetError::UnsupportedFileType {
                    extension,
                    path: path.to_path_buf(),
                })
            }
        };
        definition.path = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf);
        Ok(definition)
    }

    /// The model as a document tree.
    pub fn to_value(&self) -> HydronetResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> HydronetResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml_string(&self) -> HydronetResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Join a relative path onto the model path; anything else is returned as is.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        self.spec_context().resolve_path(path)
    }

    pub(crate) fn spec_context(&self) -> SpecContext<'_> {
        SpecContext::new(&self.tables, self.path.as_deref())
    }

    /// Add an output before the model is built.
    pub fn add_output(&mut self, output: Output) -> HydronetResult<()> {
        self.outputs.insert(output)
    }
}
