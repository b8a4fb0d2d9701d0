//! Recorders collect a metric from the network during a run.

use crate::collection::Entity;
use crate::engine::ComponentSpec;
use crate::errors::{CollectionKind, HydronetResult};
use crate::registry::TypeRegistry;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static RECORDER_REGISTRY: LazyLock<TypeRegistry<Recorder>> =
    LazyLock::new(Recorder::register_all);

/// Records a value attached to a node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NodeRecorder {
    pub name: String,
    pub comment: Option<String>,
    pub node: String,
}

/// Records the value of a parameter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParameterRecorder {
    pub name: String,
    pub comment: Option<String>,
    pub parameter: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Recorder {
    NodeFlow(NodeRecorder),
    StorageVolume(NodeRecorder),
    Parameter(ParameterRecorder),
}

impl Recorder {
    /// Build the recorder registry.
    pub fn register_all() -> TypeRegistry<Recorder> {
        let mut registry = TypeRegistry::new(CollectionKind::Recorders);
        registry.register("NodeFlow", |v| {
            serde_json::from_value(v).map(Recorder::NodeFlow)
        });
        registry.register("StorageVolume", |v| {
            serde_json::from_value(v).map(Recorder::StorageVolume)
        });
        registry.register("Parameter", |v| {
            serde_json::from_value(v).map(Recorder::Parameter)
        });
        registry
    }

    pub fn spec(&self) -> HydronetResult<ComponentSpec> {
        let mut spec = ComponentSpec::from_attributes(self)?;
        spec.attributes.remove("type");
        Ok(match self {
            Recorder::NodeFlow(r) | Recorder::StorageVolume(r) => spec.with_nodes([r.node.as_str()]),
            Recorder::Parameter(r) => spec.with_parameters([r.parameter.as_str()]),
        })
    }
}

impl Entity for Recorder {
    const COLLECTION: CollectionKind = CollectionKind::Recorders;

    fn name(&self) -> &str {
        match self {
            Recorder::NodeFlow(r) | Recorder::StorageVolume(r) => &r.name,
            Recorder::Parameter(r) => &r.name,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Recorder::NodeFlow(_) => "NodeFlow",
            Recorder::StorageVolume(_) => "StorageVolume",
            Recorder::Parameter(_) => "Parameter",
        }
    }

    fn registry() -> &'static TypeRegistry<Self> {
        &RECORDER_REGISTRY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::EntityCollection;
    use crate::settings::LoadOptions;
    use serde_json::json;

    #[test]
    fn references() {
        let documents = vec![
            json!({"type": "nodeflow", "name": "demand-flow", "node": "demand"}),
            json!({"type": "Parameter", "name": "price", "parameter": "cost"}),
        ];
        let recorders =
            EntityCollection::<Recorder>::from_documents(&documents, &LoadOptions::strict())
                .unwrap();

        let flow = recorders.get("demand-flow").unwrap().spec().unwrap();
        assert_eq!(flow.node_references, vec!["demand"]);
        assert!(flow.parameter_references.is_empty());

        let price = recorders.get("price").unwrap().spec().unwrap();
        assert_eq!(price.parameter_references, vec!["cost"]);
        assert_eq!(price.attributes["parameter"], "cost");
    }

    #[test]
    fn parameter_recorder_is_not_a_parameter_type() {
        // "Parameter" is a recorder type only; the parameter registry is distinct
        assert!(Recorder::registry().contains("parameter"));
        assert!(!Recorder::registry().contains("constant"));
    }
}
