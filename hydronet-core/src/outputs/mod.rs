//! Outputs write recorded data at the end of a run.

use crate::collection::Entity;
use crate::engine::{ComponentSpec, SpecContext};
use crate::errors::{CollectionKind, HydronetResult};
use crate::registry::TypeRegistry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static OUTPUT_REGISTRY: LazyLock<TypeRegistry<Output>> = LazyLock::new(Output::register_all);

/// An output written to a single file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FileOutput {
    pub name: String,
    pub comment: Option<String>,
    pub filename: PathBuf,
}

impl FileOutput {
    pub fn new(name: &str, filename: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            comment: None,
            filename: filename.into(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Output {
    #[serde(rename = "HDF5")]
    Hdf5(FileOutput),
    #[serde(rename = "CSV")]
    Csv(FileOutput),
}

impl Output {
    /// Build the output registry.
    pub fn register_all() -> TypeRegistry<Output> {
        let mut registry = TypeRegistry::new(CollectionKind::Outputs);
        registry.register("HDF5", |v| serde_json::from_value(v).map(Output::Hdf5));
        registry.register("CSV", |v| serde_json::from_value(v).map(Output::Csv));
        registry
    }

    pub fn filename(&self) -> &Path {
        match self {
            Output::Hdf5(o) | Output::Csv(o) => &o.filename,
        }
    }

    pub fn spec(&self, context: &SpecContext<'_>) -> HydronetResult<ComponentSpec> {
        let mut spec = ComponentSpec::from_attributes(self)?
            .with_file(context.resolve_path(self.filename()));
        spec.attributes.remove("type");
        Ok(spec)
    }
}

impl Entity for Output {
    const COLLECTION: CollectionKind = CollectionKind::Outputs;

    fn name(&self) -> &str {
        match self {
            Output::Hdf5(o) | Output::Csv(o) => &o.name,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Output::Hdf5(_) => "HDF5",
            Output::Csv(_) => "CSV",
        }
    }

    fn registry() -> &'static TypeRegistry<Self> {
        &OUTPUT_REGISTRY
    }
}
