use crate::collection::EntityCollection;
use crate::errors::{HydronetError, HydronetResult};
use crate::tables::Table;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Everything an engine needs to create a parameter, recorder or output.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ComponentSpec {
    /// The variant's fields as written in the document (without `type`)
    pub attributes: Map<String, Value>,
    /// Names of parameters this component reads, in field order
    pub parameter_references: Vec<String>,
    /// Names of nodes this component reads
    pub node_references: Vec<String>,
    /// Data files, already resolved against the model path
    pub files: Vec<PathBuf>,
}

impl ComponentSpec {
    /// Start a spec from the serialised fields of a variant.
    pub fn from_attributes<T: Serialize>(variant: &T) -> HydronetResult<Self> {
        match serde_json::to_value(variant)? {
            Value::Object(attributes) => Ok(Self {
                attributes,
                ..Self::default()
            }),
            _ => Err(HydronetError::Json(serde::ser::Error::custom(
                "component attributes must serialise to a mapping",
            ))),
        }
    }

    pub fn with_parameters<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.parameter_references
            .extend(names.into_iter().map(str::to_string));
        self
    }

    pub fn with_nodes<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.node_references
            .extend(names.into_iter().map(str::to_string));
        self
    }

    pub fn with_file(mut self, path: PathBuf) -> Self {
        self.files.push(path);
        self
    }
}

/// Model-level data needed while building specs.
#[derive(Debug, Clone, Copy)]
pub struct SpecContext<'a> {
    pub tables: &'a EntityCollection<Table>,
    /// Directory relative file references are resolved against
    pub base_path: Option<&'a Path>,
}

impl<'a> SpecContext<'a> {
    pub fn new(tables: &'a EntityCollection<Table>, base_path: Option<&'a Path>) -> Self {
        Self { tables, base_path }
    }

    /// Join a relative path onto the base path; absolute paths are unchanged.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_paths() {
        let tables = EntityCollection::new();
        let context = SpecContext::new(&tables, Some(Path::new("/models/simple")));
        assert_eq!(
            context.resolve_path(Path::new("inflow.csv")),
            PathBuf::from("/models/simple/inflow.csv")
        );
        assert_eq!(
            context.resolve_path(Path::new("/data/inflow.csv")),
            PathBuf::from("/data/inflow.csv")
        );

        let context = SpecContext::new(&tables, None);
        assert_eq!(
            context.resolve_path(Path::new("inflow.csv")),
            PathBuf::from("inflow.csv")
        );
    }

    #[test]
    fn attributes_must_be_a_mapping() {
        assert!(ComponentSpec::from_attributes(&1.0).is_err());

        let spec = ComponentSpec::from_attributes(&serde_json::json!({"value": 2.0}))
            .unwrap()
            .with_parameters(["a", "b"])
            .with_nodes(["n"]);
        assert_eq!(spec.attributes["value"], 2.0);
        assert_eq!(spec.parameter_references, vec!["a", "b"]);
        assert_eq!(spec.node_references, vec!["n"]);
    }
}
