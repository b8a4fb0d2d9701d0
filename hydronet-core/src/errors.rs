use crate::engine::EngineError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The collection (or document section) an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// The top-level document itself
    Model,
    Timestepper,
    Nodes,
    Edges,
    Parameters,
    Recorders,
    Tables,
    Outputs,
}

impl CollectionKind {
    /// Key used for this collection in a model document.
    pub fn key(&self) -> &'static str {
        match self {
            CollectionKind::Model => "model",
            CollectionKind::Timestepper => "timestepper",
            CollectionKind::Nodes => "nodes",
            CollectionKind::Edges => "edges",
            CollectionKind::Parameters => "parameters",
            CollectionKind::Recorders => "recorders",
            CollectionKind::Tables => "tables",
            CollectionKind::Outputs => "outputs",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Build phase in which an engine call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Nodes,
    Edges,
    Parameters,
    Recorders,
    Outputs,
    Constraints,
    Run,
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildPhase::Nodes => "node creation",
            BuildPhase::Edges => "edge creation",
            BuildPhase::Parameters => "parameter resolution",
            BuildPhase::Recorders => "recorder creation",
            BuildPhase::Outputs => "output creation",
            BuildPhase::Constraints => "constraint application",
            BuildPhase::Run => "run",
        };
        f.write_str(name)
    }
}

/// Error type for loading and building models.
#[derive(Error, Debug)]
pub enum HydronetError {
    #[error("Unknown {collection} type \"{type_name}\". Registered types: {known}")]
    UnknownType {
        collection: CollectionKind,
        type_name: String,
        known: String,
    },
    #[error("Entry {index} in {collection} has no \"type\" key")]
    MissingType {
        collection: CollectionKind,
        index: usize,
    },
    #[error("Invalid {collection} entry{}: {details}", .entity.as_ref().map(|e| format!(" \"{e}\"")).unwrap_or_default())]
    SchemaValidation {
        collection: CollectionKind,
        entity: Option<String>,
        details: String,
    },
    #[error("{collection} name \"{name}\" is already defined")]
    DuplicateName {
        collection: CollectionKind,
        name: String,
    },
    #[error("No entry named \"{name}\" in {collection}")]
    NotFound {
        collection: CollectionKind,
        name: String,
    },
    #[error("Failed to load parameters due to a cycle in the dependency tree. Unresolved parameters: {}", .parameters.join(", "))]
    CyclicDependency { parameters: Vec<String> },
    #[error("Failed to load parameters {} because they reference undefined parameters: {}{}", .parameters.join(", "), .missing.join(", "), cycle_note(.cyclic))]
    UnresolvedReference {
        /// Parameters depending, directly or not, on an undefined name
        parameters: Vec<String>,
        missing: Vec<String>,
        /// Remaining parameters, stuck in a cycle of their own
        cyclic: Vec<String>,
    },
    #[error("Filetype \"{extension}\" not supported ({})", .path.display())]
    UnsupportedFileType { extension: String, path: PathBuf },
    #[error("Engine rejected {entity} during {phase}: {source}")]
    Engine {
        phase: BuildPhase,
        entity: String,
        #[source]
        source: EngineError,
    },
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid settings: {0}")]
    Settings(#[from] toml::de::Error),
}

impl HydronetError {
    pub(crate) fn schema(
        collection: CollectionKind,
        entity: Option<&str>,
        details: impl Into<String>,
    ) -> Self {
        HydronetError::SchemaValidation {
            collection,
            entity: entity.map(str::to_string),
            details: details.into(),
        }
    }

    /// The collection an error relates to, if it is a load-time error.
    pub fn collection(&self) -> Option<CollectionKind> {
        match self {
            HydronetError::UnknownType { collection, .. }
            | HydronetError::MissingType { collection, .. }
            | HydronetError::SchemaValidation { collection, .. }
            | HydronetError::DuplicateName { collection, .. }
            | HydronetError::NotFound { collection, .. } => Some(*collection),
            HydronetError::CyclicDependency { .. } | HydronetError::UnresolvedReference { .. } => {
                Some(CollectionKind::Parameters)
            }
            _ => None,
        }
    }
}

fn cycle_note(cyclic: &[String]) -> String {
    if cyclic.is_empty() {
        String::new()
    } else {
        format!(". Parameters in a dependency cycle: {}", cyclic.join(", "))
    }
}

/// Convenience type for `Result<T, HydronetError>`.
pub type HydronetResult<T> = Result<T, HydronetError>;
