//! Loader options and user settings.
//!
//! [`Settings`] are read from a TOML file and are the source of the
//! [`LoadOptions`] passed to the model loader and of the solvers accepted by
//! the plan engine.

use crate::errors::{CollectionKind, HydronetError, HydronetResult};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How unknown keys in a model document are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Unknown keys are a validation error
    #[default]
    Strict,
    /// Unknown keys are logged and ignored
    Permissive,
}

/// Options controlling how a model document is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    pub strictness: Strictness,
}

impl LoadOptions {
    pub fn strict() -> Self {
        Self {
            strictness: Strictness::Strict,
        }
    }

    pub fn permissive() -> Self {
        Self {
            strictness: Strictness::Permissive,
        }
    }

    /// Applies the strictness policy to a set of unknown keys.
    pub(crate) fn check_unknown_fields(
        &self,
        collection: CollectionKind,
        entity: Option<&str>,
        unknown: &[String],
    ) -> HydronetResult<()> {
        if unknown.is_empty() {
            return Ok(());
        }
        match self.strictness {
            Strictness::Strict => Err(HydronetError::schema(
                collection,
                entity,
                format!("unknown field(s): {}", unknown.join(", ")),
            )),
            Strictness::Permissive => {
                warn!(
                    "Ignoring unknown field(s) {} in {}{}",
                    unknown.join(", "),
                    collection,
                    entity.map(|e| format!(" entry \"{e}\"")).unwrap_or_default()
                );
                Ok(())
            }
        }
    }
}

/// User settings, usually read from `hydronet.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Policy for unknown keys in model documents
    pub strictness: Strictness,
    /// Solver used when none is given on the command line
    pub default_solver: String,
    /// Solvers the engine accepts
    pub solvers: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strictness: Strictness::Strict,
            default_solver: "clp".to_string(),
            solvers: vec!["clp".to_string(), "highs".to_string()],
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> HydronetResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> HydronetResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| HydronetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            strictness: self.strictness,
        }
    }
}
