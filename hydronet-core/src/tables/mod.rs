//! Tabular data sources that parameters can read columns from.

use crate::collection::Entity;
use crate::errors::CollectionKind;
use crate::registry::TypeRegistry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static TABLE_REGISTRY: LazyLock<TypeRegistry<Table>> = LazyLock::new(Table::register_all);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub name: String,
    pub comment: Option<String>,
    pub url: PathBuf,
    pub index_col: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HdfTable {
    pub name: String,
    pub comment: Option<String>,
    pub url: PathBuf,
    pub key: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Table {
    #[serde(rename = "CSV")]
    Csv(CsvTable),
    #[serde(rename = "HDF")]
    Hdf(HdfTable),
}

impl Table {
    /// Build the table registry.
    pub fn register_all() -> TypeRegistry<Table> {
        let mut registry = TypeRegistry::new(CollectionKind::Tables);
        registry.register("CSV", |v| serde_json::from_value(v).map(Table::Csv));
        registry.register("HDF", |v| serde_json::from_value(v).map(Table::Hdf));
        registry
    }

    /// Location of the data, as written in the document.
    pub fn url(&self) -> &Path {
        match self {
            Table::Csv(t) => &t.url,
            Table::Hdf(t) => &t.url,
        }
    }
}

impl Entity for Table {
    const COLLECTION: CollectionKind = CollectionKind::Tables;

    fn name(&self) -> &str {
        match self {
            Table::Csv(t) => &t.name,
            Table::Hdf(t) => &t.name,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Table::Csv(_) => "CSV",
            Table::Hdf(_) => "HDF",
        }
    }

    fn registry() -> &'static TypeRegistry<Self> {
        &TABLE_REGISTRY
    }
}
