use crate::engine::SpecContext;
use crate::errors::{CollectionKind, HydronetError, HydronetResult};
use crate::tables::Table;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A column of timeseries data, read either from a file or from a declared table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataFrameParameter {
    pub name: String,
    pub comment: Option<String>,
    pub url: Option<PathBuf>,
    pub table: Option<String>,
    pub column: String,
}

impl DataFrameParameter {
    pub(crate) fn validate(&self) -> HydronetResult<()> {
        let details = match (&self.url, &self.table) {
            (Some(_), None) | (None, Some(_)) => return Ok(()),
            (None, None) => "one of url or table is required",
            (Some(_), Some(_)) => "url and table cannot both be given",
        };
        Err(HydronetError::schema(
            CollectionKind::Parameters,
            Some(&self.name),
            details,
        ))
    }

    /// The data file, resolved against the model path.
    ///
    /// A table source must exist in the model's tables.
    pub(crate) fn source(&self, context: &SpecContext<'_>) -> HydronetResult<PathBuf> {
        match (&self.url, &self.table) {
            (Some(url), _) => Ok(context.resolve_path(url)),
            (None, Some(table)) => {
                let table: &Table = context.tables.get(table)?;
                Ok(context.resolve_path(table.url()))
            }
            (None, None) => Err(HydronetError::schema(
                CollectionKind::Parameters,
                Some(&self.name),
                "one of url or table is required",
            )),
        }
    }
}
