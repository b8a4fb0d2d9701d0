use crate::errors::{CollectionKind, HydronetError, HydronetResult};
use serde::{Deserialize, Serialize};

/// One value per calendar month, January first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthlyProfileParameter {
    pub name: String,
    pub comment: Option<String>,
    pub values: Vec<f64>,
}

impl MonthlyProfileParameter {
    pub(crate) fn validate(&self) -> HydronetResult<()> {
        if self.values.len() != 12 {
            return Err(HydronetError::schema(
                CollectionKind::Parameters,
                Some(&self.name),
                format!("expected 12 monthly values, found {}", self.values.len()),
            ));
        }
        Ok(())
    }
}
