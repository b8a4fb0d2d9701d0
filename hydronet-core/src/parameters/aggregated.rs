use crate::errors::{CollectionKind, HydronetError, HydronetResult};
use crate::references::ParameterValue;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AggFunc {
    Sum,
    Product,
    Mean,
    Min,
    Max,
}

/// Combines several values with a single aggregation function.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AggregatedParameter {
    pub name: String,
    pub comment: Option<String>,
    pub agg_func: AggFunc,
    pub parameters: Vec<ParameterValue>,
}

impl AggregatedParameter {
    pub fn new(name: &str, agg_func: AggFunc, parameters: Vec<ParameterValue>) -> Self {
        Self {
            name: name.to_string(),
            comment: None,
            agg_func,
            parameters,
        }
    }

    pub(crate) fn validate(&self) -> HydronetResult<()> {
        if self.parameters.is_empty() {
            return Err(HydronetError::schema(
                CollectionKind::Parameters,
                Some(&self.name),
                "at least one value must be aggregated",
            ));
        }
        Ok(())
    }
}
