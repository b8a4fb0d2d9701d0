use crate::errors::{CollectionKind, HydronetError, HydronetResult};
use crate::references::ParameterValue;
use serde::{Deserialize, Serialize};

/// The index of the band of control curves the storage node's volume lies in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ControlCurveIndexParameter {
    pub name: String,
    pub comment: Option<String>,
    pub storage_node: String,
    pub control_curves: Vec<ParameterValue>,
}

/// Interpolates between a pair of values within each control curve band.
///
/// `values` holds one `[upper, lower]` pair per band, so there is always one
/// more pair than there are control curves.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ControlCurvePiecewiseInterpolatedParameter {
    pub name: String,
    pub comment: Option<String>,
    pub storage_node: String,
    pub control_curves: Vec<ParameterValue>,
    pub values: Vec<[f64; 2]>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl ControlCurvePiecewiseInterpolatedParameter {
    pub(crate) fn validate(&self) -> HydronetResult<()> {
        let expected = self.control_curves.len() + 1;
        if self.values.len() != expected {
            return Err(HydronetError::schema(
                CollectionKind::Parameters,
                Some(&self.name),
                format!(
                    "{} control curve(s) need {expected} value pairs, found {}",
                    self.control_curves.len(),
                    self.values.len()
                ),
            ));
        }
        if let (Some(minimum), Some(maximum)) = (self.minimum, self.maximum) {
            if minimum > maximum {
                return Err(HydronetError::schema(
                    CollectionKind::Parameters,
                    Some(&self.name),
                    format!("minimum ({minimum}) exceeds maximum ({maximum})"),
                ));
            }
        }
        Ok(())
    }
}
