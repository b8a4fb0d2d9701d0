use crate::references::ParameterValue;
use serde::{Deserialize, Serialize};

/// A fixed value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConstantParameter {
    pub name: String,
    pub comment: Option<String>,
    pub value: f64,
}

impl ConstantParameter {
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            comment: None,
            value,
        }
    }
}

/// The negation of another value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NegativeParameter {
    pub name: String,
    pub comment: Option<String>,
    pub parameter: ParameterValue,
}

/// The larger of another value and a threshold.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MaxParameter {
    pub name: String,
    pub comment: Option<String>,
    pub parameter: ParameterValue,
    #[serde(default)]
    pub threshold: f64,
}

/// A polynomial of another value, coefficients in increasing order of power.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Polynomial1DParameter {
    pub name: String,
    pub comment: Option<String>,
    pub parameter: ParameterValue,
    pub coefficients: Vec<f64>,
}
