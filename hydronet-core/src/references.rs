use serde::{Deserialize, Serialize};
use std::fmt;

/// A value that is either a literal constant or the name of a parameter.
///
/// Named references may point at parameters that have not been created in
/// the engine yet; that is what the parameter resolver has to deal with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ParameterValue {
    Constant(f64),
    Parameter(String),
}

impl ParameterValue {
    /// Name of the referenced parameter, if this is a reference.
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            ParameterValue::Parameter(name) => Some(name.as_str()),
            ParameterValue::Constant(_) => None,
        }
    }

    pub fn as_constant(&self) -> Option<f64> {
        match self {
            ParameterValue::Constant(value) => Some(*value),
            ParameterValue::Parameter(_) => None,
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Constant(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(name: &str) -> Self {
        ParameterValue::Parameter(name.to_string())
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Constant(value) => write!(f, "{value}"),
            ParameterValue::Parameter(name) => write!(f, "parameter \"{name}\""),
        }
    }
}

/// Names referenced by a set of values, in order and without repeats.
pub(crate) fn referenced_names<'a>(
    values: impl IntoIterator<Item = &'a ParameterValue>,
) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();
    for name in values.into_iter().filter_map(ParameterValue::parameter_name) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
