use crate::references::ParameterValue;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    #[serde(rename = "LT", alias = "lt")]
    LessThan,
    #[serde(rename = "GT", alias = "gt")]
    GreaterThan,
    #[serde(rename = "LE", alias = "le")]
    LessThanOrEqualTo,
    #[serde(rename = "GE", alias = "ge")]
    GreaterThanOrEqualTo,
    #[serde(rename = "EQ", alias = "eq")]
    EqualTo,
}

/// One when `parameter <predicate> threshold` holds, zero otherwise.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParameterThresholdParameter {
    pub name: String,
    pub comment: Option<String>,
    pub parameter: ParameterValue,
    pub threshold: ParameterValue,
    pub predicate: Predicate,
}
