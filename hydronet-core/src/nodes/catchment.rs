use crate::references::ParameterValue;
use serde::{Deserialize, Serialize};

/// An inflow whose flow is fixed to a single value each timestep.
///
/// Built as an input node with equal minimum and maximum flow.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatchmentNode {
    pub name: String,
    pub comment: Option<String>,
    pub cost: Option<ParameterValue>,
    pub flow: Option<ParameterValue>,
}
