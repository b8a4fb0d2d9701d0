use crate::references::ParameterValue;
use serde::{Deserialize, Serialize};

/// Fields shared by the input, link and output nodes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FlowNode {
    pub name: String,
    pub comment: Option<String>,
    pub cost: Option<ParameterValue>,
    pub min_flow: Option<ParameterValue>,
    pub max_flow: Option<ParameterValue>,
}

impl FlowNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            comment: None,
            cost: None,
            min_flow: None,
            max_flow: None,
        }
    }

    pub fn with_cost(mut self, cost: impl Into<ParameterValue>) -> Self {
        self.cost = Some(cost.into());
        self
    }

    pub fn with_max_flow(mut self, max_flow: impl Into<ParameterValue>) -> Self {
        self.max_flow = Some(max_flow.into());
        self
    }

    pub fn with_min_flow(mut self, min_flow: impl Into<ParameterValue>) -> Self {
        self.min_flow = Some(min_flow.into());
        self
    }
}
