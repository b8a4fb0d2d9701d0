use crate::errors::{CollectionKind, HydronetError, HydronetResult};
use crate::references::ParameterValue;
use serde::{Deserialize, Serialize};

/// A virtual node bounding the combined flow through other nodes.
///
/// With `factors`, the member flows are also held in those proportions.
/// Nothing flows through the aggregated node itself, so it takes no edges
/// and no cost.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AggregatedNode {
    pub name: String,
    pub comment: Option<String>,
    pub nodes: Vec<String>,
    pub factors: Option<Vec<f64>>,
    pub min_flow: Option<ParameterValue>,
    pub max_flow: Option<ParameterValue>,
}

impl AggregatedNode {
    pub fn new(name: &str, nodes: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            comment: None,
            nodes: nodes.iter().map(|node| node.to_string()).collect(),
            factors: None,
            min_flow: None,
            max_flow: None,
        }
    }

    pub fn with_factors(mut self, factors: Vec<f64>) -> Self {
        self.factors = Some(factors);
        self
    }

    pub fn with_max_flow(mut self, max_flow: impl Into<ParameterValue>) -> Self {
        self.max_flow = Some(max_flow.into());
        self
    }

    pub(crate) fn validate(&self) -> HydronetResult<()> {
        let invalid = |details: String| {
            Err(HydronetError::schema(
                CollectionKind::Nodes,
                Some(&self.name),
                details,
            ))
        };

        if self.nodes.is_empty() {
            return invalid("an aggregated node needs at least one member node".to_string());
        }
        if let Some(factors) = &self.factors {
            if factors.len() != self.nodes.len() {
                return invalid(format!(
                    "{} factor(s) given for {} node(s)",
                    factors.len(),
                    self.nodes.len()
                ));
            }
            if let Some(factor) = factors.iter().find(|f| !f.is_finite() || **f <= 0.0) {
                return invalid(format!("factors must be positive, got {factor}"));
            }
        }
        Ok(())
    }
}
