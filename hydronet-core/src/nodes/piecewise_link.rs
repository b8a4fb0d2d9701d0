use crate::errors::{CollectionKind, HydronetError, HydronetResult};
use crate::references::ParameterValue;
use serde::{Deserialize, Serialize};

/// One band of a [`PiecewiseLinkNode`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PiecewiseLinkStep {
    pub cost: Option<ParameterValue>,
    pub max_flow: Option<ParameterValue>,
}

/// A link whose flow is split over steps with their own cost and capacity.
///
/// Every step is built as a separate link node, see [`PiecewiseLinkNode::step_name`].
/// Edges to or from the piecewise link connect each of its steps.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PiecewiseLinkNode {
    pub name: String,
    pub comment: Option<String>,
    pub steps: Vec<PiecewiseLinkStep>,
}

impl PiecewiseLinkNode {
    /// Name of the engine node built for step `index`.
    pub fn step_name(&self, index: usize) -> String {
        format!("{}.step-{index}", self.name)
    }

    /// Engine node names of all steps, in order.
    pub fn step_names(&self) -> Vec<String> {
        (0..self.steps.len()).map(|i| self.step_name(i)).collect()
    }

    pub(crate) fn validate(&self) -> HydronetResult<()> {
        if self.steps.is_empty() {
            return Err(HydronetError::schema(
                CollectionKind::Nodes,
                Some(&self.name),
                "a piecewise link needs at least one step",
            ));
        }
        Ok(())
    }
}
