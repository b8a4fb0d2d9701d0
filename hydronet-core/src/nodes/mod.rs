//! Network nodes.
//!
//! Each node is created bare in the first build phase and has its cost and
//! bounds attached in the last one, after every parameter exists. A node
//! in the document need not be a single engine node: a piecewise link is
//! one link per step, and an aggregated node only groups other nodes.

mod aggregated;
mod catchment;
mod flow;
mod piecewise_link;
mod storage;

pub use aggregated::AggregatedNode;
pub use catchment::CatchmentNode;
pub use flow::FlowNode;
pub use piecewise_link::{PiecewiseLinkNode, PiecewiseLinkStep};
pub use storage::StorageNode;

use crate::collection::Entity;
use crate::engine::{BoundKind, NodeKind};
use crate::errors::{CollectionKind, HydronetResult};
use crate::references::{referenced_names, ParameterValue};
use crate::registry::TypeRegistry;
use serde::Serialize;
use std::sync::LazyLock;

static NODE_REGISTRY: LazyLock<TypeRegistry<Node>> = LazyLock::new(Node::register_all);

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Node {
    Input(FlowNode),
    Link(FlowNode),
    Output(FlowNode),
    Storage(StorageNode),
    Catchment(CatchmentNode),
    Aggregated(AggregatedNode),
    PiecewiseLink(PiecewiseLinkNode),
}

/// A constraint to apply to a node once parameters have been resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeConstraint<'a> {
    Cost(&'a ParameterValue),
    Bound(BoundKind, &'a ParameterValue),
}

impl<'a> NodeConstraint<'a> {
    pub fn value(&self) -> &'a ParameterValue {
        match *self {
            NodeConstraint::Cost(value) | NodeConstraint::Bound(_, value) => value,
        }
    }
}

impl Node {
    /// Build the node registry.
    pub fn register_all() -> TypeRegistry<Node> {
        let mut registry = TypeRegistry::new(CollectionKind::Nodes);
        registry.register("Input", |v| serde_json::from_value(v).map(Node::Input));
        registry.register("Link", |v| serde_json::from_value(v).map(Node::Link));
        registry.register("Output", |v| serde_json::from_value(v).map(Node::Output));
        registry.register("Storage", |v| serde_json::from_value(v).map(Node::Storage));
        registry.register("Catchment", |v| {
            serde_json::from_value(v).map(Node::Catchment)
        });
        registry.register("Aggregated", |v| {
            serde_json::from_value(v).map(Node::Aggregated)
        });
        registry.register("PiecewiseLink", |v| {
            serde_json::from_value(v).map(Node::PiecewiseLink)
        });
        registry
    }

    /// The kind of engine node this is built as.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Input(_) | Node::Catchment(_) => NodeKind::Input,
            Node::Link(_) | Node::PiecewiseLink(_) => NodeKind::Link,
            Node::Output(_) => NodeKind::Output,
            Node::Storage(_) => NodeKind::Storage,
            Node::Aggregated(_) => NodeKind::Aggregated,
        }
    }

    /// Engine nodes created for this node in the node phase.
    ///
    /// Empty for aggregated nodes, which are created from their members
    /// once all other nodes exist.
    pub fn engine_nodes(&self) -> Vec<(String, NodeKind)> {
        match self {
            Node::Aggregated(_) => vec![],
            Node::PiecewiseLink(node) => node
                .step_names()
                .into_iter()
                .map(|name| (name, NodeKind::Link))
                .collect(),
            _ => vec![(Entity::name(self).to_string(), self.kind())],
        }
    }

    /// Engine nodes an edge to or from this node attaches to.
    pub fn connectors(&self) -> Vec<String> {
        match self {
            Node::PiecewiseLink(node) => node.step_names(),
            _ => vec![Entity::name(self).to_string()],
        }
    }

    pub fn initial_volume(&self) -> Option<f64> {
        match self {
            Node::Storage(storage) => Some(storage.initial_volume),
            _ => None,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            Node::Input(node) | Node::Link(node) | Node::Output(node) => node.comment.as_deref(),
            Node::Storage(node) => node.comment.as_deref(),
            Node::Catchment(node) => node.comment.as_deref(),
            Node::Aggregated(node) => node.comment.as_deref(),
            Node::PiecewiseLink(node) => node.comment.as_deref(),
        }
    }

    /// Constraints in application order: cost, then flow bounds, then volume bounds.
    pub fn constraints(&self) -> Vec<NodeConstraint<'_>> {
        let constraints: Vec<Option<NodeConstraint<'_>>> = match self {
            Node::Input(node) | Node::Link(node) | Node::Output(node) => vec![
                cost(&node.cost),
                bound(BoundKind::MinFlow, &node.min_flow),
                bound(BoundKind::MaxFlow, &node.max_flow),
            ],
            Node::Storage(node) => vec![
                cost(&node.cost),
                bound(BoundKind::MinVolume, &node.min_volume),
                bound(BoundKind::MaxVolume, &node.max_volume),
            ],
            Node::Catchment(node) => vec![
                cost(&node.cost),
                bound(BoundKind::MinFlow, &node.flow),
                bound(BoundKind::MaxFlow, &node.flow),
            ],
            Node::Aggregated(node) => vec![
                bound(BoundKind::MinFlow, &node.min_flow),
                bound(BoundKind::MaxFlow, &node.max_flow),
            ],
            Node::PiecewiseLink(node) => node
                .steps
                .iter()
                .flat_map(|step| {
                    [cost(&step.cost), bound(BoundKind::MaxFlow, &step.max_flow)]
                })
                .collect(),
        };
        constraints.into_iter().flatten().collect()
    }

    /// Constraints paired with the engine node each one is applied to.
    pub fn engine_constraints(&self) -> Vec<(String, NodeConstraint<'_>)> {
        match self {
            Node::PiecewiseLink(node) => node
                .steps
                .iter()
                .enumerate()
                .flat_map(|(index, step)| {
                    let target = node.step_name(index);
                    [cost(&step.cost), bound(BoundKind::MaxFlow, &step.max_flow)]
                        .into_iter()
                        .flatten()
                        .map(move |constraint| (target.clone(), constraint))
                })
                .collect(),
            _ => self
                .constraints()
                .into_iter()
                .map(|constraint| (Entity::name(self).to_string(), constraint))
                .collect(),
        }
    }

    /// Parameters named by this node's constraints.
    pub fn parameter_references(&self) -> Vec<&str> {
        let constraints = self.constraints();
        referenced_names(constraints.iter().map(NodeConstraint::value))
    }
}

fn cost(value: &Option<ParameterValue>) -> Option<NodeConstraint<'_>> {
    value.as_ref().map(NodeConstraint::Cost)
}

fn bound(kind: BoundKind, value: &Option<ParameterValue>) -> Option<NodeConstraint<'_>> {
    value
        .as_ref()
        .map(|value| NodeConstraint::Bound(kind, value))
}

impl Entity for Node {
    const COLLECTION: CollectionKind = CollectionKind::Nodes;

    fn name(&self) -> &str {
        match self {
            Node::Input(node) | Node::Link(node) | Node::Output(node) => &node.name,
            Node::Storage(node) => &node.name,
            Node::Catchment(node) => &node.name,
            Node::Aggregated(node) => &node.name,
            Node::PiecewiseLink(node) => &node.name,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Node::Input(_) => "Input",
            Node::Link(_) => "Link",
            Node::Output(_) => "Output",
            Node::Storage(_) => "Storage",
            Node::Catchment(_) => "Catchment",
            Node::Aggregated(_) => "Aggregated",
            Node::PiecewiseLink(_) => "PiecewiseLink",
        }
    }

    fn registry() -> &'static TypeRegistry<Self> {
        &NODE_REGISTRY
    }

    fn validate(&self) -> HydronetResult<()> {
        match self {
            Node::Storage(storage) => storage.validate(),
            Node::Aggregated(aggregated) => aggregated.validate(),
            Node::PiecewiseLink(link) => link.validate(),
            _ => Ok(()),
        }
    }
}
