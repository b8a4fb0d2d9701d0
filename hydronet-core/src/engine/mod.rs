//! The interface to the computational engine.
//!
//! The engine holds the actual network graph and runs the simulation. The
//! builder only sequences calls against the [`Engine`] trait and interprets one
//! distinguished failure, [`EngineError::DependencyNotFound`], which tells the
//! parameter resolver to retry in a later round.
//!
//! [`PlanEngine`] is an in-memory implementation that enforces the engine-side
//! reference rules and records every call it accepts.

mod plan;
mod spec;

pub use plan::{EngineCall, PlanEngine};
pub use spec::{ComponentSpec, SpecContext};

use crate::references::ParameterValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of bare node created in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Input,
    Link,
    Output,
    Storage,
    /// A group of other nodes whose combined flow is bounded
    Aggregated,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Input => "input",
            NodeKind::Link => "link",
            NodeKind::Output => "output",
            NodeKind::Storage => "storage",
            NodeKind::Aggregated => "aggregated",
        };
        f.write_str(name)
    }
}

/// A bound that can be attached to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundKind {
    MinFlow,
    MaxFlow,
    MinVolume,
    MaxVolume,
}

impl BoundKind {
    pub fn is_volume(&self) -> bool {
        matches!(self, BoundKind::MinVolume | BoundKind::MaxVolume)
    }
}

impl fmt::Display for BoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoundKind::MinFlow => "min_flow",
            BoundKind::MaxFlow => "max_flow",
            BoundKind::MinVolume => "min_volume",
            BoundKind::MaxVolume => "max_volume",
        };
        f.write_str(name)
    }
}

/// Failures reported by an engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A parameter references another parameter which does not exist (yet).
    #[error("parameter \"{parameter}\" depends on \"{missing}\" which has not been created")]
    DependencyNotFound { parameter: String, missing: String },
    #[error("node \"{0}\" does not exist")]
    UnknownNode(String),
    #[error("parameter \"{0}\" does not exist")]
    UnknownParameter(String),
    #[error("{kind} \"{name}\" already exists")]
    DuplicateName { kind: &'static str, name: String },
    #[error("solver \"{0}\" is not supported")]
    UnsupportedSolver(String),
    #[error("{0}")]
    Other(String),
}

/// Build-time operations offered by an engine.
///
/// Calls are issued strictly sequentially by a single build.
pub trait Engine {
    /// Create a bare node; `initial_volume` is only given for storage nodes.
    fn add_node(
        &mut self,
        name: &str,
        kind: NodeKind,
        initial_volume: Option<f64>,
    ) -> Result<(), EngineError>;

    /// Create a node bounding the combined flow of existing `nodes`.
    fn add_aggregated_node(
        &mut self,
        name: &str,
        nodes: &[String],
        factors: Option<&[f64]>,
    ) -> Result<(), EngineError>;

    fn connect(&mut self, from_node: &str, to_node: &str) -> Result<(), EngineError>;

    fn set_node_cost(&mut self, node: &str, value: &ParameterValue) -> Result<(), EngineError>;

    fn set_node_constraint(
        &mut self,
        node: &str,
        bound: BoundKind,
        value: &ParameterValue,
    ) -> Result<(), EngineError>;

    /// Create a parameter.
    ///
    /// Must return [`EngineError::DependencyNotFound`] when the spec references a
    /// parameter that has not been created.
    fn create_parameter(
        &mut self,
        name: &str,
        kind: &str,
        spec: &ComponentSpec,
    ) -> Result<(), EngineError>;

    fn create_recorder(
        &mut self,
        name: &str,
        kind: &str,
        spec: &ComponentSpec,
    ) -> Result<(), EngineError>;

    fn create_output(
        &mut self,
        name: &str,
        kind: &str,
        spec: &ComponentSpec,
    ) -> Result<(), EngineError>;

    /// Run the built model.
    fn run(
        &mut self,
        solver: &str,
        start: NaiveDate,
        end: NaiveDate,
        timestep_days: u32,
    ) -> Result<(), EngineError>;
}
