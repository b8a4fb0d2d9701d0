use super::{BoundKind, ComponentSpec, Engine, EngineError, NodeKind};
use crate::references::ParameterValue;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A call accepted by the [`PlanEngine`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EngineCall {
    AddNode {
        name: String,
        kind: NodeKind,
        initial_volume: Option<f64>,
    },
    AddAggregatedNode {
        name: String,
        nodes: Vec<String>,
        factors: Option<Vec<f64>>,
    },
    Connect {
        from_node: String,
        to_node: String,
    },
    SetNodeCost {
        node: String,
        value: ParameterValue,
    },
    SetNodeConstraint {
        node: String,
        bound: BoundKind,
        value: ParameterValue,
    },
    CreateParameter {
        name: String,
        kind: String,
    },
    CreateRecorder {
        name: String,
        kind: String,
    },
    CreateOutput {
        name: String,
        kind: String,
        files: Vec<PathBuf>,
    },
    Run {
        solver: String,
        start: NaiveDate,
        end: NaiveDate,
        timestep_days: u32,
    },
}

impl fmt::Display for EngineCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineCall::AddNode {
                name,
                kind,
                initial_volume: Some(volume),
            } => write!(f, "add_node {name} ({kind}, initial volume {volume})"),
            EngineCall::AddNode { name, kind, .. } => write!(f, "add_node {name} ({kind})"),
            EngineCall::AddAggregatedNode {
                name,
                nodes,
                factors,
            } => {
                write!(f, "add_aggregated_node {name} [{}]", nodes.join(", "))?;
                if let Some(factors) = factors {
                    let factors: Vec<String> = factors.iter().map(f64::to_string).collect();
                    write!(f, " factors [{}]", factors.join(", "))?;
                }
                Ok(())
            }
            EngineCall::Connect { from_node, to_node } => {
                write!(f, "connect {from_node} -> {to_node}")
            }
            EngineCall::SetNodeCost { node, value } => write!(f, "set_node_cost {node} = {value}"),
            EngineCall::SetNodeConstraint { node, bound, value } => {
                write!(f, "set_node_constraint {node} {bound} = {value}")
            }
            EngineCall::CreateParameter { name, kind } => {
                write!(f, "create_parameter {name} ({kind})")
            }
            EngineCall::CreateRecorder { name, kind } => {
                write!(f, "create_recorder {name} ({kind})")
            }
            EngineCall::CreateOutput { name, kind, files } => {
                write!(f, "create_output {name} ({kind})")?;
                for file in files {
                    write!(f, " -> {}", file.display())?;
                }
                Ok(())
            }
            EngineCall::Run {
                solver,
                start,
                end,
                timestep_days,
            } => write!(f, "run {solver} {start}..{end} every {timestep_days} day(s)"),
        }
    }
}

/// An in-memory engine that validates references and records the build plan.
///
/// It mirrors the reference rules of a real engine: node names are checked when
/// edges and constraints are added, parameters must exist before anything
/// that reads them, and names are unique per kind of component. Nothing is
/// simulated.
#[derive(Debug, Clone)]
pub struct PlanEngine {
    nodes: IndexMap<String, NodeKind>,
    parameters: IndexMap<String, String>,
    recorders: IndexMap<String, String>,
    outputs: IndexMap<String, String>,
    solvers: Vec<String>,
    calls: Vec<EngineCall>,
}

impl Default for PlanEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanEngine {
    /// Engine accepting the `clp` and `highs` solvers.
    pub fn new() -> Self {
        Self::with_solvers(vec!["clp".to_string(), "highs".to_string()])
    }

    pub fn with_solvers(solvers: Vec<String>) -> Self {
        Self {
            nodes: IndexMap::new(),
            parameters: IndexMap::new(),
            recorders: IndexMap::new(),
            outputs: IndexMap::new(),
            solvers,
            calls: Vec::new(),
        }
    }

    /// Calls accepted so far, in order.
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn node_kind(&self, name: &str) -> Option<NodeKind> {
        self.nodes.get(name).copied()
    }

    /// Parameters in the order they were created.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.keys().map(String::as_str).collect()
    }

    pub fn has_run(&self) -> bool {
        self.calls
            .iter()
            .any(|call| matches!(call, EngineCall::Run { .. }))
    }

    fn require_node(&self, name: &str) -> Result<NodeKind, EngineError> {
        self.node_kind(name)
            .ok_or_else(|| EngineError::UnknownNode(name.to_string()))
    }

    fn ensure_new_node(&self, name: &str) -> Result<(), EngineError> {
        if self.nodes.contains_key(name) {
            return Err(EngineError::DuplicateName {
                kind: "node",
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn require_value(&self, value: &ParameterValue) -> Result<(), EngineError> {
        match value.parameter_name() {
            Some(name) if !self.parameters.contains_key(name) => {
                Err(EngineError::UnknownParameter(name.to_string()))
            }
            _ => Ok(()),
        }
    }
}

fn ensure_unique(
    registered: &IndexMap<String, String>,
    kind: &'static str,
    name: &str,
) -> Result<(), EngineError> {
    if registered.contains_key(name) {
        return Err(EngineError::DuplicateName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

impl Engine for PlanEngine {
    fn add_node(
        &mut self,
        name: &str,
        kind: NodeKind,
        initial_volume: Option<f64>,
    ) -> Result<(), EngineError> {
        if kind == NodeKind::Aggregated {
            return Err(EngineError::Other(format!(
                "aggregated node \"{name}\" must be created from its member nodes"
            )));
        }
        self.ensure_new_node(name)?;
        self.nodes.insert(name.to_string(), kind);
        self.calls.push(EngineCall::AddNode {
            name: name.to_string(),
            kind,
            initial_volume,
        });
        Ok(())
    }

    fn add_aggregated_node(
        &mut self,
        name: &str,
        nodes: &[String],
        factors: Option<&[f64]>,
    ) -> Result<(), EngineError> {
        self.ensure_new_node(name)?;
        for member in nodes {
            if self.require_node(member)? == NodeKind::Aggregated {
                return Err(EngineError::Other(format!(
                    "aggregated node \"{name}\" cannot contain aggregated node \"{member}\""
                )));
            }
        }
        if let Some(factors) = factors {
            if factors.len() != nodes.len() {
                return Err(EngineError::Other(format!(
                    "aggregated node \"{name}\" has {} factor(s) for {} node(s)",
                    factors.len(),
                    nodes.len()
                )));
            }
        }
        self.nodes.insert(name.to_string(), NodeKind::Aggregated);
        self.calls.push(EngineCall::AddAggregatedNode {
            name: name.to_string(),
            nodes: nodes.to_vec(),
            factors: factors.map(<[f64]>::to_vec),
        });
        Ok(())
    }

    fn connect(&mut self, from_node: &str, to_node: &str) -> Result<(), EngineError> {
        for node in [from_node, to_node] {
            if self.require_node(node)? == NodeKind::Aggregated {
                return Err(EngineError::Other(format!(
                    "aggregated node \"{node}\" cannot be connected"
                )));
            }
        }
        self.calls.push(EngineCall::Connect {
            from_node: from_node.to_string(),
            to_node: to_node.to_string(),
        });
        Ok(())
    }

    fn set_node_cost(&mut self, node: &str, value: &ParameterValue) -> Result<(), EngineError> {
        if self.require_node(node)? == NodeKind::Aggregated {
            return Err(EngineError::Other(format!(
                "cost cannot be set on aggregated node \"{node}\""
            )));
        }
        self.require_value(value)?;
        self.calls.push(EngineCall::SetNodeCost {
            node: node.to_string(),
            value: value.clone(),
        });
        Ok(())
    }

    fn set_node_constraint(
        &mut self,
        node: &str,
        bound: BoundKind,
        value: &ParameterValue,
    ) -> Result<(), EngineError> {
        let kind = self.require_node(node)?;
        if bound.is_volume() != (kind == NodeKind::Storage) {
            return Err(EngineError::Other(format!(
                "{bound} cannot be set on {kind} node \"{node}\""
            )));
        }
        self.require_value(value)?;
        self.calls.push(EngineCall::SetNodeConstraint {
            node: node.to_string(),
            bound,
            value: value.clone(),
        });
        Ok(())
    }

    fn create_parameter(
        &mut self,
        name: &str,
        kind: &str,
        spec: &ComponentSpec,
    ) -> Result<(), EngineError> {
        ensure_unique(&self.parameters, "parameter", name)?;
        if let Some(missing) = spec
            .parameter_references
            .iter()
            .find(|reference| !self.parameters.contains_key(reference.as_str()))
        {
            return Err(EngineError::DependencyNotFound {
                parameter: name.to_string(),
                missing: missing.clone(),
            });
        }
        for node in &spec.node_references {
            self.require_node(node)?;
        }
        self.parameters.insert(name.to_string(), kind.to_string());
        self.calls.push(EngineCall::CreateParameter {
            name: name.to_string(),
            kind: kind.to_string(),
        });
        Ok(())
    }

    fn create_recorder(
        &mut self,
        name: &str,
        kind: &str,
        spec: &ComponentSpec,
    ) -> Result<(), EngineError> {
        ensure_unique(&self.recorders, "recorder", name)?;
        for node in &spec.node_references {
            let node_kind = self.require_node(node)?;
            if kind == "StorageVolume" && node_kind != NodeKind::Storage {
                return Err(EngineError::Other(format!(
                    "recorder \"{name}\" needs a storage node but \"{node}\" is a {node_kind} node"
                )));
            }
        }
        if let Some(missing) = spec
            .parameter_references
            .iter()
            .find(|reference| !self.parameters.contains_key(reference.as_str()))
        {
            return Err(EngineError::UnknownParameter(missing.clone()));
        }
        self.recorders.insert(name.to_string(), kind.to_string());
        self.calls.push(EngineCall::CreateRecorder {
            name: name.to_string(),
            kind: kind.to_string(),
        });
        Ok(())
    }

    fn create_output(
        &mut self,
        name: &str,
        kind: &str,
        spec: &ComponentSpec,
    ) -> Result<(), EngineError> {
        ensure_unique(&self.outputs, "output", name)?;
        self.outputs.insert(name.to_string(), kind.to_string());
        self.calls.push(EngineCall::CreateOutput {
            name: name.to_string(),
            kind: kind.to_string(),
            files: spec.files.clone(),
        });
        Ok(())
    }

    fn run(
        &mut self,
        solver: &str,
        start: NaiveDate,
        end: NaiveDate,
        timestep_days: u32,
    ) -> Result<(), EngineError> {
        if !self.solvers.iter().any(|s| s.eq_ignore_ascii_case(solver)) {
            return Err(EngineError::UnsupportedSolver(solver.to_string()));
        }
        self.calls.push(EngineCall::Run {
            solver: solver.to_string(),
            start,
            end,
            timestep_days,
        });
        Ok(())
    }
}
