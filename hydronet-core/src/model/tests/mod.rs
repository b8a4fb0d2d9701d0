//! Builder scenarios run against the plan engine.

#[cfg(test)]
mod resolution;

use crate::engine::{BoundKind, ComponentSpec, Engine, EngineError, NodeKind, PlanEngine};
use crate::model::ModelDefinition;
use crate::references::ParameterValue;
use crate::settings::LoadOptions;
use chrono::NaiveDate;
use serde_json::{json, Value};

/// Load a document, filling in a one-week timestepper and an empty node list.
fn definition(mut document: Value) -> ModelDefinition {
    let fields = document.as_object_mut().unwrap();
    fields
        .entry("timestepper")
        .or_insert_with(|| json!({"start": "2021-01-01", "end": "2021-01-07", "timestep": 1}));
    fields.entry("nodes").or_insert_with(|| json!([]));
    ModelDefinition::from_value(document, &LoadOptions::strict()).unwrap()
}

/// A plan engine that rejects one parameter with a failure that is not retryable.
struct RejectingEngine {
    inner: PlanEngine,
    reject: String,
    attempts: usize,
}

impl RejectingEngine {
    fn new(reject: &str) -> Self {
        Self {
            inner: PlanEngine::new(),
            reject: reject.to_string(),
            attempts: 0,
        }
    }
}

impl Engine for RejectingEngine {
    fn add_node(
        &mut self,
        name: &str,
        kind: NodeKind,
        initial_volume: Option<f64>,
    ) -> Result<(), EngineError> {
        self.inner.add_node(name, kind, initial_volume)
    }

    fn add_aggregated_node(
        &mut self,
        name: &str,
        nodes: &[String],
        factors: Option<&[f64]>,
    ) -> Result<(), EngineError> {
        self.inner.add_aggregated_node(name, nodes, factors)
    }

    fn connect(&mut self, from_node: &str, to_node: &str) -> Result<(), EngineError> {
        self.inner.connect(from_node, to_node)
    }

    fn set_node_cost(&mut self, node: &str, value: &ParameterValue) -> Result<(), EngineError> {
        self.inner.set_node_cost(node, value)
    }

    fn set_node_constraint(
        &mut self,
        node: &str,
        bound: BoundKind,
        value: &ParameterValue,
    ) -> Result<(), EngineError> {
        self.inner.set_node_constraint(node, bound, value)
    }

    fn create_parameter(
        &mut self,
        name: &str,
        kind: &str,
        spec: &ComponentSpec,
    ) -> Result<(), EngineError> {
        self.attempts += 1;
        if name == self.reject {
            return Err(EngineError::Other(format!("{name} rejected")));
        }
        self.inner.create_parameter(name, kind, spec)
    }

    fn create_recorder(
        &mut self,
        name: &str,
        kind: &str,
        spec: &ComponentSpec,
    ) -> Result<(), EngineError> {
        self.inner.create_recorder(name, kind, spec)
    }

    fn create_output(
        &mut self,
        name: &str,
        kind: &str,
        spec: &ComponentSpec,
    ) -> Result<(), EngineError> {
        self.inner.create_output(name, kind, spec)
    }

    fn run(
        &mut self,
        solver: &str,
        start: NaiveDate,
        end: NaiveDate,
        timestep_days: u32,
    ) -> Result<(), EngineError> {
        self.inner.run(solver, start, end, timestep_days)
    }
}
