//! Builds a model definition into an engine.

use super::definition::ModelDefinition;
use super::resolver::{resolve_parameters, Resolution};
use crate::collection::Entity;
use crate::engine::{Engine, EngineError};
use crate::errors::{BuildPhase, HydronetError, HydronetResult};
use crate::nodes::{Node, NodeConstraint};
use log::{debug, info};

/// Counts of what a build created.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildReport {
    pub nodes: usize,
    pub edges: usize,
    pub recorders: usize,
    pub outputs: usize,
    pub constraints: usize,
    /// How the parameters were resolved
    pub resolution: Resolution,
}

impl BuildReport {
    pub fn parameters(&self) -> usize {
        self.resolution.order.len()
    }
}

fn engine_error(phase: BuildPhase, entity: &str) -> impl FnOnce(EngineError) -> HydronetError {
    let entity = entity.to_string();
    move |source| HydronetError::Engine {
        phase,
        entity,
        source,
    }
}

/// Drives an [`Engine`] through the build phases of a model.
///
/// The phases run strictly in order, each completing before the next starts:
///
/// 1. nodes are created without constraints, aggregated nodes last
/// 2. edges connect the nodes, once per step of a piecewise link
/// 3. parameters are created once their references exist
/// 4. recorders
/// 5. outputs
/// 6. node costs and bounds, which may name any parameter
///
/// The first failure stops the build.
pub struct GraphBuilder<'a> {
    definition: &'a ModelDefinition,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(definition: &'a ModelDefinition) -> Self {
        Self { definition }
    }

    pub fn build<E: Engine>(&self, engine: &mut E) -> HydronetResult<BuildReport> {
        let mut report = BuildReport {
            nodes: self.create_nodes(engine)?,
            edges: self.create_edges(engine)?,
            ..BuildReport::default()
        };

        report.resolution = resolve_parameters(
            &self.definition.parameters,
            &self.definition.spec_context(),
            engine,
        )?;
        debug!(
            "Created {} parameter(s) in {} round(s)",
            report.parameters(),
            report.resolution.rounds
        );

        report.recorders = self.create_recorders(engine)?;
        report.outputs = self.create_outputs(engine)?;
        report.constraints = self.apply_constraints(engine)?;

        info!(
            "Built model: {} node(s), {} edge(s), {} parameter(s), {} recorder(s), {} output(s), {} constraint(s)",
            report.nodes,
            report.edges,
            report.parameters(),
            report.recorders,
            report.outputs,
            report.constraints
        );
        Ok(report)
    }

    /// Engine nodes that `name` stands for; unknown names are passed through
    /// for the engine to reject.
    fn connectors(&self, name: &str) -> Vec<String> {
        self.definition
            .nodes
            .get(name)
            .map(Node::connectors)
            .unwrap_or_else(|_| vec![name.to_string()])
    }

    fn create_nodes<E: Engine>(&self, engine: &mut E) -> HydronetResult<usize> {
        let mut aggregated = Vec::new();
        for node in &self.definition.nodes {
            if let Node::Aggregated(group) = node {
                aggregated.push(group);
                continue;
            }
            for (name, kind) in node.engine_nodes() {
                engine
                    .add_node(&name, kind, node.initial_volume())
                    .map_err(engine_error(BuildPhase::Nodes, node.name()))?;
            }
        }
        // Members must exist first
        for group in &aggregated {
            engine
                .add_aggregated_node(&group.name, &group.nodes, group.factors.as_deref())
                .map_err(engine_error(BuildPhase::Nodes, &group.name))?;
        }
        debug!(
            "Created {} node(s), {} of them aggregated",
            self.definition.nodes.len(),
            aggregated.len()
        );
        Ok(self.definition.nodes.len())
    }

    fn create_edges<E: Engine>(&self, engine: &mut E) -> HydronetResult<usize> {
        let mut connections = 0;
        for edge in &self.definition.edges {
            let label = format!("{} -> {}", edge.from_node, edge.to_node);
            let to_nodes = self.connectors(&edge.to_node);
            for from_node in self.connectors(&edge.from_node) {
                for to_node in &to_nodes {
                    engine
                        .connect(&from_node, to_node)
                        .map_err(engine_error(BuildPhase::Edges, &label))?;
                    connections += 1;
                }
            }
        }
        debug!(
            "Created {} edge(s) as {connections} connection(s)",
            self.definition.edges.len()
        );
        Ok(self.definition.edges.len())
    }

    fn create_recorders<E: Engine>(&self, engine: &mut E) -> HydronetResult<usize> {
        for recorder in &self.definition.recorders {
            let mut spec = recorder.spec()?;
            spec.node_references = spec
                .node_references
                .iter()
                .flat_map(|node| self.connectors(node))
                .collect();
            engine
                .create_recorder(recorder.name(), recorder.type_name(), &spec)
                .map_err(engine_error(BuildPhase::Recorders, recorder.name()))?;
        }
        debug!("Created {} recorder(s)", self.definition.recorders.len());
        Ok(self.definition.recorders.len())
    }

    fn create_outputs<E: Engine>(&self, engine: &mut E) -> HydronetResult<usize> {
        let context = self.definition.spec_context();
        for output in &self.definition.outputs {
            let spec = output.spec(&context)?;
            engine
                .create_output(output.name(), output.type_name(), &spec)
                .map_err(engine_error(BuildPhase::Outputs, output.name()))?;
        }
        debug!("Created {} output(s)", self.definition.outputs.len());
        Ok(self.definition.outputs.len())
    }

    fn apply_constraints<E: Engine>(&self, engine: &mut E) -> HydronetResult<usize> {
        let mut applied = 0;
        for node in &self.definition.nodes {
            for (target, constraint) in node.engine_constraints() {
                let result = match constraint {
                    NodeConstraint::Cost(value) => engine.set_node_cost(&target, value),
                    NodeConstraint::Bound(bound, value) => {
                        engine.set_node_constraint(&target, bound, value)
                    }
                };
                result.map_err(engine_error(BuildPhase::Constraints, node.name()))?;
                applied += 1;
            }
        }
        debug!(
            "Applied {applied} constraint(s) to {} node(s)",
            self.definition.nodes.len()
        );
        Ok(applied)
    }
}

/// Build `definition` into `engine` and run it with `solver`.
pub fn run_model<E: Engine>(
    definition: &ModelDefinition,
    engine: &mut E,
    solver: &str,
) -> HydronetResult<BuildReport> {
    let report = GraphBuilder::new(definition).build(engine)?;

    let timestepper = &definition.timestepper;
    info!(
        "Running {} timestep(s) from {} to {} with {solver}",
        timestepper.num_timesteps(),
        timestepper.start,
        timestepper.end
    );
    engine
        .run(
            solver,
            timestepper.start,
            timestepper.end,
            timestepper.timestep,
        )
        .map_err(engine_error(BuildPhase::Run, solver))?;
    Ok(report)
}
