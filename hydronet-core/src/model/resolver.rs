//! Fixed-point creation of parameters.
//!
//! Parameters can reference each other in any order. Rather than sorting the
//! dependency graph up front, every pending parameter is offered to the engine
//! each round; the engine reports [`EngineError::DependencyNotFound`] for
//! those whose references do not exist yet and they are retried next round.
//! A round that creates nothing means the remaining parameters can never be
//! created.

use crate::collection::{Entity, EntityCollection};
use crate::engine::{ComponentSpec, Engine, EngineError, SpecContext};
use crate::errors::{BuildPhase, HydronetError, HydronetResult};
use crate::parameters::Parameter;
use log::{debug, trace};

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    /// Number of rounds needed, zero when there are no parameters
    pub rounds: usize,
    /// Parameter names in the order they were created
    pub order: Vec<String>,
}

/// Create every parameter in `parameters` in an order the engine accepts.
///
/// Attempts within a round follow collection order, and deferred parameters
/// keep their relative order, so the result is deterministic.
pub fn resolve_parameters<E: Engine>(
    parameters: &EntityCollection<Parameter>,
    context: &SpecContext<'_>,
    engine: &mut E,
) -> HydronetResult<Resolution> {
    let mut pending = parameters
        .iter()
        .map(|parameter| Ok((parameter, parameter.spec(context)?)))
        .collect::<HydronetResult<Vec<(&Parameter, ComponentSpec)>>>()?;
    let mut resolution = Resolution::default();

    while !pending.is_empty() {
        resolution.rounds += 1;
        let attempted = pending.len();
        let mut deferred = Vec::with_capacity(attempted);

        for (parameter, spec) in pending {
            match engine.create_parameter(parameter.name(), parameter.type_name(), &spec) {
                Ok(()) => {
                    trace!("Created parameter \"{}\"", parameter.name());
                    resolution.order.push(parameter.name().to_string());
                }
                Err(EngineError::DependencyNotFound { missing, .. }) => {
                    trace!(
                        "Deferred parameter \"{}\" until \"{missing}\" exists",
                        parameter.name()
                    );
                    deferred.push((parameter, spec));
                }
                Err(source) => {
                    return Err(HydronetError::Engine {
                        phase: BuildPhase::Parameters,
                        entity: parameter.name().to_string(),
                        source,
                    })
                }
            }
        }

        debug!(
            "Resolution round {}: created {}, deferred {}",
            resolution.rounds,
            attempted - deferred.len(),
            deferred.len()
        );
        if deferred.len() >= attempted {
            let stuck: Vec<&Parameter> = deferred.iter().map(|(parameter, _)| *parameter).collect();
            return Err(unresolvable(parameters, &stuck));
        }
        pending = deferred;
    }

    Ok(resolution)
}

/// Explain why `stuck` could not be created.
///
/// Parameters naming something that is not declared at all, or depending on
/// such a parameter through other stuck ones, are reported together with the
/// missing names. Whatever is left depends on itself.
fn unresolvable(parameters: &EntityCollection<Parameter>, stuck: &[&Parameter]) -> HydronetError {
    let mut missing: Vec<String> = Vec::new();
    let mut broken: Vec<&str> = Vec::new();
    for parameter in stuck {
        for reference in parameter.parameter_references() {
            if parameters.contains(reference) {
                continue;
            }
            if !missing.iter().any(|m| m == reference) {
                missing.push(reference.to_string());
            }
            if !broken.contains(&parameter.name()) {
                broken.push(parameter.name());
            }
        }
    }

    if missing.is_empty() {
        return HydronetError::CyclicDependency {
            parameters: stuck.iter().map(|p| p.name().to_string()).collect(),
        };
    }

    loop {
        let known = broken.len();
        for parameter in stuck {
            if !broken.contains(&parameter.name())
                && parameter
                    .parameter_references()
                    .iter()
                    .any(|reference| broken.contains(reference))
            {
                broken.push(parameter.name());
            }
        }
        if broken.len() == known {
            break;
        }
    }

    let (dependent, cyclic): (Vec<&Parameter>, Vec<&Parameter>) = stuck
        .iter()
        .partition(|parameter| broken.contains(&parameter.name()));
    HydronetError::UnresolvedReference {
        parameters: dependent.iter().map(|p| p.name().to_string()).collect(),
        missing,
        cyclic: cyclic.iter().map(|p| p.name().to_string()).collect(),
    }
}
