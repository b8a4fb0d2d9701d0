//! Parameters: values computed by the engine each timestep.
//!
//! A parameter may read other parameters by name. Those references are what
//! decide the order parameters can be created in (see
//! [`resolve_parameters`](crate::model::resolve_parameters)).

mod aggregated;
mod control_curves;
mod data_frame;
mod profiles;
mod simple;
mod thresholds;

pub use aggregated::{AggFunc, AggregatedParameter};
pub use control_curves::{ControlCurveIndexParameter, ControlCurvePiecewiseInterpolatedParameter};
pub use data_frame::DataFrameParameter;
pub use profiles::MonthlyProfileParameter;
pub use simple::{ConstantParameter, MaxParameter, NegativeParameter, Polynomial1DParameter};
pub use thresholds::{ParameterThresholdParameter, Predicate};

use crate::collection::Entity;
use crate::engine::{ComponentSpec, SpecContext};
use crate::errors::{CollectionKind, HydronetResult};
use crate::references::referenced_names;
use crate::registry::TypeRegistry;
use serde::Serialize;
use std::sync::LazyLock;

static PARAMETER_REGISTRY: LazyLock<TypeRegistry<Parameter>> =
    LazyLock::new(Parameter::register_all);

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Parameter {
    Constant(ConstantParameter),
    Aggregated(AggregatedParameter),
    Negative(NegativeParameter),
    Max(MaxParameter),
    Polynomial1D(Polynomial1DParameter),
    MonthlyProfile(MonthlyProfileParameter),
    ControlCurveIndex(ControlCurveIndexParameter),
    ControlCurvePiecewiseInterpolated(ControlCurvePiecewiseInterpolatedParameter),
    ParameterThreshold(ParameterThresholdParameter),
    DataFrame(DataFrameParameter),
}

impl Parameter {
    /// Build the parameter registry.
    pub fn register_all() -> TypeRegistry<Parameter> {
        let mut registry = TypeRegistry::new(CollectionKind::Parameters);
        registry.register("Constant", |v| {
            serde_json::from_value(v).map(Parameter::Constant)
        });
        registry.register("Aggregated", |v| {
            serde_json::from_value(v).map(Parameter::Aggregated)
        });
        registry.register("Negative", |v| {
            serde_json::from_value(v).map(Parameter::Negative)
        });
        registry.register("Max", |v| serde_json::from_value(v).map(Parameter::Max));
        registry.register("Polynomial1D", |v| {
            serde_json::from_value(v).map(Parameter::Polynomial1D)
        });
        registry.register("MonthlyProfile", |v| {
            serde_json::from_value(v).map(Parameter::MonthlyProfile)
        });
        registry.register("ControlCurveIndex", |v| {
            serde_json::from_value(v).map(Parameter::ControlCurveIndex)
        });
        registry.register("ControlCurvePiecewiseInterpolated", |v| {
            serde_json::from_value(v).map(Parameter::ControlCurvePiecewiseInterpolated)
        });
        registry.register("ParameterThreshold", |v| {
            serde_json::from_value(v).map(Parameter::ParameterThreshold)
        });
        registry.register("DataFrame", |v| {
            serde_json::from_value(v).map(Parameter::DataFrame)
        });
        registry
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            Parameter::Constant(p) => p.comment.as_deref(),
            Parameter::Aggregated(p) => p.comment.as_deref(),
            Parameter::Negative(p) => p.comment.as_deref(),
            Parameter::Max(p) => p.comment.as_deref(),
            Parameter::Polynomial1D(p) => p.comment.as_deref(),
            Parameter::MonthlyProfile(p) => p.comment.as_deref(),
            Parameter::ControlCurveIndex(p) => p.comment.as_deref(),
            Parameter::ControlCurvePiecewiseInterpolated(p) => p.comment.as_deref(),
            Parameter::ParameterThreshold(p) => p.comment.as_deref(),
            Parameter::DataFrame(p) => p.comment.as_deref(),
        }
    }

    /// Names of the parameters this one reads, without repeats.
    pub fn parameter_references(&self) -> Vec<&str> {
        match self {
            Parameter::Constant(_) | Parameter::MonthlyProfile(_) | Parameter::DataFrame(_) => {
                vec![]
            }
            Parameter::Aggregated(p) => referenced_names(&p.parameters),
            Parameter::Negative(p) => referenced_names([&p.parameter]),
            Parameter::Max(p) => referenced_names([&p.parameter]),
            Parameter::Polynomial1D(p) => referenced_names([&p.parameter]),
            Parameter::ControlCurveIndex(p) => referenced_names(&p.control_curves),
            Parameter::ControlCurvePiecewiseInterpolated(p) => {
                referenced_names(&p.control_curves)
            }
            Parameter::ParameterThreshold(p) => referenced_names([&p.parameter, &p.threshold]),
        }
    }

    /// Names of the nodes this parameter reads.
    pub fn node_references(&self) -> Vec<&str> {
        match self {
            Parameter::ControlCurveIndex(p) => vec![p.storage_node.as_str()],
            Parameter::ControlCurvePiecewiseInterpolated(p) => vec![p.storage_node.as_str()],
            _ => vec![],
        }
    }

    /// The request handed to the engine when creating this parameter.
    pub fn spec(&self, context: &SpecContext<'_>) -> HydronetResult<ComponentSpec> {
        let mut spec = ComponentSpec::from_attributes(self)?
            .with_parameters(self.parameter_references())
            .with_nodes(self.node_references());
        spec.attributes.remove("type");

        if let Parameter::DataFrame(p) = self {
            spec = spec.with_file(p.source(context)?);
        }
        Ok(spec)
    }
}

impl Entity for Parameter {
    const COLLECTION: CollectionKind = CollectionKind::Parameters;

    fn name(&self) -> &str {
        match self {
            Parameter::Constant(p) => &p.name,
            Parameter::Aggregated(p) => &p.name,
            Parameter::Negative(p) => &p.name,
            Parameter::Max(p) => &p.name,
            Parameter::Polynomial1D(p) => &p.name,
            Parameter::MonthlyProfile(p) => &p.name,
            Parameter::ControlCurveIndex(p) => &p.name,
            Parameter::ControlCurvePiecewiseInterpolated(p) => &p.name,
            Parameter::ParameterThreshold(p) => &p.name,
            Parameter::DataFrame(p) => &p.name,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Parameter::Constant(_) => "Constant",
            Parameter::Aggregated(_) => "Aggregated",
            Parameter::Negative(_) => "Negative",
            Parameter::Max(_) => "Max",
            Parameter::Polynomial1D(_) => "Polynomial1D",
            Parameter::MonthlyProfile(_) => "MonthlyProfile",
            Parameter::ControlCurveIndex(_) => "ControlCurveIndex",
            Parameter::ControlCurvePiecewiseInterpolated(_) => "ControlCurvePiecewiseInterpolated",
            Parameter::ParameterThreshold(_) => "ParameterThreshold",
            Parameter::DataFrame(_) => "DataFrame",
        }
    }

    fn registry() -> &'static TypeRegistry<Self> {
        &PARAMETER_REGISTRY
    }

    fn validate(&self) -> HydronetResult<()> {
        match self {
            Parameter::Aggregated(p) => p.validate(),
            Parameter::MonthlyProfile(p) => p.validate(),
            Parameter::ControlCurvePiecewiseInterpolated(p) => p.validate(),
            Parameter::DataFrame(p) => p.validate(),
            _ => Ok(()),
        }
    }
}

impl From<ConstantParameter> for Parameter {
    fn from(parameter: ConstantParameter) -> Self {
        Parameter::Constant(parameter)
    }
}

impl From<AggregatedParameter> for Parameter {
    fn from(parameter: AggregatedParameter) -> Self {
        Parameter::Aggregated(parameter)
    }
}
