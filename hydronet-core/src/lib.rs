//! Loading and building of flow network models.
//!
//! A model document (JSON or YAML) describes the nodes and edges of a network
//! and the parameters, recorders, tables and outputs attached to it. Loading a
//! document produces a validated [`ModelDefinition`]; building a definition
//! issues an ordered sequence of calls against an [`Engine`].
//!
//! ```no_run
//! use hydronet_core::{run_model, LoadOptions, ModelDefinition, PlanEngine};
//! use std::path::Path;
//!
//! let model = ModelDefinition::from_path(Path::new("model.json"), &LoadOptions::default())?;
//! let mut engine = PlanEngine::new();
//! run_model(&model, &mut engine, "clp")?;
//! # Ok::<(), hydronet_core::errors::HydronetError>(())
//! ```

pub mod collection;
pub mod engine;
pub mod errors;
pub mod model;
pub mod nodes;
pub mod outputs;
pub mod parameters;
pub mod recorders;
pub mod references;
pub mod registry;
pub mod settings;
pub mod tables;
pub mod timestepper;

pub use collection::{Entity, EntityCollection};
pub use engine::{Engine, EngineCall, EngineError, PlanEngine};
pub use errors::{HydronetError, HydronetResult};
pub use model::{run_model, GraphBuilder, ModelDefinition};
pub use references::ParameterValue;
pub use settings::{LoadOptions, Settings, Strictness};
