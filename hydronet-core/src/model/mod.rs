//! A model is a network of nodes and edges plus the parameters, recorders and
//! outputs attached to it.
//!
//! [`ModelDefinition`] is the validated form of a model document. A
//! [`GraphBuilder`] turns a definition into a sequence of engine calls, using
//! [`resolve_parameters`] to create parameters in dependency order.

mod builder;
mod definition;
mod resolver;

#[cfg(test)]
mod tests;

pub use builder::{run_model, BuildReport, GraphBuilder};
pub use definition::{Edge, ModelDefinition};
pub use resolver::{resolve_parameters, Resolution};
