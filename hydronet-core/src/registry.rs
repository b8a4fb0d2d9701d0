//! Registries mapping `type` discriminators to variant constructors.
//!
//! Each entity category (nodes, parameters, recorders, tables, outputs) owns a
//! separate [`TypeRegistry`], stored in a `static` [`LazyLock`](std::sync::LazyLock)
//! next to the category's enum and populated by a single explicit registration
//! function. Keeping the registries as separate objects means a lookup in one
//! namespace can never resolve a variant of another, even where the
//! discriminators coincide (the `Output` node and the outputs collection, or
//! the `CSV` table and the `CSV` output).
//!
//! Lookups are case-insensitive: names are lower-cased both on registration
//! and on resolution.

use crate::errors::{CollectionKind, HydronetError, HydronetResult};
use serde_json::Value;
use std::collections::HashMap;

/// Builds a concrete variant from the fields of a document (without its `type` key).
pub type Constructor<T> = fn(Value) -> Result<T, serde_json::Error>;

/// Registry of constructors for one entity category.
#[derive(Debug)]
pub struct TypeRegistry<T> {
    collection: CollectionKind,
    constructors: HashMap<String, Constructor<T>>,
}

impl<T> TypeRegistry<T> {
    /// Creates an empty registry for the given collection.
    pub fn new(collection: CollectionKind) -> Self {
        Self {
            collection,
            constructors: HashMap::new(),
        }
    }

    /// Registers a constructor under the lower-cased `type_name`.
    ///
    /// Registration is idempotent: if the name is already present the existing
    /// constructor is kept and `false` is returned.
    pub fn register(&mut self, type_name: &str, constructor: Constructor<T>) -> bool {
        let key = type_name.to_lowercase();
        if self.constructors.contains_key(&key) {
            return false;
        }
        self.constructors.insert(key, constructor);
        true
    }

    /// Looks up the constructor for a discriminator.
    pub fn resolve(&self, type_name: &str) -> HydronetResult<Constructor<T>> {
        self.constructors
            .get(&type_name.to_lowercase())
            .copied()
            .ok_or_else(|| HydronetError::UnknownType {
                collection: self.collection,
                type_name: type_name.to_string(),
                known: self.type_names().join(", "),
            })
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(&type_name.to_lowercase())
    }

    /// Registered (lower-cased) names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// The collection this registry serves.
    pub fn collection(&self) -> CollectionKind {
        self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    enum Shape {
        Square(f64),
        Circle(f64),
    }

    fn shapes() -> TypeRegistry<Shape> {
        let mut registry = TypeRegistry::new(CollectionKind::Nodes);
        registry.register("Square", |v| serde_json::from_value(v).map(Shape::Square));
        registry.register("Circle", |v| serde_json::from_value(v).map(Shape::Circle));
        registry
    }

    #[rstest]
    #[case("Square")]
    #[case("square")]
    #[case("SQUARE")]
    #[case("sQuArE")]
    fn resolve_is_case_insensitive(#[case] type_name: &str) {
        let registry = shapes();
        let constructor = registry.resolve(type_name).unwrap();
        assert_eq!(constructor(json!(2.0)).unwrap(), Shape::Square(2.0));
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = shapes();
        let inserted = registry.register("CIRCLE", |v| serde_json::from_value(v).map(Shape::Square));
        assert!(!inserted);
        assert_eq!(registry.len(), 2);

        // The original constructor survives
        let constructor = registry.resolve("circle").unwrap();
        assert_eq!(constructor(json!(1.0)).unwrap(), Shape::Circle(1.0));
    }

    #[test]
    fn unknown_type() {
        let registry = shapes();
        let err = registry.resolve("triangle").unwrap_err();
        match err {
            HydronetError::UnknownType {
                collection,
                type_name,
                known,
            } => {
                assert_eq!(collection, CollectionKind::Nodes);
                assert_eq!(type_name, "triangle");
                assert_eq!(known, "circle, square");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn type_names_sorted() {
        let registry = shapes();
        assert_eq!(registry.type_names(), vec!["circle", "square"]);
        assert!(registry.contains("Circle"));
        assert!(!registry.is_empty());
        assert_eq!(registry.collection(), CollectionKind::Nodes);
    }
}
