//! Ordered, name-keyed collections of model entities.
//!
//! Every entity category is a closed enum implementing [`Entity`]. Documents are
//! turned into variants through the category's [`TypeRegistry`]; the
//! collection then enforces that names are unique and keeps insertion order so
//! that builds are reproducible.

use crate::errors::{CollectionKind, HydronetError, HydronetResult};
use crate::registry::TypeRegistry;
use crate::settings::LoadOptions;
use indexmap::IndexMap;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A named, type-discriminated model entity.
pub trait Entity: Serialize + Sized + 'static {
    /// The collection this entity lives in, used for diagnostics.
    const COLLECTION: CollectionKind;

    fn name(&self) -> &str;

    /// Canonical discriminator of this variant, as written in documents.
    fn type_name(&self) -> &'static str;

    /// Registry of constructors for this category.
    fn registry() -> &'static TypeRegistry<Self>;

    /// Checks run after a variant has been deserialised.
    fn validate(&self) -> HydronetResult<()> {
        Ok(())
    }
}

/// Keys present in `input` which the deserialised value does not emit again.
///
/// Variants serialise every field they understand (optional fields as `null`),
/// so anything left over was ignored by deserialisation.
pub(crate) fn unknown_fields(input: &Map<String, Value>, emitted: &Value) -> Vec<String> {
    let known = emitted.as_object();
    input
        .keys()
        .filter(|key| known.map_or(true, |known| !known.contains_key(key.as_str())))
        .cloned()
        .collect()
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Deserialise a single entity document.
fn load_entity<T: Entity>(
    index: usize,
    document: &Value,
    options: &LoadOptions,
) -> HydronetResult<T> {
    let Some(fields) = document.as_object() else {
        return Err(HydronetError::schema(
            T::COLLECTION,
            None,
            format!(
                "entry {index} must be a mapping, found {}",
                value_kind(document)
            ),
        ));
    };
    let mut fields = fields.clone();
    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string);

    let type_name = match fields.remove("type") {
        None => {
            return Err(HydronetError::MissingType {
                collection: T::COLLECTION,
                index,
            })
        }
        Some(Value::String(type_name)) => type_name,
        Some(other) => {
            return Err(HydronetError::schema(
                T::COLLECTION,
                name.as_deref(),
                format!("\"type\" must be a string, found {}", value_kind(&other)),
            ))
        }
    };

    let constructor = T::registry().resolve(&type_name)?;
    let entity = constructor(Value::Object(fields.clone())).map_err(|e| {
        HydronetError::schema(T::COLLECTION, name.as_deref(), e.to_string())
    })?;

    let mut emitted = serde_json::to_value(&entity)?;
    if let Some(emitted) = emitted.as_object_mut() {
        emitted.remove("type");
    }
    let unknown = unknown_fields(&fields, &emitted);
    options.check_unknown_fields(T::COLLECTION, Some(entity.name()), &unknown)?;

    entity.validate()?;
    Ok(entity)
}

/// An ordered collection of uniquely named entities.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCollection<T> {
    entities: IndexMap<String, T>,
}

impl<T> Default for EntityCollection<T> {
    fn default() -> Self {
        Self {
            entities: IndexMap::new(),
        }
    }
}

impl<T: Entity> EntityCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from a sequence of documents.
    ///
    /// The first failing document aborts the whole collection.
    pub fn from_documents(documents: &[Value], options: &LoadOptions) -> HydronetResult<Self> {
        let mut collection = Self::new();
        for (index, document) in documents.iter().enumerate() {
            let entity = load_entity::<T>(index, document, options)?;
            collection.insert(entity)?;
        }
        Ok(collection)
    }

    /// Add an entity to the end of the collection.
    ///
    /// Fails if an entity with the same name already exists; the existing entry
    /// is left untouched.
    pub fn insert(&mut self, entity: T) -> HydronetResult<()> {
        if self.entities.contains_key(entity.name()) {
            return Err(HydronetError::DuplicateName {
                collection: T::COLLECTION,
                name: entity.name().to_string(),
            });
        }
        self.entities.insert(entity.name().to_string(), entity);
        Ok(())
    }

    pub fn get(&self, name: &str) -> HydronetResult<&T> {
        self.entities
            .get(name)
            .ok_or_else(|| HydronetError::NotFound {
                collection: T::COLLECTION,
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entities.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a EntityCollection<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.values()
    }
}

impl<T: Serialize> Serialize for EntityCollection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entities.len()))?;
        for entity in self.entities.values() {
            seq.serialize_element(entity)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Node;
    use crate::settings::LoadOptions;
    use serde_json::json;

    fn nodes(documents: Value) -> HydronetResult<EntityCollection<Node>> {
        let documents = documents.as_array().unwrap().clone();
        EntityCollection::from_documents(&documents, &LoadOptions::strict())
    }

    #[test]
    fn preserves_insertion_order() {
        let collection = nodes(json!([
            {"type": "input", "name": "c"},
            {"type": "link", "name": "a"},
            {"type": "output", "name": "b"},
        ]))
        .unwrap();

        assert_eq!(collection.names().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(collection.len(), 3);
        assert!(collection.contains("a"));
        assert_eq!(collection.get("b").unwrap().type_name(), "Output");
    }

    #[test]
    fn duplicate_name() {
        let err = nodes(json!([
            {"type": "input", "name": "a"},
            {"type": "output", "name": "a"},
        ]))
        .unwrap_err();

        match err {
            HydronetError::DuplicateName { collection, name } => {
                assert_eq!(collection, CollectionKind::Nodes);
                assert_eq!(name, "a");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn duplicate_insert_keeps_original() {
        let mut collection = nodes(json!([{"type": "input", "name": "a"}])).unwrap();
        let replacement = nodes(json!([{"type": "output", "name": "a"}])).unwrap();
        let replacement = replacement.get("a").unwrap().clone();

        assert!(collection.insert(replacement).is_err());
        assert_eq!(collection.get("a").unwrap().type_name(), "Input");
    }

    #[test]
    fn missing_type() {
        let err = nodes(json!([
            {"type": "input", "name": "a"},
            {"name": "b"},
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            HydronetError::MissingType {
                collection: CollectionKind::Nodes,
                index: 1
            }
        ));
    }

    #[test]
    fn unknown_type() {
        let err = nodes(json!([{"type": "reservoir", "name": "a"}])).unwrap_err();
        assert!(matches!(err, HydronetError::UnknownType { .. }));
    }

    #[test]
    fn not_a_mapping() {
        let err = nodes(json!(["input"])).unwrap_err();
        assert!(matches!(err, HydronetError::SchemaValidation { .. }));
    }

    #[test]
    fn wrong_field_type() {
        let err = nodes(json!([{"type": "storage", "name": "s", "initial_volume": "full"}]))
            .unwrap_err();
        match err {
            HydronetError::SchemaValidation {
                collection, entity, ..
            } => {
                assert_eq!(collection, CollectionKind::Nodes);
                assert_eq!(entity.as_deref(), Some("s"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_name() {
        let err = nodes(json!([{"type": "input"}])).unwrap_err();
        assert!(matches!(err, HydronetError::SchemaValidation { .. }));
    }

    #[test]
    fn unknown_field_strictness() {
        let documents = vec![json!({"type": "input", "name": "a", "colour": "blue"})];

        let err = EntityCollection::<Node>::from_documents(&documents, &LoadOptions::strict())
            .unwrap_err();
        assert!(err.to_string().contains("colour"));

        let collection =
            EntityCollection::<Node>::from_documents(&documents, &LoadOptions::permissive())
                .unwrap();
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn get_missing() {
        let collection = nodes(json!([])).unwrap();
        assert!(collection.is_empty());
        assert!(matches!(
            collection.get("a"),
            Err(HydronetError::NotFound { .. })
        ));
    }

    #[test]
    fn serialises_with_type() {
        let collection = nodes(json!([{"type": "INPUT", "name": "a", "max_flow": 5.0}])).unwrap();
        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value[0]["type"], "Input");
        assert_eq!(value[0]["name"], "a");
        assert_eq!(value[0]["max_flow"], 5.0);
    }
}
