//! Model metadata: the persisted-entity marker and declared collection fields.
//!
//! A type takes part in transformation by implementing [`Model`]. The trait
//! carries what the transformer needs at runtime: whether the type is a
//! persisted entity, and which of its fields are lists whose elements may need
//! converting on their own. [`ModelShape`] is the type-erased form of the same
//! information.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::TransformError;
use crate::types::TypeKey;

/// A domain or entity type that transformers can build and copy.
///
/// `Default` provides the blank instance a conversion starts from. Field
/// names are the `serde` field names.
///
/// ```
/// use multirepo_core::{CollectionField, Model};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct LineEntity { sku: String }
///
/// impl Model for LineEntity {
///     const PERSISTED: bool = true;
/// }
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct InvoiceEntity { lines: Vec<LineEntity> }
///
/// impl Model for InvoiceEntity {
///     const PERSISTED: bool = true;
///
///     fn collections() -> Vec<CollectionField> {
///         vec![CollectionField::of::<LineEntity>("lines")]
///     }
/// }
/// ```
pub trait Model: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// Marks the type as a persisted entity.
    const PERSISTED: bool = false;

    /// List-valued fields and their element types.
    fn collections() -> Vec<CollectionField> {
        Vec::new()
    }
}

/// A list-valued field declared by a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionField {
    pub name: &'static str,
    pub element: TypeKey,
    pub element_persisted: bool,
}

impl CollectionField {
    /// A list field whose elements are the model `T`.
    #[must_use]
    pub fn of<T: Model>(name: &'static str) -> Self {
        Self {
            name,
            element: TypeKey::of::<T>(),
            element_persisted: T::PERSISTED,
        }
    }

    /// A list field of plain values (strings, numbers, ...). Never converted.
    #[must_use]
    pub fn scalar<T: 'static>(name: &'static str) -> Self {
        Self {
            name,
            element: TypeKey::of::<T>(),
            element_persisted: false,
        }
    }
}

/// Type-erased [`Model`] metadata plus the two operations the structural
/// copy needs from the concrete type: a blank instance and validation.
#[derive(Debug, Clone)]
pub struct ModelShape {
    ty: TypeKey,
    persisted: bool,
    collections: Vec<CollectionField>,
    blank: fn() -> Result<Value, serde_json::Error>,
    materialize: fn(Value) -> Result<Value, serde_json::Error>,
}

impl ModelShape {
    #[must_use]
    pub fn of<T: Model>() -> Self {
        Self {
            ty: TypeKey::of::<T>(),
            persisted: T::PERSISTED,
            collections: T::collections(),
            blank: blank_of::<T>,
            materialize: materialize_as::<T>,
        }
    }

    #[must_use]
    pub fn ty(&self) -> TypeKey {
        self.ty
    }

    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    #[must_use]
    pub fn collections(&self) -> &[CollectionField] {
        &self.collections
    }

    /// Declared collection field by name.
    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&CollectionField> {
        self.collections.iter().find(|field| field.name == name)
    }

    /// Field map of a freshly constructed (`Default`) instance.
    ///
    /// # Errors
    ///
    /// `Structural` if the default value fails to serialize,
    /// `NotARecord` if it does not serialize to a map.
    pub fn blank(&self) -> Result<Map<String, Value>, TransformError> {
        match (self.blank)() {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(_) => Err(TransformError::NotARecord { ty: self.ty }),
            Err(source) => Err(TransformError::Structural {
                target: self.ty,
                source,
            }),
        }
    }

    /// Round-trips `data` through the concrete type, proving it is a valid
    /// instance and normalizing its encoding.
    ///
    /// # Errors
    ///
    /// `Structural` carrying the `serde_json` cause.
    pub fn materialize(&self, data: Value) -> Result<Value, TransformError> {
        (self.materialize)(data).map_err(|source| TransformError::Structural {
            target: self.ty,
            source,
        })
    }
}

fn blank_of<T: Model>() -> Result<Value, serde_json::Error> {
    serde_json::to_value(T::default())
}

fn materialize_as<T: Model>(data: Value) -> Result<Value, serde_json::Error> {
    let instance: T = serde_json::from_value(data)?;
    serde_json::to_value(instance)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Tag {
        label: String,
    }

    impl Model for Tag {}

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct TagRow {
        label: String,
    }

    impl Model for TagRow {
        const PERSISTED: bool = true;
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Post {
        title: String,
        tags: Vec<Tag>,
        keywords: Vec<String>,
    }

    impl Model for Post {
        fn collections() -> Vec<CollectionField> {
            vec![
                CollectionField::of::<Tag>("tags"),
                CollectionField::scalar::<String>("keywords"),
            ]
        }
    }

    /// Newtype models serialize to a bare value, not a field map.
    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Opaque(u32);

    impl Model for Opaque {}

    #[test]
    fn shape_reports_marker_and_collections() {
        let shape = ModelShape::of::<Post>();
        assert!(!shape.is_persisted());
        assert_eq!(shape.collections().len(), 2);
        assert!(ModelShape::of::<TagRow>().is_persisted());

        let tags = shape.collection("tags").unwrap();
        assert_eq!(tags.element, TypeKey::of::<Tag>());
        assert!(!tags.element_persisted);
        assert!(shape.collection("missing").is_none());
    }

    #[test]
    fn collection_field_copies_element_marker() {
        assert!(CollectionField::of::<TagRow>("rows").element_persisted);
        assert!(!CollectionField::scalar::<u64>("ids").element_persisted);
    }

    #[test]
    fn blank_is_default_field_map() {
        let blank = ModelShape::of::<Post>().blank().unwrap();
        assert_eq!(blank.get("title"), Some(&Value::String(String::new())));
        assert_eq!(blank.get("tags"), Some(&Value::Array(Vec::new())));
    }

    #[test]
    fn blank_of_non_record_is_rejected() {
        let err = ModelShape::of::<Opaque>().blank().unwrap_err();
        assert!(matches!(err, TransformError::NotARecord { .. }));
    }

    #[test]
    fn materialize_rejects_wrong_field_types() {
        let shape = ModelShape::of::<Tag>();
        let err = shape
            .materialize(serde_json::json!({ "label": 42 }))
            .unwrap_err();
        assert!(matches!(err, TransformError::Structural { .. }));
    }
}
