//! Structural transformer between two [`Model`] types.
//!
//! Conversion works on the `serde_json` trees of the two types:
//!
//! 1. **Blank**: start from the target's `Default` field map.
//! 2. **Shallow copy**: every target field that also exists on the source
//!    takes the source's value.
//! 3. **Nested collections** (forward only): list fields declared on the
//!    domain type whose entity counterpart holds persisted elements are
//!    rebuilt element by element through the registry. A persisted entity
//!    collection whose domain list is undeclared is an error.
//! 4. **Materialize**: the resulting tree is decoded into the target type, so
//!    shape mismatches surface as errors instead of bad data.

use std::fmt;
use std::marker::PhantomData;

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::TransformError;
use crate::model::{Model, ModelShape};
use crate::pair::TypePair;
use crate::registry::TransformerRegistry;
use crate::traits::Transformer;
use crate::types::{TypeKey, TypedValue};

// ---------------------------------------------------------------------------
// ModelTransformer
// ---------------------------------------------------------------------------

/// Transformer between domain type `A` and entity type `B`.
///
/// The binding `(A, B)` is fixed by the type parameters, so a
/// `ModelTransformer` is always bound.
pub struct ModelTransformer<A, B> {
    name: String,
    domain: ModelShape,
    entity: ModelShape,
    _marker: PhantomData<fn(A) -> B>,
}

impl<A: Model, B: Model> ModelTransformer<A, B> {
    #[must_use]
    pub fn new() -> Self {
        let domain = ModelShape::of::<A>();
        let entity = ModelShape::of::<B>();
        let name = format!("{}Transformer", domain.ty().simple_name());
        Self::with_shapes(name, domain, entity)
    }

    /// Same as [`new`](Self::new) with an explicit display name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::with_shapes(name.into(), ModelShape::of::<A>(), ModelShape::of::<B>())
    }

    fn with_shapes(name: String, domain: ModelShape, entity: ModelShape) -> Self {
        Self {
            name,
            domain,
            entity,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn pair(&self) -> TypePair {
        TypePair::new(self.domain.ty(), self.entity.ty())
    }

    /// Typed convenience over [`Transformer::forward`].
    ///
    /// # Errors
    ///
    /// See [`Transformer::forward`].
    pub fn forward_typed(&self, value: &A, registry: &TransformerRegistry) -> Result<B, TransformError> {
        let converted = self.forward(&TypedValue::of(value)?, registry)?;
        Ok(converted.decode::<B>()?)
    }

    /// Typed convenience over [`Transformer::backward`].
    ///
    /// # Errors
    ///
    /// See [`Transformer::backward`].
    pub fn backward_typed(&self, value: &B, registry: &TransformerRegistry) -> Result<A, TransformError> {
        let converted = self.backward(&TypedValue::of(value)?, registry)?;
        Ok(converted.decode::<A>()?)
    }

    fn expect_type(&self, value: &TypedValue, expected: TypeKey) -> Result<(), TransformError> {
        if value.ty() == expected {
            Ok(())
        } else {
            Err(TransformError::TypeMismatch {
                pair: self.pair(),
                actual: value.ty(),
            })
        }
    }
}

impl<A: Model, B: Model> Default for ModelTransformer<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, B> fmt::Debug for ModelTransformer<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelTransformer")
            .field("name", &self.name)
            .field("domain", &self.domain.ty())
            .field("entity", &self.entity.ty())
            .finish()
    }
}

impl<A: Model, B: Model> Transformer for ModelTransformer<A, B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn binding(&self) -> Option<TypePair> {
        Some(self.pair())
    }

    fn forward(
        &self,
        value: &TypedValue,
        registry: &TransformerRegistry,
    ) -> Result<TypedValue, TransformError> {
        self.expect_type(value, self.domain.ty())?;
        let data = copy_forward(value, &self.domain, &self.entity, registry)?;
        Ok(TypedValue::from_parts(self.entity.ty(), data))
    }

    fn backward(
        &self,
        value: &TypedValue,
        _registry: &TransformerRegistry,
    ) -> Result<TypedValue, TransformError> {
        self.expect_type(value, self.entity.ty())?;
        let data = copy_shallow(value, &self.domain)?;
        Ok(TypedValue::from_parts(self.domain.ty(), data))
    }
}

// ---------------------------------------------------------------------------
// Structural copy
// ---------------------------------------------------------------------------

fn fields_of(value: &TypedValue) -> Result<&Map<String, Value>, TransformError> {
    value
        .data()
        .as_object()
        .ok_or(TransformError::NotARecord { ty: value.ty() })
}

/// Overwrites every field of `target` that `source` also has.
fn copy_same_named(source: &Map<String, Value>, target: &mut Map<String, Value>) {
    for (name, slot) in target.iter_mut() {
        if let Some(value) = source.get(name) {
            slot.clone_from(value);
        }
    }
}

/// Blank target plus shallow copy, materialized as the target type.
pub(crate) fn copy_shallow(source: &TypedValue, target: &ModelShape) -> Result<Value, TransformError> {
    let fields = fields_of(source)?;
    let mut built = target.blank()?;
    copy_same_named(fields, &mut built);
    target.materialize(Value::Object(built))
}

/// Shallow copy followed by conversion of nested persisted collections.
pub(crate) fn copy_forward(
    source: &TypedValue,
    domain: &ModelShape,
    entity: &ModelShape,
    registry: &TransformerRegistry,
) -> Result<Value, TransformError> {
    let fields = fields_of(source)?;
    let mut built = entity.blank()?;
    copy_same_named(fields, &mut built);

    for field in domain.collections() {
        let Some(Value::Array(elements)) = fields.get(field.name) else {
            continue;
        };
        let counterpart = entity.collection(field.name).ok_or(TransformError::MissingField {
            ty: entity.ty(),
            field: field.name,
        })?;

        if !field.element_persisted && counterpart.element_persisted {
            let pair = TypePair::new(field.element, counterpart.element);
            let nested = registry
                .lookup(&pair)
                .ok_or(TransformError::Unresolved { pair })?;
            let converted = elements
                .iter()
                .map(|element| {
                    let typed = TypedValue::from_parts(field.element, element.clone());
                    nested.forward(&typed, registry).map(TypedValue::into_data)
                })
                .collect::<Result<Vec<_>, _>>()?;
            built.insert(field.name.to_string(), Value::Array(converted));
        } else if field.element_persisted && !counterpart.element_persisted {
            trace!(
                field = field.name,
                source = %domain.ty(),
                target = %entity.ty(),
                "entity-to-domain collection left unconverted"
            );
        }
    }

    // A persisted entity collection fed by a list the domain never declared
    // has no element type to look a transformer up by.
    for counterpart in entity.collections() {
        if !counterpart.element_persisted || domain.collection(counterpart.name).is_some() {
            continue;
        }
        if let Some(Value::Array(_)) = fields.get(counterpart.name) {
            return Err(TransformError::MissingField {
                ty: domain.ty(),
                field: counterpart.name,
            });
        }
    }

    entity.materialize(Value::Object(built))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
