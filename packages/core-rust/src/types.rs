use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ValueError;

/// Runtime identity of a Rust type.
///
/// Equality and hashing use the `TypeId` only; the type name is carried for
/// display and log output.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key for `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The underlying `TypeId`.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name as reported by `std::any::type_name`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name with generic arguments stripped,
    /// e.g. `Order` for `shop::model::Order` and `Vec` for `alloc::vec::Vec<u8>`.
    #[must_use]
    pub fn simple_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A structural value tagged with the Rust type it was produced from.
///
/// This is the currency of the proxy: method arguments, delegate results
/// and transformer inputs/outputs are all `TypedValue`s. The `data` tree is
/// the `serde_json` form of the value, which is what makes same-named field
/// copying between unrelated types possible.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    ty: TypeKey,
    data: Value,
}

impl TypedValue {
    /// Encodes `value` and tags it with `T`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::Encode` if `T`'s `Serialize` impl fails.
    pub fn of<T: Serialize + 'static>(value: &T) -> Result<Self, ValueError> {
        let ty = TypeKey::of::<T>();
        let data = serde_json::to_value(value).map_err(|source| ValueError::Encode { ty, source })?;
        Ok(Self { ty, data })
    }

    /// Assembles a typed value from an already-encoded tree.
    ///
    /// The caller is responsible for `data` actually having the shape of `ty`.
    #[must_use]
    pub fn from_parts(ty: TypeKey, data: Value) -> Self {
        Self { ty, data }
    }

    /// Runtime type of the value.
    #[must_use]
    pub fn ty(&self) -> TypeKey {
        self.ty
    }

    /// Encoded tree.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Consumes the value, returning the encoded tree.
    #[must_use]
    pub fn into_data(self) -> Value {
        self.data
    }

    /// Whether the runtime type is exactly `T`.
    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.ty == TypeKey::of::<T>()
    }

    /// Decodes the value into `T`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::TypeMismatch` if the runtime type is not exactly
    /// `T`, or `ValueError::Decode` if the tree does not deserialize.
    pub fn decode<T: DeserializeOwned + 'static>(&self) -> Result<T, ValueError> {
        let expected = TypeKey::of::<T>();
        if self.ty != expected {
            return Err(ValueError::TypeMismatch {
                expected,
                actual: self.ty,
            });
        }
        serde_json::from_value(self.data.clone())
            .map_err(|source| ValueError::Decode { ty: expected, source })
    }
}
