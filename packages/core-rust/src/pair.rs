//! Ordered type-pair key used to look up transformers.

use std::fmt;

use crate::types::TypeKey;

/// Ordered pair of types `(a, b)`.
///
/// `(A, B)` and `(B, A)` are distinct keys. For a transformer binding, `a` is
/// the domain type and `b` the entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypePair {
    a: TypeKey,
    b: TypeKey,
}

impl TypePair {
    #[must_use]
    pub fn new(a: TypeKey, b: TypeKey) -> Self {
        Self { a, b }
    }

    /// Pair for the types `A` and `B`, in that order.
    #[must_use]
    pub fn of<A: ?Sized + 'static, B: ?Sized + 'static>() -> Self {
        Self::new(TypeKey::of::<A>(), TypeKey::of::<B>())
    }

    /// First type of the pair (the domain side of a binding).
    #[must_use]
    pub fn domain(&self) -> TypeKey {
        self.a
    }

    /// Second type of the pair (the entity side of a binding).
    #[must_use]
    pub fn entity(&self) -> TypeKey {
        self.b
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.b, self.a)
    }
}

impl fmt::Display for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use proptest::prelude::*;

    use super::*;

    struct Left;
    struct Right;

    fn hash_of(pair: &TypePair) -> u64 {
        let mut hasher = DefaultHasher::new();
        pair.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn same_ordered_types_are_equal() {
        assert_eq!(TypePair::of::<Left, Right>(), TypePair::of::<Left, Right>());
        assert_eq!(
            hash_of(&TypePair::of::<Left, Right>()),
            hash_of(&TypePair::of::<Left, Right>())
        );
    }

    #[test]
    fn order_is_significant() {
        let forward = TypePair::of::<Left, Right>();
        assert_ne!(forward, TypePair::of::<Right, Left>());
        assert_eq!(forward.reversed(), TypePair::of::<Right, Left>());
    }

    #[test]
    fn accessors_follow_construction_order() {
        let pair = TypePair::of::<Left, Right>();
        assert_eq!(pair.domain(), TypeKey::of::<Left>());
        assert_eq!(pair.entity(), TypeKey::of::<Right>());
    }

    #[test]
    fn display_lists_both_sides() {
        let text = TypePair::of::<u8, String>().to_string();
        assert_eq!(text, "u8 -> alloc::string::String");
    }

    fn key(index: u8) -> TypeKey {
        match index % 4 {
            0 => TypeKey::of::<u8>(),
            1 => TypeKey::of::<u16>(),
            2 => TypeKey::of::<String>(),
            _ => TypeKey::of::<Vec<u8>>(),
        }
    }

    proptest! {
        #[test]
        fn equality_matches_componentwise_equality(a in 0u8..4, b in 0u8..4, c in 0u8..4, d in 0u8..4) {
            let left = TypePair::new(key(a), key(b));
            let right = TypePair::new(key(c), key(d));
            prop_assert_eq!(left == right, key(a) == key(c) && key(b) == key(d));
            if left == right {
                prop_assert_eq!(hash_of(&left), hash_of(&right));
            }
        }
    }
}
