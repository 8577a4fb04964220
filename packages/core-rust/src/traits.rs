use crate::error::TransformError;
use crate::pair::TypePair;
use crate::registry::TransformerRegistry;
use crate::types::TypedValue;

/// Bidirectional conversion between one domain type and one entity type.
///
/// Implementations are stateless beyond their type binding and are shared as
/// `Arc<dyn Transformer>` across every router and thread. The registry is
/// passed in so conversions can recurse into nested collections.
pub trait Transformer: Send + Sync {
    /// Human-readable name used in logs and configuration errors.
    fn name(&self) -> &str;

    /// The `(domain, entity)` pair this transformer was built for.
    /// `None` means the transformer was constructed without a binding.
    fn binding(&self) -> Option<TypePair>;

    /// Domain value to entity value.
    ///
    /// # Errors
    ///
    /// Any [`TransformError`]; `Unresolved` when a nested persisted collection
    /// has no registered element transformer.
    fn forward(
        &self,
        value: &TypedValue,
        registry: &TransformerRegistry,
    ) -> Result<TypedValue, TransformError>;

    /// Entity value to domain value. Shallow: nested collections are copied
    /// as-is, never converted.
    ///
    /// # Errors
    ///
    /// Any [`TransformError`] other than `Unresolved`.
    fn backward(
        &self,
        value: &TypedValue,
        registry: &TransformerRegistry,
    ) -> Result<TypedValue, TransformError>;
}
