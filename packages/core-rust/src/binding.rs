//! Resolution of a transformer's `(domain, entity)` binding.

use crate::error::BindingError;
use crate::pair::TypePair;
use crate::traits::Transformer;

/// Returns the ordered pair `transformer` was built for.
///
/// # Errors
///
/// Returns `BindingError::UnboundTransformer` when the transformer reports no
/// binding. There is no fallback: an unbound transformer is a configuration
/// mistake.
pub fn resolve_binding(transformer: &dyn Transformer) -> Result<TypePair, BindingError> {
    transformer
        .binding()
        .ok_or_else(|| BindingError::UnboundTransformer {
            transformer: transformer.name().to_string(),
        })
}
