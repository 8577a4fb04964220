//! Registry of transformers keyed by ordered type pair.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::binding::resolve_binding;
use crate::error::BindingError;
use crate::pair::TypePair;
use crate::traits::Transformer;

/// Maps `(domain, entity)` pairs to the transformer converting between them.
///
/// Populated during setup and shared as `Arc<TransformerRegistry>` by every
/// router afterwards. Lookups only take shard read locks, so concurrent
/// lookups never wait on each other.
pub struct TransformerRegistry {
    entries: DashMap<TypePair, Arc<dyn Transformer>>,
}

impl TransformerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Registers `transformer` under `pair`. An existing registration for the
    /// same pair is replaced and returned.
    pub fn register(
        &self,
        pair: TypePair,
        transformer: Arc<dyn Transformer>,
    ) -> Option<Arc<dyn Transformer>> {
        let name = transformer.name().to_string();
        let previous = self.entries.insert(pair, transformer);
        if let Some(replaced) = &previous {
            debug!(
                %pair,
                replaced = replaced.name(),
                by = %name,
                "transformer registration overwritten"
            );
        }
        previous
    }

    /// Registers `transformer` under the pair it reports as its binding.
    ///
    /// # Errors
    ///
    /// Returns `BindingError::UnboundTransformer` if the transformer has no
    /// binding.
    pub fn register_bound(&self, transformer: Arc<dyn Transformer>) -> Result<TypePair, BindingError> {
        let pair = resolve_binding(transformer.as_ref())?;
        self.register(pair, transformer);
        Ok(pair)
    }

    /// Transformer registered for exactly `pair`, if any.
    #[must_use]
    pub fn lookup(&self, pair: &TypePair) -> Option<Arc<dyn Transformer>> {
        self.entries.get(pair).map(|entry| Arc::clone(entry.value()))
    }

    #[must_use]
    pub fn contains(&self, pair: &TypePair) -> bool {
        self.entries.contains_key(pair)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the registered pairs, in no particular order.
    #[must_use]
    pub fn pairs(&self) -> Vec<TypePair> {
        self.entries.iter().map(|entry| *entry.key()).collect()
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("pairs", &self.pairs())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
