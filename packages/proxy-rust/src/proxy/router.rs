//! The invocation router: one live proxy per declared interface.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use multirepo_core::{
    resolve_binding, BindingError, Transformer, TransformerRegistry, TypePair, TypedValue,
};
use tracing::{debug, info_span, warn};

use super::classify::{classify, CallKind};
use super::invocation::{DispatchError, InvocationError};
use crate::interface::{render_params, InterfaceDescriptor, MethodSignature};
use crate::traits::Repository;

/// Method name answered by the router itself.
pub const IDENTITY_METHOD: &str = "toString";

// ---------------------------------------------------------------------------
// RepositoryBinding
// ---------------------------------------------------------------------------

/// One delegate with the transformer converting arguments for it.
#[derive(Clone)]
pub struct BoundRepository {
    repository: Arc<dyn Repository>,
    transformer: Arc<dyn Transformer>,
    pair: TypePair,
}

impl BoundRepository {
    #[must_use]
    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repository
    }

    #[must_use]
    pub fn transformer(&self) -> &Arc<dyn Transformer> {
        &self.transformer
    }

    /// `(domain, entity)` pair the transformer is bound to.
    #[must_use]
    pub fn pair(&self) -> TypePair {
        self.pair
    }
}

impl fmt::Debug for BoundRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundRepository")
            .field("repository", &self.repository.name())
            .field("transformer", &self.transformer.name())
            .field("pair", &self.pair)
            .finish()
    }
}

/// Ordered, index-aligned delegates and transformers. Index 0 is the primary
/// (read) delegate. Never empty.
#[derive(Debug, Clone)]
pub struct RepositoryBinding {
    entries: Vec<BoundRepository>,
}

impl RepositoryBinding {
    /// Pairs `repositories[i]` with `transformers[i]` and resolves each
    /// transformer's binding.
    ///
    /// # Errors
    ///
    /// - `BindingError::EmptyBinding` if no repositories are given.
    /// - `BindingError::MisalignedBinding` if the list lengths differ.
    /// - `BindingError::UnboundTransformer` if a transformer has no binding.
    pub fn new(
        interface: &str,
        repositories: Vec<Arc<dyn Repository>>,
        transformers: Vec<Arc<dyn Transformer>>,
    ) -> Result<Self, BindingError> {
        if repositories.len() != transformers.len() {
            return Err(BindingError::MisalignedBinding {
                interface: interface.to_string(),
                repositories: repositories.len(),
                transformers: transformers.len(),
            });
        }
        if repositories.is_empty() {
            return Err(BindingError::EmptyBinding {
                interface: interface.to_string(),
            });
        }

        let entries = repositories
            .into_iter()
            .zip(transformers)
            .map(|(repository, transformer)| {
                let pair = resolve_binding(transformer.as_ref())?;
                Ok(BoundRepository {
                    repository,
                    transformer,
                    pair,
                })
            })
            .collect::<Result<Vec<_>, BindingError>>()?;

        Ok(Self { entries })
    }

    /// The delegate serving reads.
    #[must_use]
    pub fn primary(&self) -> &BoundRepository {
        // Non-empty by construction.
        &self.entries[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundRepository> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Transformer pairs in binding order.
    #[must_use]
    pub fn pairs(&self) -> Vec<TypePair> {
        self.entries.iter().map(BoundRepository::pair).collect()
    }
}

// ---------------------------------------------------------------------------
// InvocationRouter
// ---------------------------------------------------------------------------

/// Implements a declared interface by routing each call to its delegates.
///
/// Reads (method names containing `get` or `find`) go to the primary delegate
/// only, with arguments passed through and the result converted backward when
/// the return types line up with the primary transformer's pair. Writes go to
/// every delegate in binding order, with domain-typed arguments converted
/// forward for each. The router holds no mutable state and can be shared
/// freely across threads.
pub struct InvocationRouter {
    name: String,
    interface: Arc<InterfaceDescriptor>,
    binding: RepositoryBinding,
    transformers: Arc<TransformerRegistry>,
}

impl InvocationRouter {
    #[must_use]
    pub fn new(
        interface: Arc<InterfaceDescriptor>,
        binding: RepositoryBinding,
        transformers: Arc<TransformerRegistry>,
    ) -> Self {
        Self {
            name: interface.name().to_string(),
            interface,
            binding,
            transformers,
        }
    }

    /// Simple name of the implemented interface.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn interface(&self) -> &InterfaceDescriptor {
        &self.interface
    }

    #[must_use]
    pub fn binding(&self) -> &RepositoryBinding {
        &self.binding
    }

    #[must_use]
    pub fn transformers(&self) -> &Arc<TransformerRegistry> {
        &self.transformers
    }

    /// Routes one call of `method` with `args`.
    ///
    /// Returns `Ok(None)` for writes and for reads whose delegate produced no
    /// value.
    ///
    /// # Errors
    ///
    /// - `InvocationError::Dispatch` if the interface or a delegate has no
    ///   matching method.
    /// - `InvocationError::Transform` if converting an argument or result
    ///   fails.
    /// - `InvocationError::Delegate` if a delegate fails. For writes every
    ///   delegate is still attempted and the first failure is returned.
    pub fn invoke(
        &self,
        method: &str,
        args: Vec<TypedValue>,
    ) -> Result<Option<TypedValue>, InvocationError> {
        if method == IDENTITY_METHOD && args.is_empty() {
            return Ok(Some(TypedValue::of(&self.name)?));
        }

        let kind = classify(method);
        let span = info_span!(
            "invocation",
            interface = %self.name,
            method,
            kind = kind.as_str(),
        );
        let _entered = span.enter();
        let start = Instant::now();

        let result = self.dispatch(kind, method, args);

        #[allow(clippy::cast_possible_truncation)]
        let duration_us = start.elapsed().as_micros() as u64;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(_) => "error",
        };
        debug!(duration_us, outcome, "invocation complete");

        result
    }

    fn dispatch(
        &self,
        kind: CallKind,
        method: &str,
        args: Vec<TypedValue>,
    ) -> Result<Option<TypedValue>, InvocationError> {
        let source = self.interface.resolve(method, &args).ok_or_else(|| {
            let params = args
                .iter()
                .map(|arg| arg.ty().simple_name())
                .collect::<Vec<_>>()
                .join(", ");
            DispatchError::NoSuchMethod {
                target: self.name.clone(),
                method: method.to_string(),
                params,
            }
        })?;

        match kind {
            CallKind::Read => self.read(source, args),
            CallKind::Write => {
                self.write(source, &args)?;
                Ok(None)
            }
        }
    }

    fn read(
        &self,
        source: &MethodSignature,
        args: Vec<TypedValue>,
    ) -> Result<Option<TypedValue>, InvocationError> {
        let primary = self.binding.primary();
        let repository = primary.repository.as_ref();
        let target = delegate_method(repository, source)?;

        let raw = repository
            .invoke(target, args)
            .map_err(|err| InvocationError::Delegate {
                repository: repository.name().to_string(),
                source: err,
            })?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        let convertible = match (source.return_type(), target.return_type()) {
            (Some(declared), Some(stored)) => TypePair::new(declared, stored) == primary.pair,
            _ => false,
        };
        if !convertible {
            return Ok(Some(raw));
        }

        primary
            .transformer
            .backward(&raw, &self.transformers)
            .map(Some)
            .map_err(|source| InvocationError::Transform {
                repository: repository.name().to_string(),
                source,
            })
    }

    fn write(&self, source: &MethodSignature, args: &[TypedValue]) -> Result<(), InvocationError> {
        let mut first_failure = None;

        for (index, bound) in self.binding.iter().enumerate() {
            let repository = bound.repository.name();
            match self.write_one(bound, source, args) {
                Ok(()) => debug!(repository, index, "write delegated"),
                Err(err) => {
                    warn!(repository, index, error = %err, "write delegation failed");
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            }
        }

        first_failure.map_or(Ok(()), Err)
    }

    fn write_one(
        &self,
        bound: &BoundRepository,
        source: &MethodSignature,
        args: &[TypedValue],
    ) -> Result<(), InvocationError> {
        let repository = bound.repository.as_ref();
        let target = delegate_method(repository, source)?;

        let converted = args
            .iter()
            .map(|arg| {
                if arg.ty() == bound.pair.domain() {
                    bound.transformer.forward(arg, &self.transformers)
                } else {
                    Ok(arg.clone())
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| InvocationError::Transform {
                repository: repository.name().to_string(),
                source,
            })?;

        repository
            .invoke(target, converted)
            .map(|_| ())
            .map_err(|source| InvocationError::Delegate {
                repository: repository.name().to_string(),
                source,
            })
    }
}

/// The delegate's method equivalent to `source`.
fn delegate_method<'r>(
    repository: &'r dyn Repository,
    source: &MethodSignature,
) -> Result<&'r MethodSignature, DispatchError> {
    repository
        .capability()
        .find(source.name(), source.params())
        .ok_or_else(|| DispatchError::NoSuchMethod {
            target: repository.name().to_string(),
            method: source.name().to_string(),
            params: render_params(source.params()),
        })
}

impl fmt::Display for InvocationRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for InvocationRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationRouter")
            .field("name", &self.name)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
