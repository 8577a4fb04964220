//! Error types shared by the transformation core and the proxy.

use crate::pair::TypePair;
use crate::types::TypeKey;

/// Failures encoding or decoding a [`TypedValue`](crate::TypedValue).
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error("failed to encode {ty}: {source}")]
    Encode {
        ty: TypeKey,
        source: serde_json::Error,
    },
    #[error("failed to decode {ty}: {source}")]
    Decode {
        ty: TypeKey,
        source: serde_json::Error,
    },
    #[error("expected a value of type {expected}, found {actual}")]
    TypeMismatch { expected: TypeKey, actual: TypeKey },
}

/// Failures of a transformer's `forward` or `backward` conversion.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// A nested persisted collection needs conversion and no transformer is
    /// registered for the element pair.
    #[error("no transformer registered for {pair}")]
    Unresolved { pair: TypePair },
    #[error("transformer for {pair} cannot accept a value of type {actual}")]
    TypeMismatch { pair: TypePair, actual: TypeKey },
    #[error("value of type {ty} is not a structured record")]
    NotARecord { ty: TypeKey },
    #[error("{ty} declares no collection field named `{field}`")]
    MissingField { ty: TypeKey, field: &'static str },
    /// The copied field tree does not form a valid instance of the target type.
    #[error("failed to build {target}: {source}")]
    Structural {
        target: TypeKey,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Configuration errors raised while binding interfaces, repositories and
/// transformers together.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("transformer `{transformer}` is not bound to a concrete type pair")]
    UnboundTransformer { transformer: String },
    #[error("interface `{interface}` is not registered")]
    UnknownInterface { interface: String },
    #[error("repository `{repository}` declared by `{interface}` is not registered")]
    UnknownRepository {
        interface: String,
        repository: String,
    },
    #[error("transformer `{transformer}` declared by `{interface}` is not registered")]
    UnknownTransformer {
        interface: String,
        transformer: String,
    },
    #[error("`{interface}` declares {repositories} repositories but {transformers} transformers")]
    MisalignedBinding {
        interface: String,
        repositories: usize,
        transformers: usize,
    },
    #[error("`{interface}` declares no repositories")]
    EmptyBinding { interface: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_message_names_both_types() {
        let err = TransformError::Unresolved {
            pair: TypePair::of::<u8, u16>(),
        };
        let msg = err.to_string();
        assert!(msg.contains("u8"));
        assert!(msg.contains("u16"));
    }

    #[test]
    fn misaligned_binding_message() {
        let err = BindingError::MisalignedBinding {
            interface: "OrderRepository".to_string(),
            repositories: 2,
            transformers: 1,
        };
        assert_eq!(
            err.to_string(),
            "`OrderRepository` declares 2 repositories but 1 transformers"
        );
    }
}
