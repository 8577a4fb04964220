//! Errors surfaced by a proxied call.

use multirepo_core::{TransformError, ValueError};

/// A method could not be located on a target interface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("`{target}` has no method `{method}({params})`")]
    NoSuchMethod {
        target: String,
        method: String,
        params: String,
    },
}

/// Errors returned by `InvocationRouter::invoke`.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("conversion for repository `{repository}` failed: {source}")]
    Transform {
        repository: String,
        source: TransformError,
    },
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error("repository `{repository}` failed: {source}")]
    Delegate {
        repository: String,
        source: anyhow::Error,
    },
}

impl InvocationError {
    /// Name of the delegate repository the failure came from, if any.
    #[must_use]
    pub fn repository(&self) -> Option<&str> {
        match self {
            Self::Transform { repository, .. } | Self::Delegate { repository, .. } => {
                Some(repository)
            }
            Self::Dispatch(_) | Self::Value(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use multirepo_core::TypePair;

    use super::*;

    #[test]
    fn no_such_method_names_target_and_params() {
        let err = DispatchError::NoSuchMethod {
            target: "orders-db".to_string(),
            method: "findById".to_string(),
            params: "u64".to_string(),
        };
        assert_eq!(err.to_string(), "`orders-db` has no method `findById(u64)`");

        let wrapped = InvocationError::from(err);
        assert_eq!(wrapped.to_string(), "`orders-db` has no method `findById(u64)`");
        assert!(wrapped.repository().is_none());
    }

    #[test]
    fn delegate_failure_keeps_repository_and_cause() {
        let err = InvocationError::Delegate {
            repository: "audit-db".to_string(),
            source: anyhow::anyhow!("disk full"),
        };
        assert_eq!(err.to_string(), "repository `audit-db` failed: disk full");
        assert_eq!(err.repository(), Some("audit-db"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn transform_failure_names_repository() {
        let err = InvocationError::Transform {
            repository: "orders-db".to_string(),
            source: TransformError::Unresolved {
                pair: TypePair::of::<u8, u16>(),
            },
        };
        assert_eq!(err.repository(), Some("orders-db"));
        assert!(err.to_string().starts_with("conversion for repository `orders-db` failed"));
    }
}
