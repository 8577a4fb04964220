use std::sync::Arc;

use multirepo_core::TypedValue;

use crate::interface::{InterfaceDescriptor, MethodSignature};
use crate::proxy::router::InvocationRouter;

/// A delegate repository the proxy forwards calls to.
/// Implementations: in-memory table repositories (see `storage`), or any
/// backend adapter that can describe its methods.
pub trait Repository: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Methods this repository can execute.
    fn capability(&self) -> &InterfaceDescriptor;

    /// Executes `method` with `args`. `method` is one of the signatures
    /// returned by [`capability`](Self::capability).
    ///
    /// # Errors
    ///
    /// Returns whatever the backend reports; the proxy wraps it with the
    /// repository name.
    fn invoke(
        &self,
        method: &MethodSignature,
        args: Vec<TypedValue>,
    ) -> anyhow::Result<Option<TypedValue>>;
}

/// A typed facade over an [`InvocationRouter`], usually generated by
/// [`multi_repository!`](crate::multi_repository).
pub trait MultiRepository: Sized {
    /// Interface name; setup declarations and the router directory key on it.
    const NAME: &'static str;

    /// Method table of the declared interface.
    fn descriptor() -> InterfaceDescriptor;

    /// Wraps an installed router.
    fn from_router(router: Arc<InvocationRouter>) -> Self;
}
