//! Invocation routing and setup of multi-repository interfaces.

pub mod classify;
pub mod config;
pub mod directory;
pub mod invocation;
pub mod router;
pub mod setup;

pub use classify::{classify, CallKind};
pub use config::{LoggingConfig, MultiRepositoryConfig, MultiRepositoryDeclaration};
pub use directory::RouterDirectory;
pub use invocation::{DispatchError, InvocationError};
pub use router::{BoundRepository, InvocationRouter, RepositoryBinding, IDENTITY_METHOD};
pub use setup::{ComponentCatalog, MultiRepositorySetup, SetupError, SetupReport};
