//! Turns declarations into live routers.
//!
//! Setup runs once, single-threaded, before any traffic. Each declaration is
//! resolved against a [`ComponentCatalog`]; its transformers are registered
//! in the shared [`TransformerRegistry`]; a router is built and installed in
//! the [`RouterDirectory`]. A failed declaration never takes its siblings
//! down unless `fail_fast` is set.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use multirepo_core::{BindingError, Transformer, TransformerRegistry};
use tracing::{info, warn};

use super::config::{MultiRepositoryConfig, MultiRepositoryDeclaration};
use super::directory::RouterDirectory;
use super::router::{InvocationRouter, RepositoryBinding};
use crate::interface::InterfaceDescriptor;
use crate::traits::{MultiRepository, Repository};

// ---------------------------------------------------------------------------
// SetupError
// ---------------------------------------------------------------------------

/// Errors from configuration loading and setup.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("failed to set up `{interface}`: {source}")]
    Declaration {
        interface: String,
        source: BindingError,
    },
    #[error("failed to read configuration from {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

// ---------------------------------------------------------------------------
// ComponentCatalog
// ---------------------------------------------------------------------------

/// Named interfaces, repositories and transformers that declarations refer to.
#[derive(Default)]
pub struct ComponentCatalog {
    interfaces: HashMap<String, Arc<InterfaceDescriptor>>,
    repositories: HashMap<String, Arc<dyn Repository>>,
    transformers: HashMap<String, Arc<dyn Transformer>>,
}

impl ComponentCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an interface under its own name.
    pub fn add_interface(&mut self, descriptor: InterfaceDescriptor) -> &mut Self {
        self.interfaces
            .insert(descriptor.name().to_string(), Arc::new(descriptor));
        self
    }

    /// Adds the interface of a typed facade.
    pub fn declare<P: MultiRepository>(&mut self) -> &mut Self {
        self.add_interface(P::descriptor())
    }

    pub fn add_repository(
        &mut self,
        name: impl Into<String>,
        repository: Arc<dyn Repository>,
    ) -> &mut Self {
        self.repositories.insert(name.into(), repository);
        self
    }

    pub fn add_transformer(
        &mut self,
        name: impl Into<String>,
        transformer: Arc<dyn Transformer>,
    ) -> &mut Self {
        self.transformers.insert(name.into(), transformer);
        self
    }

    #[must_use]
    pub fn interface(&self, name: &str) -> Option<&Arc<InterfaceDescriptor>> {
        self.interfaces.get(name)
    }

    #[must_use]
    pub fn repository(&self, name: &str) -> Option<&Arc<dyn Repository>> {
        self.repositories.get(name)
    }

    #[must_use]
    pub fn transformer(&self, name: &str) -> Option<&Arc<dyn Transformer>> {
        self.transformers.get(name)
    }
}

impl std::fmt::Debug for ComponentCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut interfaces: Vec<_> = self.interfaces.keys().collect();
        let mut repositories: Vec<_> = self.repositories.keys().collect();
        let mut transformers: Vec<_> = self.transformers.keys().collect();
        interfaces.sort();
        repositories.sort();
        transformers.sort();
        f.debug_struct("ComponentCatalog")
            .field("interfaces", &interfaces)
            .field("repositories", &repositories)
            .field("transformers", &transformers)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SetupReport
// ---------------------------------------------------------------------------

/// Outcome of installing a batch of declarations.
#[derive(Debug, Default)]
pub struct SetupReport {
    installed: Vec<String>,
    failed: Vec<(String, BindingError)>,
}

impl SetupReport {
    /// Interfaces installed, in declaration order.
    #[must_use]
    pub fn installed(&self) -> &[String] {
        &self.installed
    }

    /// Interfaces that failed, with the reason.
    #[must_use]
    pub fn failed(&self) -> &[(String, BindingError)] {
        &self.failed
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// MultiRepositorySetup
// ---------------------------------------------------------------------------

/// Builds routers from declarations and installs them.
#[derive(Debug, Clone)]
pub struct MultiRepositorySetup {
    transformers: Arc<TransformerRegistry>,
    directory: Arc<RouterDirectory>,
    fail_fast: bool,
}

impl MultiRepositorySetup {
    #[must_use]
    pub fn new(transformers: Arc<TransformerRegistry>, directory: Arc<RouterDirectory>) -> Self {
        Self {
            transformers,
            directory,
            fail_fast: false,
        }
    }

    /// Setup honoring the `fail_fast` option of `config`.
    #[must_use]
    pub fn from_config(
        config: &MultiRepositoryConfig,
        transformers: Arc<TransformerRegistry>,
        directory: Arc<RouterDirectory>,
    ) -> Self {
        Self::new(transformers, directory).with_fail_fast(config.fail_fast)
    }

    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    #[must_use]
    pub fn directory(&self) -> &Arc<RouterDirectory> {
        &self.directory
    }

    #[must_use]
    pub fn transformers(&self) -> &Arc<TransformerRegistry> {
        &self.transformers
    }

    /// Installs every declaration, in order.
    ///
    /// # Errors
    ///
    /// Only with `fail_fast`: returns `SetupError::Declaration` for the first
    /// declaration that fails. Declarations before it stay installed.
    /// Without `fail_fast`, failures are recorded in the report instead.
    pub fn install(
        &self,
        catalog: &ComponentCatalog,
        declarations: &[MultiRepositoryDeclaration],
    ) -> Result<SetupReport, SetupError> {
        let mut report = SetupReport::default();

        for declaration in declarations {
            match self.install_one(catalog, declaration) {
                Ok(_) => report.installed.push(declaration.interface.clone()),
                Err(source) => {
                    warn!(
                        interface = %declaration.interface,
                        error = %source,
                        "multi-repository setup failed"
                    );
                    if self.fail_fast {
                        return Err(SetupError::Declaration {
                            interface: declaration.interface.clone(),
                            source,
                        });
                    }
                    report.failed.push((declaration.interface.clone(), source));
                }
            }
        }

        Ok(report)
    }

    /// Resolves and installs one declaration, returning its router.
    ///
    /// Nothing is registered or installed unless every referenced component
    /// resolves.
    ///
    /// # Errors
    ///
    /// Returns a `BindingError` naming the first component that is missing,
    /// misaligned, or unbound.
    pub fn install_one(
        &self,
        catalog: &ComponentCatalog,
        declaration: &MultiRepositoryDeclaration,
    ) -> Result<Arc<InvocationRouter>, BindingError> {
        let interface_name = declaration.interface.as_str();
        let interface =
            catalog
                .interface(interface_name)
                .ok_or_else(|| BindingError::UnknownInterface {
                    interface: interface_name.to_string(),
                })?;

        let repositories = declaration
            .repositories
            .iter()
            .map(|name| {
                catalog.repository(name).map(Arc::clone).ok_or_else(|| {
                    BindingError::UnknownRepository {
                        interface: interface_name.to_string(),
                        repository: name.clone(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let transformers = declaration
            .transformers
            .iter()
            .map(|name| {
                catalog.transformer(name).map(Arc::clone).ok_or_else(|| {
                    BindingError::UnknownTransformer {
                        interface: interface_name.to_string(),
                        transformer: name.clone(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let binding = RepositoryBinding::new(interface_name, repositories, transformers)?;
        for bound in binding.iter() {
            self.transformers
                .register(bound.pair(), Arc::clone(bound.transformer()));
        }

        let router = Arc::new(InvocationRouter::new(
            Arc::clone(interface),
            binding,
            Arc::clone(&self.transformers),
        ));
        self.directory.register(Arc::clone(&router));

        info!(
            interface = interface_name,
            repositories = ?declaration.repositories,
            "multi-repository installed"
        );
        Ok(router)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
