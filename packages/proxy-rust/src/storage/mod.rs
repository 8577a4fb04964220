//! In-memory delegate repositories.
//!
//! - [`EntityStore`]: `DashMap`-backed entity storage keyed by an extracted id
//! - [`TableRepository`]: a delegate defined by an explicit method table
//! - [`CrudRepository`]: the conventional CRUD table over an `EntityStore`
//! - [`RepositoryFactory`]: creates stores and their CRUD delegates

pub mod crud;
pub mod factory;
pub mod store;
pub mod table;

pub use crud::{CrudRepository, Entity, EntityKey};
pub use factory::RepositoryFactory;
pub use store::EntityStore;
pub use table::{MethodHandler, TableRepository};
