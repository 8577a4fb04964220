//! Factory for in-memory CRUD delegates.
//!
//! [`RepositoryFactory`] creates a fresh [`EntityStore`] per repository and
//! wires it into a [`CrudRepository`], so setup code only names the
//! repository and says how to extract an entity's id.

use std::sync::Arc;

use tracing::debug;

use super::crud::{CrudRepository, Entity, EntityKey};
use super::store::EntityStore;

/// Creates in-memory CRUD repositories sharing one sizing policy.
#[derive(Debug, Clone, Default)]
pub struct RepositoryFactory {
    capacity: usize,
}

impl RepositoryFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes every store created afterwards for `capacity` entities.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Creates a CRUD repository named `name` over a new, empty store.
    #[must_use]
    pub fn crud<K: EntityKey, E: Entity>(
        &self,
        name: &str,
        key_of: fn(&E) -> K,
    ) -> Arc<CrudRepository<K, E>> {
        let store = Arc::new(EntityStore::with_capacity(self.capacity, key_of));
        debug!(repository = name, capacity = self.capacity, "in-memory repository created");
        Arc::new(CrudRepository::new(name, store))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::traits::Repository;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Tag {
        slug: String,
    }

    fn slug(tag: &Tag) -> String {
        tag.slug.clone()
    }

    #[test]
    fn each_repository_gets_its_own_store() {
        let factory = RepositoryFactory::new().with_capacity(16);
        let first = factory.crud("tags-a", slug);
        let second = factory.crud("tags-b", slug);

        first.store().put(Tag {
            slug: "rust".to_string(),
        });

        assert_eq!(first.name(), "tags-a");
        assert_eq!(second.name(), "tags-b");
        assert_eq!(first.store().len(), 1);
        assert!(second.store().is_empty());
    }

    #[test]
    fn created_repository_is_a_delegate() {
        let repository: Arc<dyn Repository> = RepositoryFactory::new().crud("tags", slug);
        assert!(repository.capability().find("findAll", &[]).is_some());
    }
}
