//! In-memory entity store backed by [`DashMap`].

use std::fmt;
use std::hash::Hash;

use dashmap::DashMap;

/// Entities keyed by an id extracted from the entity itself.
///
/// All operations take shard locks only, so the store can be shared across
/// threads without external locking.
pub struct EntityStore<K, E> {
    entries: DashMap<K, E>,
    key_of: fn(&E) -> K,
}

impl<K, E> EntityStore<K, E>
where
    K: Eq + Hash + Ord + Clone,
    E: Clone,
{
    /// Creates an empty store using `key_of` to derive each entity's id.
    #[must_use]
    pub fn new(key_of: fn(&E) -> K) -> Self {
        Self {
            entries: DashMap::new(),
            key_of,
        }
    }

    /// Creates an empty store with room for `capacity` entities.
    #[must_use]
    pub fn with_capacity(capacity: usize, key_of: fn(&E) -> K) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
            key_of,
        }
    }

    /// Id of `entity`.
    #[must_use]
    pub fn key_of(&self, entity: &E) -> K {
        (self.key_of)(entity)
    }

    /// Inserts or replaces `entity`, returning the entity it replaced.
    pub fn put(&self, entity: E) -> Option<E> {
        let key = self.key_of(&entity);
        self.entries.insert(key, entity)
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<E> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, key: &K) -> Option<E> {
        self.entries.remove(key).map(|(_, entity)| entity)
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Every entity, ordered by id.
    #[must_use]
    pub fn all(&self) -> Vec<E> {
        let mut snapshot: Vec<(K, E)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        snapshot.sort_by(|a, b| a.0.cmp(&b.0));
        snapshot.into_iter().map(|(_, entity)| entity).collect()
    }
}

impl<K: Eq + Hash, E> fmt::Debug for EntityStore<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        label: &'static str,
    }

    fn row_id(row: &Row) -> u32 {
        row.id
    }

    fn store() -> EntityStore<u32, Row> {
        EntityStore::new(row_id)
    }

    #[test]
    fn put_get_remove() {
        let store = store();
        assert!(store.put(Row { id: 1, label: "a" }).is_none());
        assert_eq!(store.get(&1), Some(Row { id: 1, label: "a" }));

        let replaced = store.put(Row { id: 1, label: "b" }).unwrap();
        assert_eq!(replaced.label, "a");
        assert_eq!(store.len(), 1);

        assert_eq!(store.remove(&1).unwrap().label, "b");
        assert!(store.is_empty());
        assert!(store.remove(&1).is_none());
    }

    #[test]
    fn all_is_ordered_by_key() {
        let store = EntityStore::with_capacity(4, row_id);
        for id in [3, 1, 2] {
            store.put(Row { id, label: "x" });
        }
        let ids: Vec<u32> = store.all().iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(store.contains_key(&2));

        store.clear();
        assert!(store.all().is_empty());
    }

    #[test]
    fn concurrent_puts_are_all_visible() {
        let store = Arc::new(store());
        let handles: Vec<_> = (0..4u32)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for n in 0..100 {
                        store.put(Row {
                            id: worker * 100 + n,
                            label: "w",
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 400);
    }
}
