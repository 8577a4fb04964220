//! The conventional CRUD method table over an [`EntityStore`].
//!
//! | method       | parameters | returns  |
//! |--------------|------------|----------|
//! | `save`       | generic    | `E`      |
//! | `saveAll`    | generic    | `Vec<E>` |
//! | `findById`   | `K`        | `E`      |
//! | `existsById` | `K`        | `bool`   |
//! | `findAll`    |            | `Vec<E>` |
//! | `count`      |            | `u64`    |
//! | `deleteById` | `K`        |          |
//! | `delete`     | generic    |          |
//! | `deleteAll`  |            |          |
//!
//! The generic parameters accept whatever type the proxy routes to them;
//! the handler decodes it as `E` (or `Vec<E>`) and fails otherwise.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use anyhow::{bail, ensure};
use multirepo_core::TypedValue;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::store::EntityStore;
use super::table::TableRepository;
use crate::interface::{InterfaceDescriptor, MethodSignature};
use crate::traits::Repository;

/// Id type usable as a CRUD key.
pub trait EntityKey:
    Eq + Hash + Ord + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> EntityKey for T where
    T: Eq + Hash + Ord + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// Entity type storable in a CRUD repository.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Entity for T where T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

/// A delegate repository serving the CRUD table from an in-memory store.
pub struct CrudRepository<K, E> {
    table: TableRepository,
    store: Arc<EntityStore<K, E>>,
}

impl<K: EntityKey, E: Entity> CrudRepository<K, E> {
    #[must_use]
    pub fn new(name: impl Into<String>, store: Arc<EntityStore<K, E>>) -> Self {
        let mut table = TableRepository::new(name);

        let s = Arc::clone(&store);
        table.add_method(
            MethodSignature::new("save").generic_param().returns::<E>(),
            move |args| {
                let entity: E = single_arg("save", args)?.decode()?;
                s.put(entity.clone());
                Ok(Some(TypedValue::of(&entity)?))
            },
        );

        let s = Arc::clone(&store);
        table.add_method(
            MethodSignature::new("saveAll")
                .generic_param()
                .returns::<Vec<E>>(),
            move |args| {
                let entities: Vec<E> = single_arg("saveAll", args)?.decode()?;
                for entity in &entities {
                    s.put(entity.clone());
                }
                Ok(Some(TypedValue::of(&entities)?))
            },
        );

        let s = Arc::clone(&store);
        table.add_method(
            MethodSignature::new("findById").param::<K>().returns::<E>(),
            move |args| {
                let id: K = single_arg("findById", args)?.decode()?;
                Ok(s.get(&id).map(|entity| TypedValue::of(&entity)).transpose()?)
            },
        );

        let s = Arc::clone(&store);
        table.add_method(
            MethodSignature::new("existsById")
                .param::<K>()
                .returns::<bool>(),
            move |args| {
                let id: K = single_arg("existsById", args)?.decode()?;
                Ok(Some(TypedValue::of(&s.contains_key(&id))?))
            },
        );

        let s = Arc::clone(&store);
        table.add_method(
            MethodSignature::new("findAll").returns::<Vec<E>>(),
            move |args| {
                no_args("findAll", &args)?;
                Ok(Some(TypedValue::of(&s.all())?))
            },
        );

        let s = Arc::clone(&store);
        table.add_method(MethodSignature::new("count").returns::<u64>(), move |args| {
            no_args("count", &args)?;
            let count = u64::try_from(s.len())?;
            Ok(Some(TypedValue::of(&count)?))
        });

        let s = Arc::clone(&store);
        table.add_method(MethodSignature::new("deleteById").param::<K>(), move |args| {
            let id: K = single_arg("deleteById", args)?.decode()?;
            s.remove(&id);
            Ok(None)
        });

        let s = Arc::clone(&store);
        table.add_method(MethodSignature::new("delete").generic_param(), move |args| {
            let entity: E = single_arg("delete", args)?.decode()?;
            s.remove(&s.key_of(&entity));
            Ok(None)
        });

        let s = Arc::clone(&store);
        table.add_method(MethodSignature::new("deleteAll"), move |args| {
            no_args("deleteAll", &args)?;
            s.clear();
            Ok(None)
        });

        Self { table, store }
    }

    /// The backing store, for seeding and inspection.
    #[must_use]
    pub fn store(&self) -> &Arc<EntityStore<K, E>> {
        &self.store
    }
}

fn single_arg(method: &str, args: Vec<TypedValue>) -> anyhow::Result<TypedValue> {
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (Some(arg), None) => Ok(arg),
        _ => bail!("`{method}` takes exactly one argument"),
    }
}

fn no_args(method: &str, args: &[TypedValue]) -> anyhow::Result<()> {
    ensure!(args.is_empty(), "`{method}` takes no arguments");
    Ok(())
}

impl<K: EntityKey, E: Entity> Repository for CrudRepository<K, E> {
    fn name(&self) -> &str {
        self.table.name()
    }

    fn capability(&self) -> &InterfaceDescriptor {
        self.table.capability()
    }

    fn invoke(
        &self,
        method: &MethodSignature,
        args: Vec<TypedValue>,
    ) -> anyhow::Result<Option<TypedValue>> {
        self.table.invoke(method, args)
    }
}

impl<K: Eq + Hash, E> fmt::Debug for CrudRepository<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrudRepository")
            .field("table", &self.table)
            .field("store", &self.store)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
