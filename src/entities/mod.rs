//! Per-kind accessors over the config store.
//!
//! # Data Flow
//! ```text
//! all / get(name)       → store.load() → section lookup
//! save(name, entity)    → store.modify(load → section.insert → save)
//! delete(name)          → store.modify(load → section.remove → save)
//! ```
//!
//! # Design Decisions
//! - No partial updates: `save` replaces the whole entity under that name
//! - Deleting an absent name is not an error; the document is still saved
//! - A missing name on `get` is `EntityError::NotFound`, separate from I/O

pub mod combined;

use std::collections::BTreeMap;
use std::marker::PhantomData;

use thiserror::Error;

use crate::dynamic::{DynamicConfig, Middleware, Router, Service};
use crate::store::{ConfigStore, PersistenceError, StorageBackend};

pub use combined::{RouterServiceRequest, RouterTemplate};

/// Errors surfaced by entity accessors.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// One section of the document.
pub trait EntityKind {
    type Entity: Clone;

    /// Singular name used in messages, e.g. `"router"`.
    const KIND: &'static str;

    fn section(doc: &DynamicConfig) -> &BTreeMap<String, Self::Entity>;

    fn section_mut(doc: &mut DynamicConfig) -> &mut BTreeMap<String, Self::Entity>;
}

pub struct Routers;

pub struct Services;

pub struct Middlewares;

impl EntityKind for Routers {
    type Entity = Router;
    const KIND: &'static str = "router";

    fn section(doc: &DynamicConfig) -> &BTreeMap<String, Router> {
        &doc.routers
    }

    fn section_mut(doc: &mut DynamicConfig) -> &mut BTreeMap<String, Router> {
        &mut doc.routers
    }
}

impl EntityKind for Services {
    type Entity = Service;
    const KIND: &'static str = "service";

    fn section(doc: &DynamicConfig) -> &BTreeMap<String, Service> {
        &doc.services
    }

    fn section_mut(doc: &mut DynamicConfig) -> &mut BTreeMap<String, Service> {
        &mut doc.services
    }
}

impl EntityKind for Middlewares {
    type Entity = Middleware;
    const KIND: &'static str = "middleware";

    fn section(doc: &DynamicConfig) -> &BTreeMap<String, Middleware> {
        &doc.middlewares
    }

    fn section_mut(doc: &mut DynamicConfig) -> &mut BTreeMap<String, Middleware> {
        &mut doc.middlewares
    }
}

/// Accessor for one entity kind, borrowed from a store.
pub struct Entities<'s, K, B> {
    store: &'s ConfigStore<B>,
    kind: PhantomData<K>,
}

impl<'s, K: EntityKind, B: StorageBackend> Entities<'s, K, B> {
    pub fn new(store: &'s ConfigStore<B>) -> Self {
        Self {
            store,
            kind: PhantomData,
        }
    }

    /// Every entity of this kind, by name.
    pub fn all(&self) -> BTreeMap<String, K::Entity> {
        let mut doc = self.store.load();
        std::mem::take(K::section_mut(&mut doc))
    }

    pub fn get(&self, name: &str) -> Result<K::Entity, EntityError> {
        let doc = self.store.load();
        K::section(&doc)
            .get(name)
            .cloned()
            .ok_or_else(|| EntityError::NotFound {
                kind: K::KIND,
                name: name.to_string(),
            })
    }

    /// Insert or fully replace the entity called `name`.
    pub fn save(&self, name: &str, entity: K::Entity) -> Result<(), EntityError> {
        let replaced = self
            .store
            .modify(|doc| K::section_mut(doc).insert(name.to_string(), entity).is_some())?;
        tracing::info!(kind = K::KIND, name = %name, replaced, "Entity saved");
        Ok(())
    }

    /// Remove `name` if present. Returns whether anything was removed.
    pub fn delete(&self, name: &str) -> Result<bool, EntityError> {
        let removed = self
            .store
            .modify(|doc| K::section_mut(doc).remove(name).is_some())?;
        tracing::info!(kind = K::KIND, name = %name, removed, "Entity deleted");
        Ok(removed)
    }
}

impl<B: StorageBackend> ConfigStore<B> {
    pub fn routers(&self) -> Entities<'_, Routers, B> {
        Entities::new(self)
    }

    pub fn services(&self) -> Entities<'_, Services, B> {
        Entities::new(self)
    }

    pub fn middlewares(&self) -> Entities<'_, Middlewares, B> {
        Entities::new(self)
    }
}
