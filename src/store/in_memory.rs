//! InMemoryStore - HashMap-backed document store for tests and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{DocumentStore, StoreError};

/// Documents of one collection, kept in insertion order.
#[derive(Default)]
struct StoredCollection {
    docs: Vec<Vec<u8>>,
    index: HashMap<String, usize>,
}

/// In-memory document store.
///
/// Volatile: contents are lost on restart. Clone-friendly via Arc; clones
/// share storage.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    storage: Arc<RwLock<HashMap<String, StoredCollection>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("lock poisoned".into())
}

impl DocumentStore for InMemoryStore {
    fn insert(&self, collection: &str, id: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let mut storage = self.storage.write().map_err(poisoned)?;
        let stored = storage.entry(collection.to_string()).or_default();

        if stored.index.contains_key(id) {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        stored.index.insert(id.to_string(), stored.docs.len());
        stored.docs.push(bytes);
        Ok(())
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let storage = self.storage.read().map_err(poisoned)?;
        Ok(storage
            .get(collection)
            .and_then(|stored| stored.index.get(id).map(|&pos| stored.docs[pos].clone())))
    }

    fn visit(
        &self,
        collection: &str,
        visit: &mut dyn FnMut(&[u8]) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let storage = self.storage.read().map_err(poisoned)?;
        if let Some(stored) = storage.get(collection) {
            for doc in &stored.docs {
                visit(doc)?;
            }
        }
        Ok(())
    }

    fn count(&self, collection: &str) -> Result<usize, StoreError> {
        let storage = self.storage.read().map_err(poisoned)?;
        Ok(storage.get(collection).map_or(0, |stored| stored.docs.len()))
    }
}
