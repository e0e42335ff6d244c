//! Document store - collections of JSON documents behind a storage trait.
//!
//! The backend only deals in raw bytes per collection; typed access, id
//! assignment, filtering, sorting and limits live in [`Collection`].
//!
//! ## Example
//!
//! ```ignore
//! use insighthub::store::{open_store, CollectionsExt, Query};
//!
//! let store = open_store("memory://")?;
//! let saved = store.collection::<Report>().insert(report)?;
//! let all = store.collection::<Report>().find(Query::new())?;
//! ```

mod collection;
mod in_memory;
mod query;
mod sled_store;

use std::sync::Arc;

pub use collection::{Collection, CollectionsExt};
pub use in_memory::InMemoryStore;
pub use query::{Direction, Query};
pub use sled_store::SledStore;

use serde::{de::DeserializeOwned, Serialize};

/// Trait for types that can be stored in a collection.
///
/// Usually derived with `#[derive(Document)]`.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection this document type lives in (e.g. "datapoints").
    const COLLECTION: &'static str;

    /// The store-assigned identifier. Empty until inserted.
    fn id(&self) -> &str;

    /// Set the identifier. Called by the store on insert.
    fn set_id(&mut self, id: String);
}

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A document with this id already exists in the collection.
    #[error("document already exists: {collection}:{id}")]
    Conflict { collection: String, id: String },
    /// Serialization/deserialization error.
    #[error("document serialization error: {0}")]
    Serde(String),
    /// Storage-level error.
    #[error("store backend error: {0}")]
    Backend(String),
    /// The connection string names no supported backend.
    #[error("unsupported store url: {0}")]
    InvalidUrl(String),
}

/// Raw document storage, one namespace per collection.
///
/// Implementations must visit documents in insertion order.
pub trait DocumentStore: Send + Sync {
    /// Insert a new document. Fails with `Conflict` if the id exists.
    fn insert(&self, collection: &str, id: &str, bytes: Vec<u8>) -> Result<(), StoreError>;

    /// Get a document by id. Returns None if not found.
    fn get(&self, collection: &str, id: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Call `visit` on every document in the collection, oldest insert
    /// first. Stops at the first error.
    fn visit(
        &self,
        collection: &str,
        visit: &mut dyn FnMut(&[u8]) -> Result<(), StoreError>,
    ) -> Result<(), StoreError>;

    /// All documents in the collection, oldest insert first.
    fn scan(&self, collection: &str) -> Result<Vec<Vec<u8>>, StoreError> {
        let mut docs = Vec::new();
        self.visit(collection, &mut |bytes| {
            docs.push(bytes.to_vec());
            Ok(())
        })?;
        Ok(docs)
    }

    /// Number of documents in the collection.
    fn count(&self, collection: &str) -> Result<usize, StoreError>;

    /// Persist pending writes. No-op for volatile backends.
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Shared handle to a store backend.
pub type SharedStore = Arc<dyn DocumentStore>;

/// Open a store from a connection string.
///
/// - `memory://` (or empty): volatile [`InMemoryStore`]
/// - `sled://<path>`: [`SledStore`] persisted at `<path>`
pub fn open_store(url: &str) -> Result<SharedStore, StoreError> {
    let url = url.trim();
    if url.is_empty() || url == "memory://" {
        return Ok(Arc::new(InMemoryStore::new()));
    }

    if let Some(path) = url.strip_prefix("sled://") {
        if path.is_empty() {
            return Err(StoreError::InvalidUrl(format!("{url} (missing path)")));
        }
        return Ok(Arc::new(SledStore::open(path)?));
    }

    Err(StoreError::InvalidUrl(url.to_string()))
}
