//! Collection - typed accessor for documents of one type.

use std::marker::PhantomData;

use uuid::Uuid;

use super::{Document, DocumentStore, Query, StoreError};

/// Typed accessor over a [`DocumentStore`] for documents of type `D`.
pub struct Collection<'a, S: ?Sized, D> {
    store: &'a S,
    _marker: PhantomData<D>,
}

impl<'a, S: DocumentStore + ?Sized, D: Document> Collection<'a, S, D> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Insert a new document under a freshly assigned id.
    ///
    /// Returns the stored record, id included.
    pub fn insert(&self, mut doc: D) -> Result<D, StoreError> {
        doc.set_id(new_id());
        let bytes = serde_json::to_vec(&doc).map_err(|e| StoreError::Serde(e.to_string()))?;
        self.store.insert(D::COLLECTION, doc.id(), bytes)?;
        Ok(doc)
    }

    /// Get a document by id.
    pub fn get(&self, id: &str) -> Result<Option<D>, StoreError> {
        self.store
            .get(D::COLLECTION, id)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    /// Run a query over the collection.
    ///
    /// Documents are decoded one at a time; with a limit, no more than
    /// `limit` are held at once.
    pub fn find(&self, query: Query<'_, D>) -> Result<Vec<D>, StoreError> {
        let mut selection = query.selection();
        self.store.visit(D::COLLECTION, &mut |bytes| {
            if !selection.is_saturated() {
                selection.offer(decode(bytes)?);
            }
            Ok(())
        })?;
        Ok(selection.finish())
    }

    /// Number of documents in the collection.
    pub fn count(&self) -> Result<usize, StoreError> {
        self.store.count(D::COLLECTION)
    }
}

/// Extension trait for typed collection access on any store.
pub trait CollectionsExt: DocumentStore {
    /// Get a typed collection accessor.
    fn collection<D: Document>(&self) -> Collection<'_, Self, D>;
}

impl<S: DocumentStore + ?Sized> CollectionsExt for S {
    fn collection<D: Document>(&self) -> Collection<'_, Self, D> {
        Collection::new(self)
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn decode<D: Document>(bytes: &[u8]) -> Result<D, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Serde(e.to_string()))
}
