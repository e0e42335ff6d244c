//! SledStore - persistent document store on sled.
//!
//! Each collection is two trees: `<collection>` maps a big-endian sequence
//! number to the document bytes, `<collection>.ids` maps the document id to
//! its sequence number. Iterating the first tree yields insertion order.

use std::path::Path;

use sled::transaction::{abort, TransactionError};
use sled::Transactional;

use super::{DocumentStore, StoreError};

/// Persistent document store backed by an embedded sled database.
#[derive(Clone)]
pub struct SledStore {
    db: sled::Db,
}

fn backend(err: sled::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

impl SledStore {
    /// Open (or create) a database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(backend)?;
        Ok(Self { db })
    }

    fn trees(&self, collection: &str) -> Result<(sled::Tree, sled::Tree), StoreError> {
        let docs = self.db.open_tree(collection).map_err(backend)?;
        let ids = self
            .db
            .open_tree(format!("{collection}.ids"))
            .map_err(backend)?;
        Ok((docs, ids))
    }
}

impl DocumentStore for SledStore {
    fn insert(&self, collection: &str, id: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let (docs, ids) = self.trees(collection)?;
        let seq = self.db.generate_id().map_err(backend)?.to_be_bytes();

        (&docs, &ids)
            .transaction(|(docs, ids)| {
                if ids.get(id.as_bytes())?.is_some() {
                    return abort(StoreError::Conflict {
                        collection: collection.to_string(),
                        id: id.to_string(),
                    });
                }
                docs.insert(&seq[..], bytes.as_slice())?;
                ids.insert(id.as_bytes(), &seq[..])?;
                Ok(())
            })
            .map_err(|err| match err {
                TransactionError::Abort(err) => err,
                TransactionError::Storage(err) => backend(err),
            })
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let (docs, ids) = self.trees(collection)?;
        let Some(seq) = ids.get(id.as_bytes()).map_err(backend)? else {
            return Ok(None);
        };
        Ok(docs.get(seq).map_err(backend)?.map(|bytes| bytes.to_vec()))
    }

    fn visit(
        &self,
        collection: &str,
        visit: &mut dyn FnMut(&[u8]) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let (docs, _) = self.trees(collection)?;
        for value in docs.iter().values() {
            visit(&value.map_err(backend)?)?;
        }
        Ok(())
    }

    fn count(&self, collection: &str) -> Result<usize, StoreError> {
        let (docs, _) = self.trees(collection)?;
        Ok(docs.len())
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.db.flush().map_err(backend)?;
        Ok(())
    }
}
