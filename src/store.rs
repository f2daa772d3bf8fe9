//! Storage abstraction for analyzed documents.
//!
//! The [`DocumentStore`] trait defines the operations the pipeline and query
//! router need, enabling pluggable backends. The shipped backend is
//! [`InMemoryStore`]: a `RwLock<HashMap>` keyed by document id, which gives
//! per-key atomicity. A delete racing a concurrent `get` for the same id
//! simply surfaces as a miss for the later caller.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use async_trait::async_trait;

use crate::models::DocumentIndex;

/// Abstract storage backend mapping document ids to their semantic indexes.
///
/// Indexes are immutable once stored: `put` with an existing id replaces the
/// entry wholesale, never patches it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store an index under `id`, overwriting any prior entry.
    async fn put(&self, id: &str, index: DocumentIndex) -> Result<()>;

    /// Look up an index by id.
    async fn get(&self, id: &str) -> Result<Option<Arc<DocumentIndex>>>;

    /// Remove an index. Returns `false` when the id was unknown.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// All stored document ids, in no particular order.
    async fn list_ids(&self) -> Result<Vec<String>>;
}

/// In-memory [`DocumentStore`] holding indexes for the process lifetime.
pub struct InMemoryStore {
    docs: RwLock<HashMap<String, Arc<DocumentIndex>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn put(&self, id: &str, index: DocumentIndex) -> Result<()> {
        let mut docs = self.docs.write().unwrap();
        docs.insert(id.to_string(), Arc::new(index));
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Arc<DocumentIndex>>> {
        let docs = self.docs.read().unwrap();
        Ok(docs.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut docs = self.docs.write().unwrap();
        Ok(docs.remove(id).is_some())
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        let docs = self.docs.read().unwrap();
        Ok(docs.keys().cloned().collect())
    }
}
