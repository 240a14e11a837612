//! In-memory store for generated documents.
//!
//! An upload request renders PDFs and a later download request fetches them
//! by id. Entries live until they are older than the configured TTL or are
//! evicted as least recently used once the store is full.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::{EngineError, EngineResult};

/// A generated document waiting to be downloaded.
#[derive(Debug)]
pub struct StoredDocument {
    /// The name offered to the browser.
    pub file_name: String,
    /// The document bytes.
    pub bytes: Vec<u8>,
    created: Instant,
}

impl StoredDocument {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created.elapsed() >= ttl
    }
}

/// Store occupancy.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StoreStats {
    /// Documents currently held (expired ones included until purged).
    pub documents: usize,
    /// Maximum number of documents.
    pub capacity: usize,
}

/// A bounded, expiring map from document id to document.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use planilla_engine::store::DocumentStore;
///
/// let store = DocumentStore::new(16, Duration::from_secs(60));
/// let id = store.insert("boleta.pdf", b"%PDF-1.5".to_vec());
/// assert_eq!(store.get(&id).unwrap().file_name, "boleta.pdf");
/// ```
#[derive(Debug)]
pub struct DocumentStore {
    entries: Mutex<LruCache<Uuid, Arc<StoredDocument>>>,
    ttl: Duration,
}

impl DocumentStore {
    /// Creates a store holding at most `capacity` documents (at least one).
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Creates a store sized from configuration.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.capacity, Duration::from_secs(config.ttl_seconds))
    }

    /// Stores a document under a fresh id.
    pub fn insert(&self, file_name: impl Into<String>, bytes: Vec<u8>) -> Uuid {
        let mut entries = self.entries.lock();
        Self::push(&mut entries, file_name.into(), bytes)
    }

    /// Stores every document of one batch, in order, under a single lock.
    ///
    /// Older documents may be evicted to make room, but never a document of
    /// the same batch, so every returned id is downloadable right after.
    ///
    /// # Errors
    ///
    /// Returns `BatchTooLarge` without storing anything when the batch holds
    /// more documents than the store capacity.
    pub fn insert_batch(&self, documents: Vec<(String, Vec<u8>)>) -> EngineResult<Vec<Uuid>> {
        let mut entries = self.entries.lock();
        let capacity = entries.cap().get();
        if documents.len() > capacity {
            return Err(EngineError::BatchTooLarge {
                documents: documents.len(),
                capacity,
            });
        }
        Ok(documents
            .into_iter()
            .map(|(file_name, bytes)| Self::push(&mut entries, file_name, bytes))
            .collect())
    }

    /// Fails with `BatchTooLarge` when `documents` cannot be held at once.
    pub fn ensure_fits(&self, documents: usize) -> EngineResult<()> {
        let capacity = self.capacity();
        if documents > capacity {
            return Err(EngineError::BatchTooLarge {
                documents,
                capacity,
            });
        }
        Ok(())
    }

    /// Maximum number of documents held at once.
    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    fn push(
        entries: &mut LruCache<Uuid, Arc<StoredDocument>>,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let document = StoredDocument {
            file_name,
            bytes,
            created: Instant::now(),
        };
        if let Some((evicted, _)) = entries.push(id, Arc::new(document)) {
            if evicted != id {
                tracing::debug!(document_id = %evicted, "evicted least recently used document");
            }
        }
        id
    }

    /// Fetches a document.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` when the id was never stored, was evicted or
    /// has expired. Expired entries are removed.
    pub fn get(&self, id: &Uuid) -> EngineResult<Arc<StoredDocument>> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(id) {
            Some(document) if !document.is_expired(self.ttl) => return Ok(Arc::clone(document)),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(id);
        }
        Err(EngineError::DocumentNotFound { id: id.to_string() })
    }

    /// Removes every expired document and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock();
        let expired: Vec<Uuid> = entries
            .iter()
            .filter(|(_, document)| document.is_expired(self.ttl))
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            entries.pop(id);
        }
        expired.len()
    }

    /// Number of documents held.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when no documents are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current occupancy.
    pub fn stats(&self) -> StoreStats {
        let entries = self.entries.lock();
        StoreStats {
            documents: entries.len(),
            capacity: entries.cap().get(),
        }
    }
}
