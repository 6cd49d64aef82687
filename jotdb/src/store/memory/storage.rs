use crate::collection::Document;
use crate::errors::JotResult;
use crate::index::{IndexManager, PersistedTextIndex};
use crate::store::StorageProvider;
use parking_lot::Mutex;
use std::sync::Arc;

/// In-memory storage backend.
///
/// Keeps a copy of the last saved state. Nothing survives the process; clones
/// share the same state, so a second collection opened on a clone sees what
/// the first one saved.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    documents: Vec<Document>,
    indexes: IndexManager,
    full_text: PersistedTextIndex,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }
}

impl StorageProvider for MemoryStorage {
    fn load_documents(&self) -> JotResult<Vec<Document>> {
        Ok(self.inner.lock().documents.clone())
    }

    fn save_documents(&self, documents: &[Document]) -> JotResult<()> {
        self.inner.lock().documents = documents.to_vec();
        Ok(())
    }

    fn load_indexes(&self) -> JotResult<IndexManager> {
        Ok(self.inner.lock().indexes.clone())
    }

    fn save_indexes(&self, indexes: &IndexManager) -> JotResult<()> {
        self.inner.lock().indexes = indexes.clone();
        Ok(())
    }

    fn load_full_text(&self) -> JotResult<PersistedTextIndex> {
        Ok(self.inner.lock().full_text.clone())
    }

    fn save_full_text(&self, full_text: &PersistedTextIndex) -> JotResult<()> {
        self.inner.lock().full_text = full_text.clone();
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }
}
