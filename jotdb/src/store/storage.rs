use crate::collection::Document;
use crate::errors::JotResult;
use crate::index::{IndexManager, PersistedTextIndex};
use std::ops::Deref;
use std::sync::Arc;

/// Contract of a collection storage backend.
///
/// Loading a state that was never saved returns an empty state. Each save
/// replaces the previous state of that file as a whole.
pub trait StorageProvider: Send + Sync {
    /// Loads the stored documents in collection order.
    fn load_documents(&self) -> JotResult<Vec<Document>>;

    /// Replaces the stored documents.
    fn save_documents(&self, documents: &[Document]) -> JotResult<()>;

    /// Loads the secondary indexes.
    fn load_indexes(&self) -> JotResult<IndexManager>;

    /// Replaces the stored secondary indexes.
    fn save_indexes(&self, indexes: &IndexManager) -> JotResult<()>;

    /// Loads the full-text token map.
    fn load_full_text(&self) -> JotResult<PersistedTextIndex>;

    /// Replaces the stored full-text token map.
    fn save_full_text(&self, full_text: &PersistedTextIndex) -> JotResult<()>;

    /// Whether saved state survives the process.
    fn is_durable(&self) -> bool;
}

/// Shared handle to a [StorageProvider].
///
/// Cloning is cheap; all clones refer to the same backend.
#[derive(Clone)]
pub struct Storage {
    inner: Arc<dyn StorageProvider>,
}

impl Storage {
    pub fn new<T: StorageProvider + 'static>(inner: T) -> Self {
        Storage { inner: Arc::new(inner) }
    }
}

impl Deref for Storage {
    type Target = Arc<dyn StorageProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
