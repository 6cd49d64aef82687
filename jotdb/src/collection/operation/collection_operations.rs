use crate::collection::{CollectionEventInfo, Document, DocumentValidator};
use crate::common::FieldCipher;
use crate::errors::{ErrorKind, JotError, JotResult};
use crate::index::{FullTextIndex, IndexManager};
use crate::jot_config::CollectionConfig;
use crate::query::DocumentSorter;
use crate::store::Storage;
use crate::transaction::{MutationRecord, Transaction};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Mutable state of one collection.
///
/// Documents are kept in their stored form, i.e. with configured fields
/// encrypted. Predicates, indexes and sorting see the stored form; callers
/// only ever receive decrypted copies.
pub(crate) struct CollectionState {
    pub(crate) name: String,
    pub(crate) documents: Vec<Document>,
    pub(crate) indexes: IndexManager,
    pub(crate) full_text: FullTextIndex,
    pub(crate) soft_deletes: bool,
    pub(crate) transaction: Option<Transaction>,
    pub(crate) validators: Vec<DocumentValidator>,
    cipher: Option<FieldCipher>,
    cache: Option<LruCache<String, Document>>,
    pub(crate) sorter: DocumentSorter,
    storage: Storage,
}

impl CollectionState {
    /// Loads the persisted state through `storage`.
    pub(crate) fn open(config: &CollectionConfig, storage: Storage) -> JotResult<Self> {
        let cipher = match (config.encryption_key(), config.encrypted_fields()) {
            (_, []) => None,
            (Some(key), fields) => Some(FieldCipher::new(key, config.name(), fields.to_vec())?),
            (None, _) => {
                log::error!("Encrypted fields configured without an encryption key");
                return Err(JotError::new(
                    "Encrypted fields require an encryption key",
                    ErrorKind::InvalidOperation,
                ));
            }
        };

        let documents = storage.load_documents()?;
        for document in &documents {
            if document.id().is_none() {
                log::error!("Stored document without a valid _id in '{}'", config.name());
                return Err(JotError::new(
                    "Stored document without a valid _id",
                    ErrorKind::StorageReadError,
                ));
            }
        }

        // Entries are recomputed; the index files may lag behind the documents.
        let mut indexes = storage.load_indexes()?;
        let persisted_indexes = indexes.clone();
        indexes.rebuild_all(&documents);
        if indexes != persisted_indexes {
            log::info!("Rebuilt secondary index entries of '{}'", config.name());
        }

        let persisted_full_text = storage.load_full_text()?;
        let mut full_text = FullTextIndex::new(config.full_text_fields().to_vec());
        full_text.rebuild(documents.iter());
        if full_text.has_fields() && full_text.to_persisted() != persisted_full_text {
            log::info!("Rebuilt full-text postings of '{}'", config.name());
        }

        let sorter = DocumentSorter::new()?;
        let cache = NonZeroUsize::new(config.cache_capacity()).map(LruCache::new);

        log::debug!(
            "Opened collection '{}' with {} documents and {} indexes",
            config.name(),
            documents.len(),
            indexes.index_names().len()
        );

        Ok(CollectionState {
            name: config.name().to_string(),
            documents,
            indexes,
            full_text,
            soft_deletes: config.soft_deletes(),
            transaction: None,
            validators: config.validators().to_vec(),
            cipher,
            cache,
            sorter,
            storage,
        })
    }

    pub(crate) fn position_of(&self, id: &str) -> Option<usize> {
        self.documents.iter().position(|doc| doc.id() == Some(id))
    }

    pub(crate) fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Rejects mutations of `id` while a transaction scoped to another
    /// document is active.
    pub(crate) fn check_target(&self, id: &str) -> JotResult<()> {
        match &self.transaction {
            Some(transaction) => transaction.check_target(id),
            None => Ok(()),
        }
    }

    pub(crate) fn decrypt(&self, document: &Document) -> Document {
        match &self.cipher {
            Some(cipher) => cipher.decrypt_document(document),
            None => document.clone(),
        }
    }

    pub(crate) fn encrypt(&self, document: &Document) -> JotResult<Document> {
        match &self.cipher {
            Some(cipher) => cipher.encrypt_document(document),
            None => Ok(document.clone()),
        }
    }

    /// Decrypts the stored document at `position`, applies `change` to the
    /// plain copy and returns both the plain and the stored form of the
    /// result.
    ///
    /// A field that could not be decrypted keeps its stored value unless
    /// `change` replaced it.
    pub(crate) fn rewrite<F>(&self, position: usize, change: F) -> JotResult<(Document, Document)>
    where
        F: FnOnce(&mut Document) -> JotResult<()>,
    {
        let current = &self.documents[position];
        let cipher = match &self.cipher {
            Some(cipher) => cipher,
            None => {
                let mut plain = current.clone();
                change(&mut plain)?;
                return Ok((plain.clone(), plain));
            }
        };

        let (mut plain, failed) = cipher.decrypt_document_reporting(current);
        change(&mut plain)?;
        let untouched: Vec<String> = failed
            .into_iter()
            .filter(|field| plain.get(field) == current.get(field))
            .collect();
        let stored = cipher.encrypt_document_except(&plain, &untouched)?;
        Ok((plain, stored))
    }

    /// Persists all three files unless a transaction is active.
    pub(crate) fn persist(&self) -> JotResult<()> {
        if self.in_transaction() {
            return Ok(());
        }
        self.persist_now()
    }

    pub(crate) fn persist_now(&self) -> JotResult<()> {
        self.storage.save_documents(&self.documents)?;
        self.storage.save_indexes(&self.indexes)?;
        self.storage.save_full_text(&self.full_text.to_persisted())
    }

    pub(crate) fn persist_indexes(&self) -> JotResult<()> {
        if self.in_transaction() {
            return Ok(());
        }
        self.storage.save_indexes(&self.indexes)
    }

    pub(crate) fn persist_full_text(&self) -> JotResult<()> {
        if self.in_transaction() {
            return Ok(());
        }
        self.storage.save_full_text(&self.full_text.to_persisted())
    }

    /// Logs the mutation in the active transaction, or turns it into events
    /// to publish right away.
    pub(crate) fn dispatch(&mut self, mutation: MutationRecord) -> Vec<CollectionEventInfo> {
        match &mut self.transaction {
            Some(transaction) => {
                transaction.record(mutation);
                Vec::new()
            }
            None => mutation.into_events(),
        }
    }

    pub(crate) fn cache_get(&mut self, id: &str) -> Option<Document> {
        self.cache.as_mut().and_then(|cache| cache.get(id).cloned())
    }

    pub(crate) fn cache_put(&mut self, id: &str, document: &Document) {
        if let Some(cache) = self.cache.as_mut() {
            cache.put(id.to_string(), document.clone());
        }
    }

    pub(crate) fn cache_invalidate(&mut self, id: &str) {
        if let Some(cache) = self.cache.as_mut() {
            cache.pop(id);
        }
    }

    pub(crate) fn cache_clear(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
    }

    #[cfg(test)]
    pub(crate) fn cache_len(&self) -> usize {
        self.cache.as_ref().map(|c| c.len()).unwrap_or(0)
    }
}
