use crate::collection::operation::CollectionState;
use crate::collection::{
    CollectionEventInfo, CollectionEventListener, Document, DocumentValidator, Revision, ValidatorCallback,
};
use crate::common::{JotEventBus, SubscriberRef, Value};
use crate::errors::{JotError, JotResult};
use crate::jot_config::CollectionConfig;
use crate::query::{Query, QueryPlan, QueryState};
use crate::store::file::FileStorage;
use crate::store::memory::MemoryStorage;
use crate::store::Storage;
use parking_lot::Mutex;
use std::sync::Arc;

/// An embedded document collection.
///
/// `Collection` is a cheap handle: clones share the same documents, indexes,
/// listeners and transaction. Every operation holds the collection lock for
/// its whole duration, so operations on one collection never interleave.
/// Listeners run after the lock is released.
///
/// Open a collection with [CollectionBuilder](crate::CollectionBuilder):
///
/// ```rust,ignore
/// let notes = CollectionBuilder::new()
///     .name("notes")
///     .storage_dir("./data")
///     .soft_deletes(true)
///     .open()?;
///
/// let note = notes.insert(doc! { title: "hello", tags: ["a", "b"] })?;
/// let found = notes.find_by_id(note.id().unwrap_or_default())?;
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection").field("name", &self.inner.name).finish()
    }
}

struct CollectionInner {
    name: String,
    state: Mutex<CollectionState>,
    event_bus: JotEventBus,
}

impl Collection {
    pub(crate) fn open(config: CollectionConfig) -> JotResult<Self> {
        let storage = match (config.storage(), config.storage_dir()) {
            (Some(storage), _) => storage.clone(),
            (None, Some(dir)) => Storage::new(FileStorage::new(dir, config.name())?),
            (None, None) => Storage::new(MemoryStorage::new()),
        };

        let state = CollectionState::open(&config, storage)?;
        Ok(Collection {
            inner: Arc::new(CollectionInner {
                name: config.name().to_string(),
                state: Mutex::new(state),
                event_bus: JotEventBus::new(),
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Inserts a document.
    ///
    /// Validators run first. A missing `_id` is generated; `_created`,
    /// `_updated` and the first revision are stamped, configured fields are
    /// encrypted and both indexes are updated.
    ///
    /// # Returns
    ///
    /// The stored document, decrypted.
    ///
    /// # Errors
    ///
    /// * `ValidationError` if a validator rejects the document
    /// * `InvalidId` if `_id` is not a non-empty string
    /// * `DuplicateId` if a document with the same `_id` exists
    /// * `TransactionLockError` if a transaction scoped to another id is active
    pub fn insert(&self, document: Document) -> JotResult<Document> {
        let (inserted, events) = self.inner.state.lock().insert(document)?;
        self.publish(events);
        Ok(inserted)
    }

    /// Inserts several documents with one persistence flush. Either all
    /// documents are inserted or none.
    pub fn insert_many(&self, documents: Vec<Document>) -> JotResult<Vec<Document>> {
        let (inserted, events) = self.inner.state.lock().insert_many(documents)?;
        self.publish(events);
        Ok(inserted)
    }

    /// Returns the document with `id`.
    ///
    /// Tombstones are not returned while soft deletes are enabled.
    pub fn find_by_id(&self, id: &str) -> JotResult<Option<Document>> {
        Ok(self.inner.state.lock().find_by_id(id))
    }

    /// Starts a query on this collection.
    pub fn query(&self) -> Query<'_> {
        Query::new(self)
    }

    /// Shorthand for `query().where_(field, operator, value)`.
    pub fn where_<T: Into<Value>>(&self, field: &str, operator: &str, value: T) -> Query<'_> {
        self.query().where_(field, operator, value)
    }

    /// The first visible document in collection order.
    pub fn first(&self) -> JotResult<Option<Document>> {
        self.query().first()
    }

    /// Number of visible documents.
    pub fn count(&self) -> JotResult<usize> {
        self.query().count()
    }

    /// Snapshot of every visible document.
    pub fn all(&self) -> JotResult<Vec<Document>> {
        Ok(self.inner.state.lock().all())
    }

    /// Deletes a document: a tombstone when soft deletes are enabled, a
    /// removal otherwise.
    ///
    /// # Returns
    ///
    /// `true` if a document was deleted, `false` if the id is unknown or the
    /// document is already a tombstone.
    pub fn delete(&self, id: &str) -> JotResult<bool> {
        let (deleted, events) = self.inner.state.lock().delete(id)?;
        self.publish(events);
        Ok(deleted)
    }

    /// Removes a document regardless of the soft-delete setting.
    pub fn force_delete(&self, id: &str) -> JotResult<bool> {
        let (deleted, events) = self.inner.state.lock().force_delete(id)?;
        self.publish(events);
        Ok(deleted)
    }

    /// Clears the tombstone of a soft-deleted document.
    pub fn restore(&self, id: &str) -> JotResult<bool> {
        let (restored, events) = self.inner.state.lock().restore(id)?;
        self.publish(events);
        Ok(restored)
    }

    /// Removes all documents, keeping index definitions. Returns the number
    /// of removed documents.
    pub fn truncate(&self) -> JotResult<usize> {
        let (removed, events) = self.inner.state.lock().truncate()?;
        self.publish(events);
        Ok(removed)
    }

    /// Revision history of a document, oldest first. Empty for unknown ids.
    pub fn revisions(&self, id: &str) -> JotResult<Vec<Revision>> {
        Ok(self.inner.state.lock().revisions(id))
    }

    pub fn enable_soft_deletes(&self, enabled: bool) {
        self.inner.state.lock().soft_deletes = enabled;
    }

    pub fn soft_deletes_enabled(&self) -> bool {
        self.inner.state.lock().soft_deletes
    }

    /// Registers a validator that runs before every insert and update.
    pub fn register_validator(&self, validator: impl ValidatorCallback + 'static) {
        self.inner
            .state
            .lock()
            .validators
            .push(DocumentValidator::new(validator));
    }

    /// Registers a change listener.
    pub fn subscribe(&self, listener: CollectionEventListener) -> SubscriberRef {
        self.inner.event_bus.register(listener)
    }

    /// Removes a change listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, subscriber: SubscriberRef) -> bool {
        self.inner.event_bus.deregister(subscriber)
    }

    /// Creates or rebuilds a secondary index.
    ///
    /// # Arguments
    ///
    /// * `fields` - indexed field paths
    /// * `name` - index name; defaults to the field paths joined with `_`
    ///
    /// # Returns
    ///
    /// The index name.
    pub fn create_index(&self, fields: Vec<&str>, name: Option<&str>) -> JotResult<String> {
        let fields = fields.into_iter().map(String::from).collect();
        self.inner.state.lock().create_index(fields, name)
    }

    pub fn drop_index(&self, name: &str) -> JotResult<bool> {
        self.inner.state.lock().drop_index(name)
    }

    pub fn index_names(&self) -> Vec<String> {
        self.inner.state.lock().indexes.index_names()
    }

    pub fn has_index(&self, name: &str) -> bool {
        self.inner.state.lock().indexes.has_index(name)
    }

    /// Declares the full-text fields and rebuilds the full-text index.
    pub fn create_full_text_index(&self, fields: Vec<&str>) -> JotResult<()> {
        let fields = fields.into_iter().map(String::from).collect();
        self.inner.state.lock().create_full_text_index(fields)
    }

    /// Documents containing every word of `query` in a full-text field, in
    /// collection order.
    pub fn full_text_search(&self, query: &str) -> JotResult<Vec<Document>> {
        Ok(self.inner.state.lock().full_text_search(query))
    }

    /// Opens a transaction.
    ///
    /// With a `scope`, mutations of any other document id fail with
    /// `TransactionLockError`.
    ///
    /// # Errors
    ///
    /// `TransactionStateError` if a transaction is already active.
    pub fn begin_transaction(&self, scope: Option<&str>) -> JotResult<()> {
        self.inner
            .state
            .lock()
            .begin_transaction(scope.map(String::from))
    }

    /// Persists the transaction's changes and notifies listeners of every
    /// logged mutation, in order.
    pub fn commit(&self) -> JotResult<()> {
        let events = self.inner.state.lock().commit()?;
        self.publish(events);
        Ok(())
    }

    /// Restores the state from before `begin_transaction`.
    pub fn rollback(&self) -> JotResult<()> {
        self.inner.state.lock().rollback()
    }

    pub fn in_transaction(&self) -> bool {
        self.inner.state.lock().in_transaction()
    }

    /// Runs `scope_fn` inside a transaction, committing on `Ok` and rolling
    /// back on `Err`.
    pub fn transaction<T, F>(&self, scope: Option<&str>, scope_fn: F) -> JotResult<T>
    where
        F: FnOnce(&Collection) -> JotResult<T>,
    {
        self.begin_transaction(scope)?;
        let result = scope_fn(self).and_then(|value| self.commit().map(|_| value));
        if let Err(e) = &result {
            if self.in_transaction() {
                log::warn!("Rolling back transaction on '{}': {}", self.name(), e);
                self.rollback().map_err(|rollback_error| {
                    JotError::new_with_cause(e.message(), e.kind().clone(), rollback_error)
                })?;
            }
        }
        result
    }

    pub(crate) fn execute_query(&self, state: &QueryState) -> JotResult<Vec<Document>> {
        Ok(self.inner.state.lock().execute(state))
    }

    pub(crate) fn count_query(&self, state: &QueryState) -> JotResult<usize> {
        Ok(self.inner.state.lock().count(state))
    }

    pub(crate) fn update_query(&self, state: &QueryState, patch: &Document) -> JotResult<usize> {
        let (updated, events) = self.inner.state.lock().update(state, patch)?;
        self.publish(events);
        Ok(updated)
    }

    pub(crate) fn explain_query(&self, state: &QueryState) -> QueryPlan {
        self.inner.state.lock().explain(state)
    }

    fn publish(&self, events: Vec<CollectionEventInfo>) {
        self.inner.event_bus.publish_all(events);
    }
}

#[cfg(test)]
impl Collection {
    pub(crate) fn in_memory() -> Self {
        crate::CollectionBuilder::new()
            .open()
            .expect("Failed to open in-memory collection")
    }

    pub(crate) fn cached_documents(&self) -> usize {
        self.inner.state.lock().cache_len()
    }
}
