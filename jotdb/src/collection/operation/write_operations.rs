use super::CollectionState;
use crate::collection::{append_revision, validate_all, CollectionEventInfo, CollectionEvents, Document, RevisionAction};
use crate::common::util::{deep_merge, generate_id, now_iso8601, strip_reserved_fields};
use crate::common::{Value, DOC_CREATED, DOC_DELETED, DOC_ID, DOC_UPDATED, RESERVED_FIELDS};
use crate::errors::{ErrorKind, JotError, JotResult};
use crate::query::QueryState;
use crate::transaction::{MutationRecord, Snapshot, Transaction};
use std::collections::HashSet;

type Events = Vec<CollectionEventInfo>;

/// A document ready to be appended: its id, decrypted and stored forms.
struct PreparedInsert {
    id: String,
    plain: Document,
    stored: Document,
}

impl CollectionState {
    pub(crate) fn insert(&mut self, document: Document) -> JotResult<(Document, Events)> {
        let prepared = self.prepare_insert(document, &HashSet::new())?;
        let plain = prepared.plain.clone();
        self.append(prepared);
        self.persist()?;

        let events = self.dispatch(MutationRecord::Insert(plain.clone()));
        Ok((plain, events))
    }

    /// Inserts all documents or none: every document is validated and
    /// checked for id conflicts before the first one is appended.
    pub(crate) fn insert_many(&mut self, documents: Vec<Document>) -> JotResult<(Vec<Document>, Events)> {
        let mut batch_ids = HashSet::with_capacity(documents.len());
        let mut prepared = Vec::with_capacity(documents.len());
        for document in documents {
            let item = self.prepare_insert(document, &batch_ids)?;
            batch_ids.insert(item.id.clone());
            prepared.push(item);
        }

        let inserted: Vec<Document> = prepared.iter().map(|p| p.plain.clone()).collect();
        prepared.into_iter().for_each(|item| self.append(item));
        if inserted.is_empty() {
            return Ok((inserted, Vec::new()));
        }
        self.persist()?;

        let events = self.dispatch(MutationRecord::InsertMany(inserted.clone()));
        Ok((inserted, events))
    }

    /// Deep merges `patch` into every document matched by `state`.
    ///
    /// All matched documents are merged and validated first; if any check
    /// fails nothing is written.
    pub(crate) fn update(&mut self, state: &QueryState, patch: &Document) -> JotResult<(usize, Events)> {
        let positions = self.matching_positions(state);
        for &position in &positions {
            self.check_target(stored_id(&self.documents[position]))?;
        }
        if positions.is_empty() {
            return Ok((0, Vec::new()));
        }

        let patch = strip_reserved_fields(patch);
        let now = now_iso8601();
        let mut prepared = Vec::with_capacity(positions.len());
        for &position in &positions {
            let (plain, stored) = self.rewrite(position, |plain| {
                deep_merge(plain, &patch);
                plain.put_top_level(DOC_UPDATED, Value::from(&now));
                append_revision(plain, RevisionAction::Update);
                validate_all(&self.validators, plain)
            })?;
            prepared.push((position, plain, stored));
        }

        let mut updated = Vec::with_capacity(prepared.len());
        for (position, plain, stored) in prepared {
            let id = stored_id(&stored).to_string();
            let old = std::mem::replace(&mut self.documents[position], stored);
            self.indexes.on_update(&id, &old, &self.documents[position]);
            self.full_text.reindex(&id, &self.documents[position]);
            self.cache_invalidate(&id);
            updated.push(plain);
        }
        self.persist()?;

        let count = updated.len();
        let events = self.dispatch(MutationRecord::Update(updated));
        Ok((count, events))
    }

    /// Soft deletes when enabled, otherwise removes the document.
    ///
    /// Returns `false` if the id is unknown or the document already is a
    /// tombstone.
    pub(crate) fn delete(&mut self, id: &str) -> JotResult<(bool, Events)> {
        if !self.soft_deletes {
            return self.force_delete(id);
        }

        self.check_target(id)?;
        let position = match self.position_of(id) {
            Some(position) if !self.documents[position].is_deleted() => position,
            _ => return Ok((false, Vec::new())),
        };

        let document = &mut self.documents[position];
        document.put_top_level(DOC_DELETED, Value::Bool(true));
        document.put_top_level(DOC_UPDATED, Value::from(now_iso8601()));
        append_revision(document, RevisionAction::SoftDelete);

        let snapshot = self.decrypt(&self.documents[position]);
        self.cache_invalidate(id);
        self.persist()?;

        let events = self.dispatch_delete(id, snapshot);
        Ok((true, events))
    }

    /// Removes the document and purges it from every index.
    pub(crate) fn force_delete(&mut self, id: &str) -> JotResult<(bool, Events)> {
        self.check_target(id)?;
        let position = match self.position_of(id) {
            Some(position) => position,
            None => return Ok((false, Vec::new())),
        };

        let removed = self.documents.remove(position);
        self.indexes.on_delete(id, &removed);
        self.full_text.deindex(id);
        self.cache_invalidate(id);
        self.persist()?;

        let snapshot = self.decrypt(&removed);
        let events = self.dispatch_delete(id, snapshot);
        Ok((true, events))
    }

    /// Clears the tombstone of a soft-deleted document.
    pub(crate) fn restore(&mut self, id: &str) -> JotResult<(bool, Events)> {
        self.check_target(id)?;
        let position = match self.position_of(id) {
            Some(position) if self.documents[position].is_deleted() => position,
            _ => return Ok((false, Vec::new())),
        };

        let document = &mut self.documents[position];
        document.remove(DOC_DELETED);
        document.put_top_level(DOC_UPDATED, Value::from(now_iso8601()));
        append_revision(document, RevisionAction::Restore);

        let restored = self.decrypt(&self.documents[position]);
        self.cache_invalidate(id);
        self.persist()?;

        let events = self.dispatch(MutationRecord::Update(vec![restored]));
        Ok((true, events))
    }

    /// Removes every document. Index definitions and full-text fields stay.
    pub(crate) fn truncate(&mut self) -> JotResult<(usize, Events)> {
        for document in &self.documents {
            self.check_target(stored_id(document))?;
        }

        let removed = std::mem::take(&mut self.documents);
        self.indexes.clear_entries();
        self.full_text.clear();
        self.cache_clear();
        self.persist()?;

        let mut events = Vec::new();
        for document in &removed {
            let snapshot = self.decrypt(document);
            events.extend(self.dispatch_delete(stored_id(document), snapshot));
        }
        log::info!("Truncated collection '{}' ({} documents)", self.name, removed.len());
        Ok((removed.len(), events))
    }

    pub(crate) fn begin_transaction(&mut self, scope: Option<String>) -> JotResult<()> {
        if self.in_transaction() {
            log::error!("Transaction already active on '{}'", self.name);
            return Err(JotError::new(
                "Transaction already active",
                ErrorKind::TransactionStateError,
            ));
        }

        let snapshot = Snapshot {
            documents: self.documents.clone(),
            indexes: self.indexes.clone(),
            full_text: self.full_text.clone(),
        };
        self.transaction = Some(Transaction::begin(scope, snapshot));
        Ok(())
    }

    /// Persists the state and returns the logged mutations as events.
    ///
    /// If persisting fails the transaction stays active.
    pub(crate) fn commit(&mut self) -> JotResult<Events> {
        if !self.in_transaction() {
            log::error!("Commit without an active transaction on '{}'", self.name);
            return Err(no_transaction());
        }

        self.persist_now()?;
        self.cache_clear();
        let log = self.transaction.take().map(|t| t.into_log()).unwrap_or_default();
        log::debug!("Committed {} mutations on '{}'", log.len(), self.name);
        Ok(log.into_iter().flat_map(|m| m.into_events()).collect())
    }

    /// Restores the begin-time snapshot and persists it. No events are fired.
    pub(crate) fn rollback(&mut self) -> JotResult<()> {
        let transaction = match self.transaction.take() {
            Some(transaction) => transaction,
            None => {
                log::error!("Rollback without an active transaction on '{}'", self.name);
                return Err(no_transaction());
            }
        };

        let discarded = transaction.log().len();
        let snapshot = transaction.into_snapshot();
        self.documents = snapshot.documents;
        self.indexes = snapshot.indexes;
        self.full_text = snapshot.full_text;
        self.cache_clear();
        log::debug!("Rolled back {} mutations on '{}'", discarded, self.name);
        self.persist_now()
    }

    fn prepare_insert(&self, document: Document, batch_ids: &HashSet<String>) -> JotResult<PreparedInsert> {
        validate_all(&self.validators, &document)?;

        let id = match document.get(DOC_ID) {
            None => generate_id(),
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(other) => {
                log::error!("Invalid document id {:?}", other);
                return Err(JotError::new(
                    "Document id must be a non-empty string",
                    ErrorKind::InvalidId,
                ));
            }
        };

        if batch_ids.contains(&id) || self.position_of(&id).is_some() {
            log::error!("Document with id '{}' already exists in '{}'", id, self.name);
            return Err(JotError::new(
                &format!("Document with id '{}' already exists", id),
                ErrorKind::DuplicateId,
            ));
        }
        self.check_target(&id)?;

        let now = now_iso8601();
        let mut plain: Document = std::iter::once((DOC_ID.to_string(), Value::from(&id)))
            .chain(
                document
                    .into_iter()
                    .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str())),
            )
            .collect();
        plain.put_top_level(DOC_CREATED, Value::from(&now));
        plain.put_top_level(DOC_UPDATED, Value::from(now));
        append_revision(&mut plain, RevisionAction::Insert);

        let stored = self.encrypt(&plain)?;
        Ok(PreparedInsert { id, plain, stored })
    }

    fn append(&mut self, prepared: PreparedInsert) {
        let PreparedInsert { id, stored, .. } = prepared;
        self.indexes.on_insert(&id, &stored);
        self.full_text.index(&id, &stored);
        self.documents.push(stored);
        self.cache_invalidate(&id);
    }

    // deletes are logged by id only; the body travels with immediate events
    fn dispatch_delete(&mut self, id: &str, snapshot: Document) -> Events {
        if self.in_transaction() {
            self.dispatch(MutationRecord::Delete(id.to_string()))
        } else {
            vec![CollectionEventInfo::new(snapshot, CollectionEvents::Delete)]
        }
    }
}

fn stored_id(document: &Document) -> &str {
    document.id().unwrap_or_default()
}

fn no_transaction() -> JotError {
    JotError::new("No active transaction", ErrorKind::TransactionStateError)
}
