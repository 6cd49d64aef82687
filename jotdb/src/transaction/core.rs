use crate::collection::{CollectionEventInfo, CollectionEvents, Document};
use crate::common::util::generate_id;
use crate::common::{Value, DOC_ID};
use crate::errors::{ErrorKind, JotError, JotResult};
use crate::index::{FullTextIndex, IndexManager};

/// Type of a logged mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Insert,
    InsertMany,
    Update,
    Delete,
}

/// One mutation applied while a transaction was active.
///
/// Documents are decrypted snapshots taken when the mutation was applied.
/// Deletes only keep the id.
#[derive(Debug, Clone)]
pub enum MutationRecord {
    Insert(Document),
    InsertMany(Vec<Document>),
    Update(Vec<Document>),
    Delete(String),
}

impl MutationRecord {
    pub fn change_type(&self) -> ChangeType {
        match self {
            MutationRecord::Insert(_) => ChangeType::Insert,
            MutationRecord::InsertMany(_) => ChangeType::InsertMany,
            MutationRecord::Update(_) => ChangeType::Update,
            MutationRecord::Delete(_) => ChangeType::Delete,
        }
    }

    /// Events announced for this mutation on commit.
    pub(crate) fn into_events(self) -> Vec<CollectionEventInfo> {
        match self {
            MutationRecord::Insert(doc) => vec![CollectionEventInfo::new(doc, CollectionEvents::Insert)],
            MutationRecord::InsertMany(docs) => docs
                .into_iter()
                .map(|doc| CollectionEventInfo::new(doc, CollectionEvents::Insert))
                .collect(),
            MutationRecord::Update(docs) => docs
                .into_iter()
                .map(|doc| CollectionEventInfo::new(doc, CollectionEvents::Update))
                .collect(),
            MutationRecord::Delete(id) => {
                let item: Document = std::iter::once((DOC_ID.to_string(), Value::String(id))).collect();
                vec![CollectionEventInfo::new(item, CollectionEvents::Delete)]
            }
        }
    }
}

/// Deep copy of the collection state taken at `begin_transaction`.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub(crate) documents: Vec<Document>,
    pub(crate) indexes: IndexManager,
    pub(crate) full_text: FullTextIndex,
}

/// An active transaction: its scope, mutation log and begin-time snapshot.
#[derive(Debug)]
pub struct Transaction {
    id: String,
    scope: Option<String>,
    log: Vec<MutationRecord>,
    snapshot: Snapshot,
}

impl Transaction {
    pub(crate) fn begin(scope: Option<String>, snapshot: Snapshot) -> Self {
        let transaction = Transaction {
            id: generate_id(),
            scope,
            log: Vec::new(),
            snapshot,
        };
        log::debug!(
            "Transaction {} started (scope: {:?})",
            transaction.id,
            transaction.scope
        );
        transaction
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The document id this transaction is restricted to, if scoped.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn log(&self) -> &[MutationRecord] {
        &self.log
    }

    /// Fails with `TransactionLockError` when the transaction is scoped to a
    /// different document than `target_id`.
    pub(crate) fn check_target(&self, target_id: &str) -> JotResult<()> {
        match &self.scope {
            Some(scope) if scope != target_id => {
                log::error!(
                    "Transaction {} is scoped to '{}', rejected mutation of '{}'",
                    self.id,
                    scope,
                    target_id
                );
                Err(JotError::new(
                    "Cannot mutate: transaction lock held by another document",
                    ErrorKind::TransactionLockError,
                ))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn record(&mut self, mutation: MutationRecord) {
        self.log.push(mutation);
    }

    /// Consumes the transaction, returning the log for replay.
    pub(crate) fn into_log(self) -> Vec<MutationRecord> {
        self.log
    }

    /// Consumes the transaction, returning the begin-time snapshot.
    pub(crate) fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }
}
