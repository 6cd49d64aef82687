use crate::collection::Document;
use crate::common::util::{generate_revision_id, now_iso8601};
use crate::common::{Value, DOC_REVISIONS, REVISION_ACTION, REVISION_ID, REVISION_TIMESTAMP};
use std::fmt::Display;

/// The mutation recorded by a revision entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionAction {
    Insert,
    Update,
    SoftDelete,
    Restore,
}

impl RevisionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevisionAction::Insert => "insert",
            RevisionAction::Update => "update",
            RevisionAction::SoftDelete => "soft_delete",
            RevisionAction::Restore => "restore",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "insert" => Some(RevisionAction::Insert),
            "update" => Some(RevisionAction::Update),
            "soft_delete" => Some(RevisionAction::SoftDelete),
            "restore" => Some(RevisionAction::Restore),
            _ => None,
        }
    }
}

impl Display for RevisionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a document's `_revisions` history.
#[derive(Debug, Clone, PartialEq)]
pub struct Revision {
    revision_id: String,
    timestamp: String,
    action: RevisionAction,
}

impl Revision {
    pub(crate) fn new(action: RevisionAction) -> Self {
        Revision {
            revision_id: generate_revision_id(),
            timestamp: now_iso8601(),
            action,
        }
    }

    pub fn revision_id(&self) -> &str {
        &self.revision_id
    }

    /// ISO-8601 UTC timestamp of the change.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn action(&self) -> RevisionAction {
        self.action
    }

    fn to_value(&self) -> Value {
        let entry: Document = [
            (REVISION_ID.to_string(), Value::from(&self.revision_id)),
            (REVISION_TIMESTAMP.to_string(), Value::from(&self.timestamp)),
            (REVISION_ACTION.to_string(), Value::from(self.action.as_str())),
        ]
        .into_iter()
        .collect();
        Value::Document(entry)
    }

    fn from_value(value: &Value) -> Option<Self> {
        let entry = value.as_document()?;
        Some(Revision {
            revision_id: entry.get(REVISION_ID)?.as_str()?.to_string(),
            timestamp: entry.get(REVISION_TIMESTAMP)?.as_str()?.to_string(),
            action: RevisionAction::parse(entry.get(REVISION_ACTION)?.as_str()?)?,
        })
    }
}

/// Appends a new revision entry to `document` and returns it.
///
/// A missing or malformed `_revisions` field is replaced by a fresh history.
pub(crate) fn append_revision(document: &mut Document, action: RevisionAction) -> Revision {
    let revision = Revision::new(action);
    match document.get_mut_top_level(DOC_REVISIONS) {
        Some(Value::Array(history)) => history.push(revision.to_value()),
        _ => document.put_top_level(DOC_REVISIONS, Value::Array(vec![revision.to_value()])),
    }
    revision
}

/// Reads the revision history of `document`, skipping malformed entries.
pub fn revisions_of(document: &Document) -> Vec<Revision> {
    document
        .get(DOC_REVISIONS)
        .and_then(|v| v.as_array())
        .map(|history| history.iter().filter_map(Revision::from_value).collect())
        .unwrap_or_default()
}
