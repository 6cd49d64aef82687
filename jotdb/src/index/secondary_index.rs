use crate::collection::Document;
use crate::common::{Value, KEY_SEPARATOR};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An equality index over one or more document fields.
///
/// The index maps a composite key to the ids of the documents producing that
/// key, in insertion order. The composite key is the index key of each
/// indexed field value (see [Value::index_key]) joined with `|`. Documents
/// where any indexed field is missing or null are not indexed.
///
/// Distinct values can share a key, so a lookup returns candidates that the
/// caller re-checks against its predicates.
///
/// The serialized form is `{ "fields": [...], "map": { key: [ids] } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryIndex {
    fields: Vec<String>,
    map: BTreeMap<String, Vec<String>>,
}

impl SecondaryIndex {
    pub fn new(fields: Vec<String>) -> Self {
        SecondaryIndex {
            fields,
            map: BTreeMap::new(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.map
    }

    /// Joins already extracted field values into a composite key.
    pub fn composite_key_of(values: &[&Value]) -> String {
        values.iter().map(|v| v.index_key()).join(KEY_SEPARATOR)
    }

    /// The composite key of `document`, or `None` if an indexed field is
    /// missing or null.
    pub fn composite_key(&self, document: &Document) -> Option<String> {
        let values = self
            .fields
            .iter()
            .map(|field| document.get(field).filter(|v| !v.is_null()))
            .collect::<Option<Vec<&Value>>>()?;
        Some(Self::composite_key_of(&values))
    }

    /// Ids stored under `key`, in insertion order.
    pub fn lookup(&self, key: &str) -> &[String] {
        self.map.get(key).map(|ids| ids.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn add(&mut self, id: &str, document: &Document) {
        if let Some(key) = self.composite_key(document) {
            let ids = self.map.entry(key).or_default();
            if !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }
    }

    pub(crate) fn remove(&mut self, id: &str, document: &Document) {
        if let Some(key) = self.composite_key(document) {
            self.remove_from_key(&key, id);
        }
    }

    /// Moves `id` from the key of `old` to the key of `new`. Unchanged keys
    /// are a no-op.
    pub(crate) fn update(&mut self, id: &str, old: &Document, new: &Document) {
        let old_key = self.composite_key(old);
        let new_key = self.composite_key(new);
        if old_key == new_key {
            return;
        }
        if let Some(key) = old_key {
            self.remove_from_key(&key, id);
        }
        self.add(id, new);
    }

    /// Replaces all entries with a fresh scan over `documents`.
    pub(crate) fn rebuild<'a>(&mut self, documents: impl Iterator<Item = &'a Document>) {
        self.map.clear();
        for document in documents {
            if let Some(id) = document.id() {
                self.add(id, document);
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }

    fn remove_from_key(&mut self, key: &str, id: &str) {
        if let Some(ids) = self.map.get_mut(key) {
            ids.retain(|existing| existing != id);
            if ids.is_empty() {
                self.map.remove(key);
            }
        }
    }
}
