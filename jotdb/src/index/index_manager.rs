use crate::collection::Document;
use crate::common::INDEX_NAME_SEPARATOR;
use crate::errors::{ErrorKind, JotError, JotResult};
use crate::index::SecondaryIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The named secondary indexes of a collection.
///
/// Index maintenance is incremental: every insert, update and delete of the
/// collection is forwarded to all indexes. The manager serializes as a map
/// from index name to [SecondaryIndex].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexManager {
    indexes: BTreeMap<String, SecondaryIndex>,
}

impl IndexManager {
    pub fn new() -> Self {
        IndexManager::default()
    }

    /// Creates, or rebuilds when the name exists, an index over `fields`.
    ///
    /// # Arguments
    ///
    /// * `fields` - indexed field paths, in key order
    /// * `name` - index name; defaults to the field paths joined with `_`
    /// * `documents` - the stored documents to scan
    ///
    /// # Returns
    ///
    /// The name of the index.
    ///
    /// # Errors
    ///
    /// `IndexingError` if `fields` is empty or contains an empty path.
    pub fn create_index<'a>(
        &mut self,
        fields: Vec<String>,
        name: Option<&str>,
        documents: impl Iterator<Item = &'a Document>,
    ) -> JotResult<String> {
        if fields.is_empty() || fields.iter().any(|f| f.trim().is_empty()) {
            log::error!("Cannot create an index without fields: {:?}", fields);
            return Err(JotError::new(
                "Index requires at least one non-empty field",
                ErrorKind::IndexingError,
            ));
        }

        let name = match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => fields.join(INDEX_NAME_SEPARATOR),
        };

        let mut index = SecondaryIndex::new(fields);
        index.rebuild(documents);
        log::debug!("Built index '{}' with {} keys", name, index.map().len());
        self.indexes.insert(name.clone(), index);
        Ok(name)
    }

    /// Drops an index. Returns `false` if no index had that name.
    pub fn drop_index(&mut self, name: &str) -> bool {
        self.indexes.remove(name).is_some()
    }

    pub fn has_index(&self, name: &str) -> bool {
        self.indexes.contains_key(name)
    }

    /// Index names in sorted order.
    pub fn index_names(&self) -> Vec<String> {
        self.indexes.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<&SecondaryIndex> {
        self.indexes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SecondaryIndex)> {
        self.indexes.iter()
    }

    pub(crate) fn on_insert(&mut self, id: &str, document: &Document) {
        self.indexes.values_mut().for_each(|index| index.add(id, document));
    }

    pub(crate) fn on_delete(&mut self, id: &str, document: &Document) {
        self.indexes.values_mut().for_each(|index| index.remove(id, document));
    }

    pub(crate) fn on_update(&mut self, id: &str, old: &Document, new: &Document) {
        self.indexes.values_mut().for_each(|index| index.update(id, old, new));
    }

    /// Recomputes the entries of every index from `documents`, keeping the
    /// definitions.
    pub(crate) fn rebuild_all(&mut self, documents: &[Document]) {
        self.indexes
            .values_mut()
            .for_each(|index| index.rebuild(documents.iter()));
    }

    /// Removes every entry while keeping the index definitions.
    pub(crate) fn clear_entries(&mut self) {
        self.indexes.values_mut().for_each(|index| index.clear());
    }
}
