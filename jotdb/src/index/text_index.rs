use crate::collection::Document;
use crate::index::text::tokenize;
use std::collections::{BTreeMap, BTreeSet};

/// Serialized form of the full-text index: `{ token: { id: true } }`.
pub type PersistedTextIndex = BTreeMap<String, BTreeMap<String, bool>>;

/// Inverted index over the declared text fields of a collection.
///
/// Each token maps to the set of ids of the documents where at least one
/// declared field holds a string containing that token. Only string values
/// are tokenized. The declared fields are configuration and are not part of
/// the persisted token map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FullTextIndex {
    fields: Vec<String>,
    postings: BTreeMap<String, BTreeSet<String>>,
}

impl FullTextIndex {
    pub fn new(fields: Vec<String>) -> Self {
        FullTextIndex {
            fields,
            postings: BTreeMap::new(),
        }
    }

    pub fn to_persisted(&self) -> PersistedTextIndex {
        self.postings
            .iter()
            .map(|(token, ids)| (token.clone(), ids.iter().map(|id| (id.clone(), true)).collect()))
            .collect()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Number of distinct tokens.
    pub fn token_count(&self) -> usize {
        self.postings.len()
    }

    pub fn postings(&self, token: &str) -> Option<&BTreeSet<String>> {
        self.postings.get(token)
    }

    /// Declares the indexed fields and rebuilds from `documents`.
    pub(crate) fn reset<'a>(&mut self, fields: Vec<String>, documents: impl Iterator<Item = &'a Document>) {
        self.fields = fields;
        self.rebuild(documents);
    }

    pub(crate) fn rebuild<'a>(&mut self, documents: impl Iterator<Item = &'a Document>) {
        self.postings.clear();
        for document in documents {
            if let Some(id) = document.id() {
                self.index(id, document);
            }
        }
    }

    pub(crate) fn index(&mut self, id: &str, document: &Document) {
        for field in &self.fields {
            let text = match document.get(field).and_then(|v| v.as_str()) {
                Some(text) => text,
                None => continue,
            };
            for token in tokenize(text) {
                self.postings.entry(token).or_default().insert(id.to_string());
            }
        }
    }

    /// Removes `id` from every posting set, pruning empty tokens.
    pub(crate) fn deindex(&mut self, id: &str) {
        self.postings.retain(|_, ids| {
            ids.remove(id);
            !ids.is_empty()
        });
    }

    pub(crate) fn reindex(&mut self, id: &str, document: &Document) {
        self.deindex(id);
        self.index(id, document);
    }

    /// Removes every token while keeping the declared fields.
    pub(crate) fn clear(&mut self) {
        self.postings.clear();
    }

    /// Ids containing every token of `query`.
    ///
    /// A query without tokens, or with a token absent from the index, yields
    /// an empty set.
    pub fn search(&self, query: &str) -> BTreeSet<String> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return BTreeSet::new();
        }

        let mut sets = Vec::with_capacity(tokens.len());
        for token in &tokens {
            match self.postings.get(token) {
                Some(ids) => sets.push(ids),
                None => return BTreeSet::new(),
            }
        }

        // intersect starting from the smallest posting set
        sets.sort_by_key(|ids| ids.len());
        let (first, rest) = match sets.split_first() {
            Some(split) => split,
            None => return BTreeSet::new(),
        };
        first
            .iter()
            .filter(|id| rest.iter().all(|ids| ids.contains(*id)))
            .cloned()
            .collect()
    }
}
