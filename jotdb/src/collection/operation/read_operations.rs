use super::CollectionState;
use crate::collection::{revisions_of, Document, Revision};
use crate::filter::matches_all;
use crate::query::{QueryPlan, QueryState, TrashedVisibility};
use std::collections::HashSet;

impl CollectionState {
    /// The decrypted document with `id`, hidden when it is a tombstone and
    /// soft deletes are enabled.
    pub(crate) fn find_by_id(&mut self, id: &str) -> Option<Document> {
        let soft_deletes = self.soft_deletes;
        let visible = |doc: &Document| TrashedVisibility::Default.admits(doc, soft_deletes);

        if let Some(cached) = self.cache_get(id) {
            return visible(&cached).then_some(cached);
        }

        let position = self.position_of(id)?;
        let decrypted = self.decrypt(&self.documents[position]);
        self.cache_put(id, &decrypted);
        visible(&decrypted).then_some(decrypted)
    }

    pub(crate) fn explain(&self, state: &QueryState) -> QueryPlan {
        QueryPlan::build(
            &state.predicates,
            state.order_by.clone(),
            state.skip,
            state.limit,
            &self.indexes,
        )
    }

    /// Positions of the documents matching the visibility and predicates of
    /// `state`, in collection order. Ordering, skip and limit are not applied.
    ///
    /// Index hits are only candidates: keys are shared by loosely equal
    /// values and may collide on the `|` separator, so every predicate is
    /// evaluated again on each candidate.
    pub(crate) fn matching_positions(&self, state: &QueryState) -> Vec<usize> {
        let plan = self.explain(state);
        log::debug!("Query plan for '{}': {}", self.name, plan);

        let prefilter: Option<HashSet<&str>> = plan.index_scan().map(|scan| {
            self.indexes
                .get(scan.index_name())
                .map(|index| index.lookup(scan.key()).iter().map(String::as_str).collect())
                .unwrap_or_default()
        });

        self.documents
            .iter()
            .enumerate()
            .filter(|(_, doc)| state.visibility.admits(doc, self.soft_deletes))
            .filter(|(_, doc)| match &prefilter {
                Some(ids) => doc.id().map(|id| ids.contains(id)).unwrap_or(false),
                None => true,
            })
            .filter(|(_, doc)| matches_all(plan.predicates(), doc))
            .map(|(position, _)| position)
            .collect()
    }

    /// Runs a query and returns decrypted results.
    pub(crate) fn execute(&self, state: &QueryState) -> Vec<Document> {
        let mut matches: Vec<&Document> = self
            .matching_positions(state)
            .into_iter()
            .map(|position| &self.documents[position])
            .collect();

        if let Some((field, order)) = &state.order_by {
            self.sorter.sort(&mut matches, field, *order);
        }

        let limit = state.limit.unwrap_or(usize::MAX);
        matches
            .into_iter()
            .skip(state.skip)
            .take(limit)
            .map(|doc| self.decrypt(doc))
            .collect()
    }

    pub(crate) fn count(&self, state: &QueryState) -> usize {
        self.matching_positions(state).len()
    }

    /// Documents containing every token of `query` in a full-text field.
    pub(crate) fn full_text_search(&self, query: &str) -> Vec<Document> {
        let ids = self.full_text.search(query);
        if ids.is_empty() {
            return Vec::new();
        }

        self.documents
            .iter()
            .filter(|doc| doc.id().map(|id| ids.contains(id)).unwrap_or(false))
            .filter(|doc| TrashedVisibility::Default.admits(doc, self.soft_deletes))
            .map(|doc| self.decrypt(doc))
            .collect()
    }

    /// Revision history of a document, tombstones included.
    pub(crate) fn revisions(&self, id: &str) -> Vec<Revision> {
        self.position_of(id)
            .map(|position| revisions_of(&self.documents[position]))
            .unwrap_or_default()
    }

    /// Every visible document, decrypted.
    pub(crate) fn all(&self) -> Vec<Document> {
        self.documents
            .iter()
            .filter(|doc| TrashedVisibility::Default.admits(doc, self.soft_deletes))
            .map(|doc| self.decrypt(doc))
            .collect()
    }
}
