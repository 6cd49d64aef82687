use crate::collection::{Collection, Document};
use crate::common::{SortOrder, Value};
use crate::errors::JotResult;
use crate::filter::{Condition, Predicate};
use crate::query::{Page, QueryPlan};

/// Which documents a query sees with respect to soft deletes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrashedVisibility {
    /// Tombstones are hidden while soft deletes are enabled.
    #[default]
    Default,
    /// Live documents and tombstones.
    WithTrashed,
    /// Only tombstones.
    OnlyTrashed,
}

impl TrashedVisibility {
    pub(crate) fn admits(&self, document: &Document, soft_deletes: bool) -> bool {
        match self {
            TrashedVisibility::Default => !(soft_deletes && document.is_deleted()),
            TrashedVisibility::WithTrashed => true,
            TrashedVisibility::OnlyTrashed => document.is_deleted(),
        }
    }
}

/// Options of a query, independent of the collection it runs on.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct QueryState {
    pub(crate) predicates: Vec<Predicate>,
    pub(crate) order_by: Option<(String, SortOrder)>,
    pub(crate) skip: usize,
    pub(crate) limit: Option<usize>,
    pub(crate) visibility: TrashedVisibility,
}

struct Relation<'a> {
    local_field: String,
    other: &'a Collection,
    as_field: String,
}

/// A query under construction.
///
/// Builder methods consume and return the query; a terminal method runs it.
/// Nothing is shared between two queries of the same collection.
pub struct Query<'a> {
    collection: &'a Collection,
    state: QueryState,
    relations: Vec<Relation<'a>>,
}

impl<'a> Query<'a> {
    pub(crate) fn new(collection: &'a Collection) -> Self {
        Query {
            collection,
            state: QueryState::default(),
            relations: Vec::new(),
        }
    }

    /// Adds a condition that must hold (AND).
    ///
    /// # Arguments
    ///
    /// * `field` - dot path of the field
    /// * `operator` - one of `=`, `==`, `!=`, `<>`, `>`, `>=`, `<`, `<=`, `in`, `like`
    /// * `value` - operand; an array for `in`
    pub fn where_<T: Into<Value>>(mut self, field: &str, operator: &str, value: T) -> Self {
        self.state
            .predicates
            .push(Predicate::single(Condition::new(field, operator, value)));
        self
    }

    /// Adds a condition as an alternative to the previous predicate.
    ///
    /// The previous predicate becomes an OR-group holding both conditions.
    /// Without a previous predicate this starts a new group.
    pub fn or_where<T: Into<Value>>(mut self, field: &str, operator: &str, value: T) -> Self {
        let condition = Condition::new(field, operator, value);
        match self.state.predicates.pop() {
            Some(Predicate::Single(previous)) => self
                .state
                .predicates
                .push(Predicate::any(vec![previous, condition])),
            Some(Predicate::Any(mut group)) => {
                group.push(condition);
                self.state.predicates.push(Predicate::any(group));
            }
            None => self.state.predicates.push(Predicate::any(vec![condition])),
        }
        self
    }

    /// Adds an OR-group: at least one of the conditions must hold.
    pub fn where_any<T: Into<Value>>(mut self, conditions: Vec<(&str, &str, T)>) -> Self {
        let group = conditions
            .into_iter()
            .map(|(field, operator, value)| Condition::new(field, operator, value))
            .collect();
        self.state.predicates.push(Predicate::any(group));
        self
    }

    /// Shorthand for `where_(field, "in", values)`.
    pub fn where_in<T: Into<Value>>(self, field: &str, values: Vec<T>) -> Self {
        self.where_(field, "in", values)
    }

    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.state.order_by = Some((field.to_string(), order));
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.state.skip = skip;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.state.limit = Some(limit);
        self
    }

    /// Includes soft-deleted documents.
    pub fn with_trashed(mut self) -> Self {
        self.state.visibility = TrashedVisibility::WithTrashed;
        self
    }

    /// Returns soft-deleted documents only.
    pub fn only_trashed(mut self) -> Self {
        self.state.visibility = TrashedVisibility::OnlyTrashed;
        self
    }

    /// Attaches a related document to each result.
    ///
    /// After the query runs, every result gets `as_field` set to the document
    /// of `other` whose `_id` equals the result's `local_field`, or null.
    pub fn with_related(mut self, local_field: &str, other: &'a Collection, as_field: &str) -> Self {
        self.relations.push(Relation {
            local_field: local_field.to_string(),
            other,
            as_field: as_field.to_string(),
        });
        self
    }

    /// Runs the query.
    pub fn get(self) -> JotResult<Vec<Document>> {
        let results = self.collection.execute_query(&self.state)?;
        self.attach_related(results)
    }

    /// The first result, honoring skip and ordering.
    pub fn first(mut self) -> JotResult<Option<Document>> {
        self.state.limit = Some(1);
        Ok(self.get()?.into_iter().next())
    }

    /// Number of matching documents. Skip and limit are ignored.
    pub fn count(self) -> JotResult<usize> {
        self.collection.count_query(&self.state)
    }

    pub fn exists(self) -> JotResult<bool> {
        Ok(self.count()? > 0)
    }

    /// The value of `field` for each result, null when missing.
    pub fn pluck(self, field: &str) -> JotResult<Vec<Value>> {
        Ok(self.get()?.iter().map(|doc| doc.get_or_null(field)).collect())
    }

    /// Deep merges `patch` into every matching document.
    ///
    /// Order, skip and limit are ignored. The batch is applied only if every
    /// merged document passes validation.
    ///
    /// # Returns
    ///
    /// The number of documents updated.
    pub fn update(self, patch: Document) -> JotResult<usize> {
        self.collection.update_query(&self.state, &patch)
    }

    /// Returns page `page` of `per_page` results. Both are clamped to 1.
    pub fn paginate(mut self, page: usize, per_page: usize) -> JotResult<Page> {
        let page = page.max(1);
        let per_page = per_page.max(1);

        let total = self.collection.count_query(&self.state)?;
        self.state.limit = Some(per_page);
        self.state.skip = (page - 1) * per_page;
        let data = self.get()?;
        Ok(Page::new(data, total, page, per_page))
    }

    /// The execution plan without running the query.
    pub fn explain(&self) -> QueryPlan {
        self.collection.explain_query(&self.state)
    }

    fn attach_related(&self, mut results: Vec<Document>) -> JotResult<Vec<Document>> {
        for relation in &self.relations {
            for document in results.iter_mut() {
                let related = match document.get(&relation.local_field) {
                    Some(Value::String(id)) => relation.other.find_by_id(id)?,
                    Some(value) if !value.is_null() && !value.is_string() => {
                        relation.other.find_by_id(&value.to_key_string())?
                    }
                    _ => None,
                };
                document.put(&relation.as_field, Value::from(related))?;
            }
        }
        Ok(results)
    }
}
