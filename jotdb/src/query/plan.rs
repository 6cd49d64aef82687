use crate::common::{SortOrder, Value};
use crate::filter::Predicate;
use crate::index::{IndexManager, SecondaryIndex};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Index chosen to prefilter a query.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexScan {
    index_name: String,
    key: String,
    covered: Vec<usize>,
}

impl IndexScan {
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Composite key looked up in the index.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Positions of the predicates answered by the index lookup.
    pub fn covered(&self) -> &[usize] {
        &self.covered
    }
}

/// Execution plan of a query, as reported by `explain`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    predicates: Vec<Predicate>,
    order_by: Option<(String, SortOrder)>,
    skip: usize,
    limit: Option<usize>,
    referenced_fields: BTreeSet<String>,
    index_names: Vec<String>,
    eligible_indexes: Vec<String>,
    index_scan: Option<IndexScan>,
}

impl QueryPlan {
    pub(crate) fn build(
        predicates: &[Predicate],
        order_by: Option<(String, SortOrder)>,
        skip: usize,
        limit: Option<usize>,
        indexes: &IndexManager,
    ) -> Self {
        let referenced_fields: BTreeSet<String> = predicates
            .iter()
            .flat_map(|p| p.fields())
            .map(|f| f.to_string())
            .collect();

        let eligible_indexes = indexes
            .iter()
            .filter(|(_, index)| index.fields().iter().all(|f| referenced_fields.contains(f)))
            .map(|(name, _)| name.clone())
            .collect();

        QueryPlan {
            predicates: predicates.to_vec(),
            order_by,
            skip,
            limit,
            referenced_fields,
            index_names: indexes.index_names(),
            eligible_indexes,
            index_scan: choose_index(predicates, indexes),
        }
    }

    /// The predicate list as given. Index hits are re-checked against all of
    /// them.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn order_by(&self) -> Option<&(String, SortOrder)> {
        self.order_by.as_ref()
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Every field path used by a predicate.
    pub fn referenced_fields(&self) -> &BTreeSet<String> {
        &self.referenced_fields
    }

    /// All index names of the collection.
    pub fn index_names(&self) -> &[String] {
        &self.index_names
    }

    /// Indexes whose fields are all referenced by the query.
    pub fn eligible_indexes(&self) -> &[String] {
        &self.eligible_indexes
    }

    pub fn index_scan(&self) -> Option<&IndexScan> {
        self.index_scan.as_ref()
    }

    /// Name of the index used for prefiltering, if any.
    pub fn chosen_index(&self) -> Option<&str> {
        self.index_scan.as_ref().map(|s| s.index_name())
    }
}

impl Display for QueryPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let predicates: Vec<String> = self.predicates.iter().map(|p| p.to_string()).collect();
        write!(f, "predicates: [{}]", predicates.join(", "))?;
        if let Some((field, order)) = &self.order_by {
            write!(f, ", order by: {} {:?}", field, order)?;
        }
        write!(f, ", skip: {}", self.skip)?;
        if let Some(limit) = self.limit {
            write!(f, ", limit: {}", limit)?;
        }
        match &self.index_scan {
            Some(scan) => write!(f, ", index: {} [{}]", scan.index_name, scan.key),
            None => write!(f, ", index: none"),
        }
    }
}

// Picks the index whose fields are all covered by top-level equality
// predicates with non-null values. Most fields wins, ties go to the
// lexically smaller name.
fn choose_index(predicates: &[Predicate], indexes: &IndexManager) -> Option<IndexScan> {
    let mut best: Option<(&String, &SecondaryIndex, Vec<usize>)> = None;

    for (name, index) in indexes.iter() {
        let covered = match cover(predicates, index) {
            Some(covered) => covered,
            None => continue,
        };
        let better = match &best {
            None => true,
            // names iterate in sorted order, so only strictly more fields wins
            Some((_, current, _)) => index.fields().len() > current.fields().len(),
        };
        if better {
            best = Some((name, index, covered));
        }
    }

    best.map(|(name, _, covered)| {
        let values: Vec<&Value> = covered
            .iter()
            .filter_map(|&i| predicates[i].as_indexable().map(|c| c.value()))
            .collect();
        IndexScan {
            index_name: name.clone(),
            key: SecondaryIndex::composite_key_of(&values),
            covered,
        }
    })
}

// For each index field, the position of the first indexable predicate on it.
fn cover(predicates: &[Predicate], index: &SecondaryIndex) -> Option<Vec<usize>> {
    index
        .fields()
        .iter()
        .map(|field| {
            predicates.iter().position(|p| {
                p.as_indexable()
                    .map(|c| c.field() == field)
                    .unwrap_or(false)
            })
        })
        .collect()
}
