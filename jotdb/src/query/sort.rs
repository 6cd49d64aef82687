use crate::collection::Document;
use crate::common::{SortOrder, Value};
use crate::errors::{ErrorKind, JotError, JotResult};
use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use std::cmp::Ordering;

/// Stable sort of documents by one field.
///
/// Strings compare with the ICU root collation, numbers numerically and
/// values of different types by type rank. Null and missing values sort last
/// in ascending order; descending order is the exact reverse.
pub(crate) struct DocumentSorter {
    collator: CollatorBorrowed<'static>,
}

impl DocumentSorter {
    pub(crate) fn new() -> JotResult<Self> {
        let collator = Collator::try_new(CollatorPreferences::default(), CollatorOptions::default())
            .map_err(|e| {
                log::error!("Failed to create collator for sorting: {:?}", e);
                JotError::new(
                    "Failed to create collator for sorting",
                    ErrorKind::InternalError,
                )
            })?;
        Ok(DocumentSorter { collator })
    }

    pub(crate) fn sort(&self, documents: &mut [&Document], field: &str, order: SortOrder) {
        documents.sort_by(|a, b| {
            let ordering = self.compare(a.get(field), b.get(field));
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
    }

    fn compare(&self, a: Option<&Value>, b: Option<&Value>) -> Ordering {
        let a = a.filter(|v| !v.is_null());
        let b = b.filter(|v| !v.is_null());
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => self.compare_values(a, b),
        }
    }

    fn compare_values(&self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::String(x), Value::String(y)) => self.collator.compare(x, y),
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            _ if a.is_number() && b.is_number() => a.compare(b).unwrap_or(Ordering::Equal),
            _ if a.type_rank() != b.type_rank() => a.type_rank().cmp(&b.type_rank()),
            _ => a.to_canonical_json().cmp(&b.to_canonical_json()),
        }
    }
}
