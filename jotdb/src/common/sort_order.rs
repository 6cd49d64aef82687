/// Specifies the direction for sorting documents.
///
/// Used by [`crate::query::Query::order_by`]. Null and missing values sort
/// after every other value in ascending order and before them in descending
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort from smallest to largest value
    Ascending,
    /// Sort from largest to smallest value
    Descending,
}
