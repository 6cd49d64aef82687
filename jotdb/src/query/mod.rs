//! Fluent queries over a collection.
//!
//! A [Query] is created per call chain from a collection, accumulates
//! predicates and options, and is consumed by one terminal call:
//!
//! ```rust,ignore
//! let adults = collection
//!     .query()
//!     .where_("age", ">=", 18)
//!     .or_where("guardian", "!=", Value::Null)
//!     .order_by("name", SortOrder::Ascending)
//!     .limit(10)
//!     .get()?;
//! ```
//!
//! Execution order is fixed: visibility filtering, index prefiltering,
//! predicate evaluation, ordering, skip, limit and finally decryption.

mod page;
mod plan;
mod query;
mod sort;

pub use page::*;
pub use plan::*;
pub use query::*;
pub(crate) use sort::*;
