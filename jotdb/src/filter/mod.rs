//! Predicates for selecting documents.
//!
//! A query holds an ordered list of [Predicate]s that are combined with AND.
//! Each predicate is either a single [Condition] (`field operator value`) or an
//! OR-group of conditions, of which at least one must hold.
//!
//! # Supported Operators
//!
//! - **Equality**: `=`, `==` (loose), `!=`, `<>`
//! - **Comparison**: `>`, `>=`, `<`, `<=`
//! - **Membership**: `in`
//! - **Pattern**: `like` (case-insensitive substring, `%` at either end ignored)
//!
//! Unknown operators never match.
//!
//! # Examples
//!
//! ```rust
//! use jotdb::doc;
//! use jotdb::filter::{Condition, Predicate};
//!
//! let adult = Predicate::single(Condition::new("age", ">=", 18));
//! let named = Predicate::any(vec![
//!     Condition::new("name", "like", "%ann%"),
//!     Condition::new("name", "=", "Bob"),
//! ]);
//!
//! let doc = doc! { name: "Joanna", age: 30 };
//! assert!(adult.matches(&doc) && named.matches(&doc));
//! ```

mod operator;
mod predicate;

pub use operator::*;
pub use predicate::*;
