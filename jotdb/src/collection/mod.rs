//! Collections and documents.
//!
//! # Documents
//!
//! A [Document] is an insertion-ordered map of field names to values, with
//! dot-path access into nested documents and arrays.
//!
//! ```rust,ignore
//! use jotdb::collection::Document;
//!
//! let mut doc = Document::new();
//! doc.put("name", "Alice")?;
//! doc.put("address.city", "New York")?;
//! ```
//!
//! # Collections
//!
//! A [Collection] stores documents in order and supports:
//! - insert, update, delete (soft or hard), restore
//! - fluent queries with index-assisted equality lookups
//! - full-text search over declared fields
//! - single-writer transactions with rollback
//! - change listeners
//!
//! ```rust,ignore
//! let users = CollectionBuilder::new().name("users").storage_dir("./data").open()?;
//! let alice = users.insert(doc! { name: "Alice", age: 30 })?;
//! let adults = users.query().where_("age", ">=", 18).get()?;
//! ```
//!
//! # Reserved Fields
//!
//! The following fields are maintained by the collection:
//! - `_id` - unique string id, generated when absent
//! - `_created` / `_updated` - ISO-8601 timestamps
//! - `_deleted` - soft-delete tombstone marker
//! - `_revisions` - revision history

mod collection;
mod document;
mod event;
pub(crate) mod operation;
mod revision;
mod validator;

pub use collection::*;
pub use document::*;
pub use event::*;
pub use revision::*;
pub use validator::*;
