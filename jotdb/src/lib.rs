//! # jotdb - Embedded Document Store
//!
//! jotdb is a small embedded, file-backed document store for a single
//! collection of schemaless documents.
//!
//! ## Key Features
//!
//! - **Embedded**: no server, the collection lives in your process
//! - **Queries**: fluent query builder with AND/OR predicates, ordering and pagination
//! - **Indexing**: single and composite equality indexes used automatically by queries
//! - **Full-text search**: inverted index over declared text fields
//! - **Soft deletes**: tombstones with restore and revision history
//! - **Transactions**: single-writer transactions with snapshot rollback
//! - **Field encryption**: AES-256-GCM for configured fields
//! - **Events**: synchronous change listeners
//!
//! ## Quick Start
//!
//! ```rust
//! use jotdb::{doc, CollectionBuilder};
//! use jotdb::common::SortOrder;
//!
//! # fn main() -> Result<(), jotdb::errors::JotError> {
//! let books = CollectionBuilder::new().name("books").open()?;
//!
//! books.insert(doc! { title: "Dune", year: 1965 })?;
//! books.insert(doc! { title: "Neuromancer", year: 1984 })?;
//! books.create_index(vec!["year"], None)?;
//!
//! let recent = books
//!     .query()
//!     .where_("year", ">", 1970)
//!     .order_by("title", SortOrder::Ascending)
//!     .get()?;
//! assert_eq!(recent.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Persistence
//!
//! With [CollectionBuilder::storage_dir] the collection is stored as three
//! JSON files (`N.json`, `N.indexes.json`, `N.fts.json`), each replaced
//! atomically on save. Without it the collection lives in memory.

pub mod collection;
pub mod common;
pub mod errors;
pub mod filter;
pub mod index;
pub mod jot_builder;
pub mod jot_config;
pub mod query;
pub mod store;
pub mod transaction;

pub use collection::{Collection, Document};
pub use jot_builder::CollectionBuilder;
pub use jot_config::CollectionConfig;
