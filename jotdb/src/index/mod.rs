//! Secondary and full-text indexes.
//!
//! # Index Types
//!
//! - **Secondary Index**: equality index over one field or several fields
//!   (composite). Maps the composite key of a document to the ids of the
//!   documents carrying it.
//! - **Full-Text Index**: inverted index from lowercase word tokens of the
//!   declared text fields to the ids of the documents containing them.
//!
//! # Creating Indexes
//!
//! ```rust,ignore
//! let collection = CollectionBuilder::new().name("users").open()?;
//! collection.create_index(vec!["email"], None)?;
//! collection.create_index(vec!["last_name", "first_name"], Some("by_name"))?;
//! collection.create_full_text_index(vec!["bio"])?;
//! ```
//!
//! Indexes are kept current on every insert, update and delete, and are
//! consulted automatically by queries whose equality predicates cover all the
//! fields of an index.

mod index_manager;
mod secondary_index;
pub mod text;
mod text_index;

pub use index_manager::*;
pub use secondary_index::*;
pub use text_index::*;
