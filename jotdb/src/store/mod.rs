//! Storage backends.
//!
//! A collection persists three logical files per collection name `N`:
//!
//! - `N.json`: the documents, as a pretty-printed JSON array
//! - `N.indexes.json`: the secondary indexes
//! - `N.fts.json`: the full-text token map
//!
//! [FileStorage](file::FileStorage) writes each file to a sibling `.tmp` path,
//! syncs it and renames it over the target, so a reader never sees a partly
//! written file. [MemoryStorage](memory::MemoryStorage) keeps the last saved
//! state in memory and is used when no storage directory is configured.

pub mod file;
pub mod memory;
mod storage;

pub use storage::*;
