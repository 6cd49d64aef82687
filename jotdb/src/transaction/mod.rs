//! Single-writer transactions.
//!
//! A collection has at most one active transaction. While it is active,
//! mutations are applied in memory and recorded in a log, but nothing is
//! persisted and no listener is notified. `commit` persists the whole state
//! and replays the log as events; `rollback` restores the snapshot taken at
//! `begin_transaction`.

pub mod core;

pub use self::core::{ChangeType, MutationRecord, Snapshot, Transaction};
