use crate::collection::{Collection, ValidatorCallback};
use crate::errors::{JotError, JotResult};
use crate::jot_config::CollectionConfig;
use crate::store::StorageProvider;
use std::path::PathBuf;

/// Fluent builder for opening a [Collection].
///
/// The first invalid setting is remembered and returned by [open](Self::open);
/// later settings are ignored once an error has been captured.
///
/// # Examples
///
/// ```rust
/// use jotdb::{doc, CollectionBuilder};
///
/// let dir = tempfile::tempdir().unwrap();
/// let users = CollectionBuilder::new()
///     .name("users")
///     .storage_dir(dir.path())
///     .soft_deletes(true)
///     .full_text_fields(vec!["bio"])
///     .open()
///     .unwrap();
///
/// users.insert(doc! { name: "Ann", bio: "Rust developer" }).unwrap();
/// assert_eq!(users.full_text_search("rust").unwrap().len(), 1);
/// ```
#[derive(Default)]
pub struct CollectionBuilder {
    error: Option<JotError>,
    config: CollectionConfig,
}

impl CollectionBuilder {
    pub fn new() -> Self {
        CollectionBuilder {
            error: None,
            config: CollectionConfig::new(),
        }
    }

    /// Collection name, default `"documents"`.
    pub fn name(mut self, name: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_name(name) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Directory of the storage files. Without it the collection lives in
    /// memory only.
    pub fn storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_storage_dir(dir) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Uses a custom storage backend instead of the storage directory.
    pub fn storage<T: StorageProvider + 'static>(mut self, storage: T) -> Self {
        self.config.set_storage(storage);
        self
    }

    pub fn soft_deletes(mut self, enabled: bool) -> Self {
        self.config.set_soft_deletes(enabled);
        self
    }

    /// Fields stored encrypted. Requires [encryption_key](Self::encryption_key).
    pub fn encrypted_fields(mut self, fields: Vec<&str>) -> Self {
        if self.error.is_none() {
            let fields = fields.into_iter().map(String::from).collect();
            if let Err(e) = self.config.set_encrypted_fields(fields) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Passphrase the field encryption key is derived from.
    pub fn encryption_key(mut self, passphrase: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_encryption_key(passphrase) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Fields indexed for full-text search.
    pub fn full_text_fields(mut self, fields: Vec<&str>) -> Self {
        if self.error.is_none() {
            let fields = fields.into_iter().map(String::from).collect();
            if let Err(e) = self.config.set_full_text_fields(fields) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Read cache capacity, default 256. 0 disables the cache.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.set_cache_capacity(capacity);
        self
    }

    pub fn validator(mut self, validator: impl ValidatorCallback + 'static) -> Self {
        self.config.add_validator(validator);
        self
    }

    /// Opens the collection, loading any persisted state.
    pub fn open(self) -> JotResult<Collection> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.config.validate()?;
        Collection::open(self.config)
    }
}
