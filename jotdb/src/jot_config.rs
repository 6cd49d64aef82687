//! Configuration of a jotdb collection.

use crate::collection::{DocumentValidator, ValidatorCallback};
use crate::common::{DEFAULT_CACHE_CAPACITY, DEFAULT_COLLECTION_NAME};
use crate::errors::{ErrorKind, JotError, JotResult};
use crate::store::{Storage, StorageProvider};
use std::path::{Path, PathBuf};

/// Settings used to open a [Collection](crate::collection::Collection).
///
/// Usually assembled through [CollectionBuilder](crate::CollectionBuilder),
/// which validates every value as it is set.
#[derive(Clone)]
pub struct CollectionConfig {
    name: String,
    storage_dir: Option<PathBuf>,
    storage: Option<Storage>,
    soft_deletes: bool,
    encrypted_fields: Vec<String>,
    encryption_key: Option<String>,
    full_text_fields: Vec<String>,
    cache_capacity: usize,
    validators: Vec<DocumentValidator>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionConfig {
    pub fn new() -> Self {
        CollectionConfig {
            name: DEFAULT_COLLECTION_NAME.to_string(),
            storage_dir: None,
            storage: None,
            soft_deletes: false,
            encrypted_fields: Vec::new(),
            encryption_key: None,
            full_text_fields: Vec::new(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            validators: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the collection name, which also names the storage files.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` if the name is empty or contains a path separator.
    pub fn set_name(&mut self, name: &str) -> JotResult<()> {
        let name = name.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            log::error!("Invalid collection name '{}'", name);
            return Err(JotError::new(
                &format!("Invalid collection name '{}'", name),
                ErrorKind::InvalidOperation,
            ));
        }
        self.name = name.to_string();
        Ok(())
    }

    pub fn storage_dir(&self) -> Option<&Path> {
        self.storage_dir.as_deref()
    }

    pub fn set_storage_dir(&mut self, dir: impl Into<PathBuf>) -> JotResult<()> {
        let dir = dir.into();
        if dir.as_os_str().is_empty() {
            log::error!("Storage directory must not be empty");
            return Err(JotError::new(
                "Storage directory must not be empty",
                ErrorKind::InvalidOperation,
            ));
        }
        self.storage_dir = Some(dir);
        Ok(())
    }

    /// A custom storage backend, taking precedence over the storage directory.
    pub fn storage(&self) -> Option<&Storage> {
        self.storage.as_ref()
    }

    pub fn set_storage<T: StorageProvider + 'static>(&mut self, storage: T) {
        self.storage = Some(Storage::new(storage));
    }

    pub fn soft_deletes(&self) -> bool {
        self.soft_deletes
    }

    pub fn set_soft_deletes(&mut self, enabled: bool) {
        self.soft_deletes = enabled;
    }

    pub fn encrypted_fields(&self) -> &[String] {
        &self.encrypted_fields
    }

    pub fn set_encrypted_fields(&mut self, fields: Vec<String>) -> JotResult<()> {
        validate_fields("encrypted", &fields)?;
        self.encrypted_fields = fields;
        Ok(())
    }

    pub fn encryption_key(&self) -> Option<&str> {
        self.encryption_key.as_deref()
    }

    pub fn set_encryption_key(&mut self, passphrase: &str) -> JotResult<()> {
        if passphrase.is_empty() {
            log::error!("Encryption key must not be empty");
            return Err(JotError::new(
                "Encryption key must not be empty",
                ErrorKind::EncryptionError,
            ));
        }
        self.encryption_key = Some(passphrase.to_string());
        Ok(())
    }

    pub fn full_text_fields(&self) -> &[String] {
        &self.full_text_fields
    }

    pub fn set_full_text_fields(&mut self, fields: Vec<String>) -> JotResult<()> {
        validate_fields("full-text", &fields)?;
        self.full_text_fields = fields;
        Ok(())
    }

    /// Capacity of the read cache; 0 disables it.
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    pub fn set_cache_capacity(&mut self, capacity: usize) {
        self.cache_capacity = capacity;
    }

    pub fn validators(&self) -> &[DocumentValidator] {
        &self.validators
    }

    pub fn add_validator(&mut self, validator: impl ValidatorCallback + 'static) {
        self.validators.push(DocumentValidator::new(validator));
    }

    /// Checks settings that depend on each other.
    pub(crate) fn validate(&self) -> JotResult<()> {
        if !self.encrypted_fields.is_empty() && self.encryption_key.is_none() {
            log::error!("Encrypted fields configured without an encryption key");
            return Err(JotError::new(
                "Encrypted fields require an encryption key",
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }
}

fn validate_fields(kind: &str, fields: &[String]) -> JotResult<()> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        log::error!("Empty field name in {} fields: {:?}", kind, fields);
        return Err(JotError::new(
            &format!("Empty field name in {} fields", kind),
            ErrorKind::InvalidOperation,
        ));
    }
    Ok(())
}
