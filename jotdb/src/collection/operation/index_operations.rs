use super::CollectionState;
use crate::errors::{ErrorKind, JotError, JotResult};

impl CollectionState {
    /// Builds, or rebuilds, a secondary index and persists the index file.
    pub(crate) fn create_index(&mut self, fields: Vec<String>, name: Option<&str>) -> JotResult<String> {
        let name = self.indexes.create_index(fields, name, self.documents.iter())?;
        self.persist_indexes()?;
        log::info!("Created index '{}' on collection '{}'", name, self.name);
        Ok(name)
    }

    pub(crate) fn drop_index(&mut self, name: &str) -> JotResult<bool> {
        if !self.indexes.drop_index(name) {
            return Ok(false);
        }
        self.persist_indexes()?;
        log::info!("Dropped index '{}' from collection '{}'", name, self.name);
        Ok(true)
    }

    /// Declares the full-text fields and rebuilds the token map from scratch.
    pub(crate) fn create_full_text_index(&mut self, fields: Vec<String>) -> JotResult<()> {
        if fields.is_empty() || fields.iter().any(|f| f.trim().is_empty()) {
            log::error!("Cannot create a full-text index without fields: {:?}", fields);
            return Err(JotError::new(
                "Full-text index requires at least one non-empty field",
                ErrorKind::IndexingError,
            ));
        }

        self.full_text.reset(fields, self.documents.iter());
        self.persist_full_text()?;
        log::info!(
            "Built full-text index of '{}' with {} tokens",
            self.name,
            self.full_text.token_count()
        );
        Ok(())
    }
}
