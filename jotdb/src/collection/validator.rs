use crate::collection::Document;
use crate::errors::{ErrorKind, JotError, JotResult};
use std::fmt::Debug;
use std::sync::Arc;

/// Signature of document validators.
///
/// A validator inspects the decrypted document about to be written and returns
/// `Err(reason)` to reject it.
pub trait ValidatorCallback: Send + Sync + Fn(&Document) -> Result<(), String> {}

impl<F> ValidatorCallback for F where F: Send + Sync + Fn(&Document) -> Result<(), String> {}

/// A registered document validator.
#[derive(Clone)]
pub struct DocumentValidator {
    validate: Arc<dyn ValidatorCallback>,
}

impl DocumentValidator {
    pub fn new(validate: impl ValidatorCallback + 'static) -> Self {
        DocumentValidator {
            validate: Arc::new(validate),
        }
    }

    /// Runs the validator, mapping a rejection to a `ValidationError`.
    pub fn validate(&self, document: &Document) -> JotResult<()> {
        (self.validate)(document).map_err(|reason| {
            log::error!("Document rejected by validator: {}", reason);
            JotError::new(
                &format!("Validation failed: {}", reason),
                ErrorKind::ValidationError,
            )
        })
    }
}

impl Debug for DocumentValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentValidator").finish()
    }
}

/// Runs every validator in registration order, stopping at the first rejection.
pub(crate) fn validate_all(validators: &[DocumentValidator], document: &Document) -> JotResult<()> {
    validators.iter().try_for_each(|v| v.validate(document))
}
