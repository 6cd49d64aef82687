use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Error kinds for jotdb operations.
///
/// Each kind names one failure category so callers can branch on
/// [`JotError::kind`] instead of matching on message text.
///
/// # Examples
///
/// ```rust
/// use jotdb::errors::{ErrorKind, JotError, JotResult};
///
/// fn example() -> JotResult<()> {
///     Err(JotError::new("no transaction is active", ErrorKind::TransactionStateError))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::TransactionStateError);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Write path errors
    /// A registered validator rejected a document
    ValidationError,
    /// A mutation conflicts with the active scoped transaction
    TransactionLockError,
    /// Commit/rollback without an active transaction, or a nested begin
    TransactionStateError,

    // Identity errors
    /// The `_id` of a document is not a string or is empty
    InvalidId,
    /// A document with the same `_id` already exists
    DuplicateId,

    // Indexing errors
    /// Index definition or maintenance failed
    IndexingError,

    // Storage errors
    /// Loading a persisted file failed for a reason other than "not found"
    StorageReadError,
    /// Writing or renaming a persisted file failed
    StorageWriteError,

    // Security errors
    /// A field value could not be decrypted
    DecryptionError,
    /// A field value could not be encrypted or the key could not be derived
    EncryptionError,

    // Generic errors
    /// Serialization or deserialization of a value failed
    EncodingError,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::TransactionLockError => write!(f, "Transaction lock error"),
            ErrorKind::TransactionStateError => write!(f, "Transaction state error"),
            ErrorKind::InvalidId => write!(f, "Invalid ID"),
            ErrorKind::DuplicateId => write!(f, "Duplicate ID"),
            ErrorKind::IndexingError => write!(f, "Indexing error"),
            ErrorKind::StorageReadError => write!(f, "Storage read error"),
            ErrorKind::StorageWriteError => write!(f, "Storage write error"),
            ErrorKind::DecryptionError => write!(f, "Decryption error"),
            ErrorKind::EncryptionError => write!(f, "Encryption error"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type of every fallible jotdb operation.
///
/// `JotError` carries a message, an [`ErrorKind`], an optional cause and the
/// backtrace captured at construction time. The backtrace is only printed by
/// the `Debug` representation.
///
/// # Examples
///
/// ```rust
/// use jotdb::errors::{ErrorKind, JotError};
///
/// let cause = JotError::new("disk full", ErrorKind::StorageWriteError);
/// let err = JotError::new_with_cause("failed to persist", ErrorKind::StorageWriteError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct JotError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<JotError>>,
    backtrace: Arc<Backtrace>,
}

impl JotError {
    /// Creates a new `JotError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        JotError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `JotError` that wraps `cause`.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: JotError) -> Self {
        JotError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&JotError> {
        self.cause.as_deref()
    }
}

impl Display for JotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for JotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{} ({})\nCaused by: {:?}", self.message, self.error_kind, cause),
            None => write!(f, "{} ({})\n{:?}", self.message, self.error_kind, self.backtrace),
        }
    }
}

impl Error for JotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// `JotResult<T>` is shorthand for `Result<T, JotError>`.
pub type JotResult<T> = Result<T, JotError>;

impl From<serde_json::Error> for JotError {
    fn from(err: serde_json::Error) -> Self {
        JotError::new(&format!("JSON encoding error: {}", err), ErrorKind::EncodingError)
    }
}

impl From<std::io::Error> for JotError {
    fn from(err: std::io::Error) -> Self {
        JotError::new(&format!("I/O error: {}", err), ErrorKind::StorageWriteError)
    }
}

impl From<std::string::FromUtf8Error> for JotError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        JotError::new(
            &format!("UTF-8 encoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}
