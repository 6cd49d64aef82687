use crate::collection::Document;
use crate::common::{DOCUMENTS_SUFFIX, FULL_TEXT_SUFFIX, INDEXES_SUFFIX, TEMP_SUFFIX};
use crate::errors::{ErrorKind, JotError, JotResult};
use crate::index::{IndexManager, PersistedTextIndex};
use crate::store::StorageProvider;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// JSON file storage backend.
///
/// Files live in one directory, named after the collection. Saves go through
/// a temporary sibling file that is synced and then renamed over the target.
#[derive(Clone)]
pub struct FileStorage {
    inner: Arc<FileStorageInner>,
}

struct FileStorageInner {
    documents_path: PathBuf,
    indexes_path: PathBuf,
    full_text_path: PathBuf,
}

impl FileStorage {
    /// Creates a storage for collection `name` in `dir`, creating the
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// `StorageWriteError` if the directory cannot be created.
    pub fn new(dir: impl AsRef<Path>, name: &str) -> JotResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| {
            log::error!("Failed to create storage directory {}: {}", dir.display(), e);
            JotError::new(
                &format!("Failed to create storage directory {}: {}", dir.display(), e),
                ErrorKind::StorageWriteError,
            )
        })?;

        Ok(FileStorage {
            inner: Arc::new(FileStorageInner {
                documents_path: dir.join(format!("{}{}", name, DOCUMENTS_SUFFIX)),
                indexes_path: dir.join(format!("{}{}", name, INDEXES_SUFFIX)),
                full_text_path: dir.join(format!("{}{}", name, FULL_TEXT_SUFFIX)),
            }),
        })
    }

    pub fn documents_path(&self) -> &Path {
        &self.inner.documents_path
    }

    pub fn indexes_path(&self) -> &Path {
        &self.inner.indexes_path
    }

    pub fn full_text_path(&self) -> &Path {
        &self.inner.full_text_path
    }
}

impl StorageProvider for FileStorage {
    fn load_documents(&self) -> JotResult<Vec<Document>> {
        read_json(&self.inner.documents_path)
    }

    fn save_documents(&self, documents: &[Document]) -> JotResult<()> {
        write_json_atomic(&self.inner.documents_path, documents)
    }

    fn load_indexes(&self) -> JotResult<IndexManager> {
        read_json(&self.inner.indexes_path)
    }

    fn save_indexes(&self, indexes: &IndexManager) -> JotResult<()> {
        write_json_atomic(&self.inner.indexes_path, indexes)
    }

    fn load_full_text(&self) -> JotResult<PersistedTextIndex> {
        read_json(&self.inner.full_text_path)
    }

    fn save_full_text(&self, full_text: &PersistedTextIndex) -> JotResult<()> {
        write_json_atomic(&self.inner.full_text_path, full_text)
    }

    fn is_durable(&self) -> bool {
        true
    }
}

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> JotResult<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            log::error!("Failed to read {}: {}", path.display(), e);
            return Err(JotError::new(
                &format!("Failed to read {}: {}", path.display(), e),
                ErrorKind::StorageReadError,
            ));
        }
    };

    serde_json::from_str(&content).map_err(|e| {
        log::error!("Malformed JSON in {}: {}", path.display(), e);
        JotError::new_with_cause(
            &format!("Malformed JSON in {}", path.display()),
            ErrorKind::StorageReadError,
            e.into(),
        )
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}

fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> JotResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp_path = temp_path(path);

    let result = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    result.map_err(|e| {
        log::error!("Failed to write {}: {}", path.display(), e);
        let _ = fs::remove_file(&tmp_path);
        JotError::new(
            &format!("Failed to write {}: {}", path.display(), e),
            ErrorKind::StorageWriteError,
        )
    })
}
