use crate::collection::Document;
use crate::common::{Value, ENCRYPTED_PREFIX, KEY_SALT_PREFIX};
use crate::errors::{ErrorKind, JotError, JotResult};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::Argon2;
use base64::{engine::general_purpose, Engine as _};
use rand::{rngs::OsRng, RngCore};
use std::sync::Arc;

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Field level encryption for configured document fields.
///
/// The 256-bit key is derived from a passphrase with Argon2, salted with the
/// collection name. Each value is encrypted with AES-256-GCM under a fresh
/// random nonce and stored as `"enc:" + base64(nonce || ciphertext)`, where the
/// plaintext is the JSON encoding of the original value.
#[derive(Clone)]
pub(crate) struct FieldCipher {
    inner: Arc<FieldCipherInner>,
}

struct FieldCipherInner {
    cipher: Aes256Gcm,
    fields: Vec<String>,
}

impl FieldCipher {
    /// Derives the key and prepares a cipher for `fields`.
    pub(crate) fn new(passphrase: &str, collection_name: &str, fields: Vec<String>) -> JotResult<Self> {
        let salt = format!("{}{}", KEY_SALT_PREFIX, collection_name);
        let mut key = [0u8; KEY_LEN];
        Argon2::default()
            .hash_password_into(passphrase.as_bytes(), salt.as_bytes(), &mut key)
            .map_err(|e| {
                log::error!("Failed to derive field encryption key: {}", e);
                JotError::new(
                    &format!("Failed to derive field encryption key: {}", e),
                    ErrorKind::EncryptionError,
                )
            })?;

        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|e| {
            log::error!("Invalid field encryption key: {}", e);
            JotError::new("Invalid field encryption key", ErrorKind::EncryptionError)
        })?;

        Ok(FieldCipher {
            inner: Arc::new(FieldCipherInner { cipher, fields }),
        })
    }

    pub(crate) fn fields(&self) -> &[String] {
        &self.inner.fields
    }

    /// Whether the stored value has the encrypted representation.
    pub(crate) fn is_encrypted(value: &Value) -> bool {
        value.as_str().map(|s| s.starts_with(ENCRYPTED_PREFIX)).unwrap_or(false)
    }

    /// Encrypts a single value.
    pub(crate) fn encrypt_value(&self, value: &Value) -> JotResult<Value> {
        let plaintext = serde_json::to_vec(value)?;

        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .inner
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_ref())
            .map_err(|e| {
                log::error!("Failed to encrypt field value: {}", e);
                JotError::new("Failed to encrypt field value", ErrorKind::EncryptionError)
            })?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);
        Ok(Value::String(format!(
            "{}{}",
            ENCRYPTED_PREFIX,
            general_purpose::STANDARD.encode(payload)
        )))
    }

    /// Decrypts a single value. Values without the encrypted prefix are
    /// returned unchanged.
    pub(crate) fn decrypt_value(&self, value: &Value) -> JotResult<Value> {
        let encoded = match value.as_str().and_then(|s| s.strip_prefix(ENCRYPTED_PREFIX)) {
            Some(encoded) => encoded,
            None => return Ok(value.clone()),
        };

        let payload = general_purpose::STANDARD.decode(encoded).map_err(|e| {
            log::error!("Encrypted field is not valid base64: {}", e);
            JotError::new("Encrypted field is not valid base64", ErrorKind::DecryptionError)
        })?;
        if payload.len() < NONCE_LEN {
            log::error!("Encrypted field payload is too short");
            return Err(JotError::new(
                "Encrypted field payload is too short",
                ErrorKind::DecryptionError,
            ));
        }

        let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
        let plaintext = self
            .inner
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| {
                log::error!("Failed to decrypt field value: {}", e);
                JotError::new("Failed to decrypt field value", ErrorKind::DecryptionError)
            })?;

        serde_json::from_slice(&plaintext).map_err(|e| {
            log::error!("Decrypted field is not valid JSON: {}", e);
            JotError::new("Decrypted field is not valid JSON", ErrorKind::DecryptionError)
        })
    }

    /// Returns a copy of `document` with every configured, non-null field
    /// encrypted.
    pub(crate) fn encrypt_document(&self, document: &Document) -> JotResult<Document> {
        self.encrypt_document_except(document, &[])
    }

    /// Like [encrypt_document](Self::encrypt_document), but the fields in
    /// `stored_fields` already hold their stored form and are copied as-is.
    pub(crate) fn encrypt_document_except(
        &self,
        document: &Document,
        stored_fields: &[String],
    ) -> JotResult<Document> {
        let mut encrypted = document.clone();
        for field in self.fields() {
            if stored_fields.contains(field) {
                continue;
            }
            if let Some(value) = document.get(field) {
                if value.is_null() {
                    continue;
                }
                encrypted.put(field, self.encrypt_value(value)?)?;
            }
        }
        Ok(encrypted)
    }

    /// Returns a copy of `document` with configured fields decrypted.
    ///
    /// A field that fails to decrypt is logged and left as stored.
    pub(crate) fn decrypt_document(&self, document: &Document) -> Document {
        self.decrypt_document_reporting(document).0
    }

    /// Decrypts like [decrypt_document](Self::decrypt_document) and also
    /// returns the fields that were left as stored because they failed to
    /// decrypt.
    pub(crate) fn decrypt_document_reporting(&self, document: &Document) -> (Document, Vec<String>) {
        let mut decrypted = document.clone();
        let mut failed = Vec::new();
        for field in self.fields() {
            let value = match document.get(field) {
                Some(value) if Self::is_encrypted(value) => value,
                _ => continue,
            };
            let result = self
                .decrypt_value(value)
                .and_then(|plain| decrypted.put(field, plain));
            if let Err(e) = result {
                log::warn!("Leaving field '{}' encrypted: {}", field, e);
                failed.push(field.clone());
            }
        }
        (decrypted, failed)
    }
}
