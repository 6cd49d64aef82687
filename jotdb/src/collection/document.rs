use crate::common::{Value, DOC_DELETED, DOC_ID, FIELD_SEPARATOR};
use crate::errors::{ErrorKind, JotError, JotResult};
use indexmap::IndexMap;
use std::fmt::{Debug, Display};

/// A document stored in a jotdb collection.
///
/// A document is an insertion-ordered map of field names to [Value]s. Fields
/// of nested documents are addressed with dot paths (`"address.city"`) and
/// array elements with numeric segments (`"tags.0"`).
///
/// The following fields are reserved and maintained by the collection:
///
/// * `_id` - unique string identifier, generated on insert when absent.
/// * `_created` / `_updated` - ISO-8601 timestamps.
/// * `_deleted` - tombstone marker written by soft deletes.
/// * `_revisions` - append-only revision history.
///
/// # Examples
///
/// ```rust
/// use jotdb::doc;
/// use jotdb::common::Value;
///
/// let mut doc = doc! { name: "Alice", address: { city: "Oslo" } };
/// doc.put("address.zip", "0150").unwrap();
///
/// assert_eq!(doc.get("address.city"), Some(&Value::from("Oslo")));
/// assert_eq!(doc.get("address.zip"), Some(&Value::from("0150")));
/// assert_eq!(doc.get("missing"), None);
/// ```
#[derive(Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of top level entries.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates `value` with `key`, creating intermediate documents for
    /// dot-path keys.
    ///
    /// # Errors
    ///
    /// * `InvalidOperation` if the key or one of its path segments is empty.
    /// * `InvalidId` if the key is `_id` and the value is not a non-empty string.
    pub fn put<T: Into<Value>>(&mut self, key: &str, value: T) -> JotResult<()> {
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(JotError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        let value = value.into();
        if key == DOC_ID {
            validate_id(&value)?;
        }

        if key.contains(FIELD_SEPARATOR) {
            let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
            self.deep_put(&splits, value)
        } else {
            self.data.insert(key.to_string(), value);
            Ok(())
        }
    }

    /// Returns the value at `key`, resolving dot paths through nested
    /// documents and arrays. A missing path yields `None`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.data.get(key) {
            return Some(value);
        }
        if !key.contains(FIELD_SEPARATOR) {
            return None;
        }

        let mut splits = key.split(FIELD_SEPARATOR);
        let first = splits.next()?;
        let mut current = self.data.get(first)?;
        for segment in splits {
            current = match current {
                Value::Document(doc) => doc.data.get(segment)?,
                Value::Array(arr) => arr.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns the value at `key` or [Value::Null] when the path is missing.
    pub fn get_or_null(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Whether `key` resolves to a value (null included).
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes the value at `key` and returns it. Dot paths are supported.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if self.data.contains_key(key) || !key.contains(FIELD_SEPARATOR) {
            return self.data.shift_remove(key);
        }
        let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
        self.deep_remove(&splits)
    }

    /// The document id, if one has been assigned.
    pub fn id(&self) -> Option<&str> {
        self.data.get(DOC_ID).and_then(|v| v.as_str())
    }

    pub fn has_id(&self) -> bool {
        self.data.contains_key(DOC_ID)
    }

    /// Whether the document carries the soft-delete tombstone.
    pub fn is_deleted(&self) -> bool {
        matches!(self.data.get(DOC_DELETED), Some(Value::Bool(true)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    pub(crate) fn get_mut_top_level(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    pub(crate) fn put_top_level(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }

    fn deep_put(&mut self, splits: &[&str], value: Value) -> JotResult<()> {
        let key = splits[0];
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(JotError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        if splits.len() == 1 {
            self.data.insert(key.to_string(), value);
            return Ok(());
        }

        let remaining = &splits[1..];
        match self.data.get_mut(key) {
            Some(Value::Document(nested)) => nested.deep_put(remaining, value),
            Some(Value::Array(arr)) => {
                let position = remaining[0].parse::<usize>().ok().filter(|p| *p < arr.len());
                match position {
                    Some(p) if remaining.len() == 1 => {
                        arr[p] = value;
                        Ok(())
                    }
                    Some(p) => match &mut arr[p] {
                        Value::Document(nested) => nested.deep_put(&remaining[1..], value),
                        slot => {
                            let mut nested = Document::new();
                            nested.deep_put(&remaining[1..], value)?;
                            *slot = Value::Document(nested);
                            Ok(())
                        }
                    },
                    None => self.replace_with_nested(key, remaining, value),
                }
            }
            _ => self.replace_with_nested(key, remaining, value),
        }
    }

    fn replace_with_nested(&mut self, key: &str, remaining: &[&str], value: Value) -> JotResult<()> {
        let mut nested = Document::new();
        nested.deep_put(remaining, value)?;
        self.data.insert(key.to_string(), Value::Document(nested));
        Ok(())
    }

    fn deep_remove(&mut self, splits: &[&str]) -> Option<Value> {
        let key = splits[0];
        if splits.len() == 1 {
            return self.data.shift_remove(key);
        }

        let remaining = &splits[1..];
        match self.data.get_mut(key)? {
            Value::Document(nested) => nested.deep_remove(remaining),
            Value::Array(arr) => {
                let position = remaining[0].parse::<usize>().ok().filter(|p| *p < arr.len())?;
                if remaining.len() == 1 {
                    Some(arr.remove(position))
                } else {
                    arr[position].as_document_mut()?.deep_remove(&remaining[1..])
                }
            }
            _ => None,
        }
    }
}

fn validate_id(value: &Value) -> JotResult<()> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(()),
        _ => {
            log::error!("Document id must be a non-empty string, found {:?}", value);
            Err(JotError::new(
                "Document id must be a non-empty string",
                ErrorKind::InvalidId,
            ))
        }
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.data.iter()).finish()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document {
            data: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

/// Strips the quotes `stringify!` leaves around quoted `doc!` keys.
#[doc(hidden)]
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a jotdb [Document] with JSON-like syntax.
///
/// # Examples
///
/// ```rust
/// use jotdb::doc;
///
/// let empty = doc! {};
/// assert!(empty.is_empty());
///
/// let base = 100;
/// let doc = doc! {
///     name: "Charlie",
///     "nick-name": "chaz",
///     score: (base * 2),
///     user: { tags: ["admin", "user"] },
/// };
/// assert_eq!(doc.size(), 4);
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::collection::Document::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.put(&$crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the doc! macro.
/// Handles nested documents, arrays, and expressions.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
