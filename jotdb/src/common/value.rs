use crate::collection::Document;
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};

/// Represents a [Document] value.
///
/// A value is a tagged tree mirroring the JSON data model: scalars, arrays and
/// nested documents. Integers and floating point numbers are kept apart so
/// integral values survive a round trip through the storage files, but every
/// comparison treats them as one numeric domain.
///
/// # Variants
/// - Null: absence of a value (also what a missing field resolves to)
/// - Bool(bool)
/// - I64(i64): integral numbers
/// - F64(f64): all other numbers
/// - String(String)
/// - Array(Vec<Value>)
/// - Document(Document): nested object
///
/// # Usage
/// ```rust
/// use jotdb::common::Value;
/// use jotdb::val;
///
/// let v: Value = 42.into();
/// assert_eq!(v, val!(42.0));
/// assert!(Value::from("5").loose_eq(&v) == false);
/// assert!(Value::from("42").loose_eq(&v));
/// ```
#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    Array(Vec<Value>),
    Document(Document),
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::I64(_) | Value::F64(_))
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(i) => Some(*i),
            Value::F64(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    /// Numeric view of the value, for numbers only.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I64(i) => Some(*i as f64),
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Coerces scalars to a number the way loose equality does: bools become
    /// 1/0 and strings are parsed after trimming (an empty string is 0).
    fn coerce_number(&self) -> Option<f64> {
        match self {
            Value::I64(_) | Value::F64(_) => self.as_f64(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
            _ => None,
        }
    }

    /// Loose equality used by the `=`, `==`, `!=`, `<>` and `in` operators.
    ///
    /// Values of the same kind compare structurally; numbers, numeric strings
    /// and booleans compare numerically; null equals only null.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Array(_), _) | (_, Value::Array(_)) => self == other,
            (Value::Document(_), _) | (_, Value::Document(_)) => self == other,
            _ => match (self.coerce_number(), other.coerce_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Ordering used by the relational operators.
    ///
    /// Returns `None` when the two values are not comparable, in which case
    /// every relational predicate evaluates to false.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Array(_), _) | (_, Value::Array(_)) => None,
            (Value::Document(_), _) | (_, Value::Document(_)) => None,
            _ => match (self.coerce_number(), other.coerce_number()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }

    /// Rank of the value's type, used to order values of different types.
    pub(crate) fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::I64(_) | Value::F64(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Document(_) => 5,
        }
    }

    /// Serializes the value into its secondary index key form.
    ///
    /// Booleans become `"1"`/`"0"`, null becomes `"NULL"`, arrays and documents
    /// become canonical JSON (object keys sorted) and everything else its
    /// plain string form.
    pub fn to_key_string(&self) -> String {
        match self {
            Value::Null => crate::common::NULL_KEY.to_string(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => "0".to_string(),
            Value::String(s) => s.clone(),
            Value::I64(_) | Value::F64(_) => format_number(self),
            Value::Array(_) | Value::Document(_) => self.to_canonical_json(),
        }
    }

    /// Key form used by secondary indexes.
    ///
    /// Every scalar that loose equality compares numerically (numbers, bools
    /// and numeric or blank strings) maps to its numeric form, so two values
    /// that are loosely equal always share a key. A key may still be shared
    /// by values that are not loosely equal (the strings `"1"` and `"1.0"`),
    /// so index hits are re-checked against the predicate.
    pub fn index_key(&self) -> String {
        match self.coerce_number() {
            Some(number) => format_number(&Value::F64(number)),
            None => self.to_key_string(),
        }
    }

    /// JSON text with object keys in sorted order.
    pub fn to_canonical_json(&self) -> String {
        let mut out = String::new();
        write_canonical(self, &mut out);
        out
    }
}

fn format_number(value: &Value) -> String {
    match value {
        Value::I64(i) => i.to_string(),
        Value::F64(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            (*f as i64).to_string()
        }
        Value::F64(f) => f.to_string(),
        _ => String::new(),
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::I64(_) | Value::F64(_) => out.push_str(&format_number(value)),
        Value::String(s) => {
            // serde_json never fails on a plain string
            out.push_str(&serde_json::to_string(s).unwrap_or_default())
        }
        Value::Array(arr) => {
            out.push('[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Document(doc) => {
            out.push('{');
            let mut entries: Vec<(&String, &Value)> = doc.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key).unwrap_or_default());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Document(a), Value::Document(b)) => a == b,
            (a, b) if a.is_number() && b.is_number() => a.as_f64() == b.as_f64(),
            _ => false,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I64(i) => write!(f, "{}", i),
            Value::F64(v) => write!(f, "{:?}", v),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(arr) => f.debug_list().entries(arr.iter()).finish(),
            Value::Document(doc) => write!(f, "{:?}", doc),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::I64(value as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, isize);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        i64::try_from(value).map(Value::I64).unwrap_or(Value::F64(value as f64))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::from(value as u64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::F64(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// A macro to create a `Value` from a given expression.
///
/// ```rust
/// use jotdb::common::Value;
/// use jotdb::val;
///
/// assert_eq!(val!(42), Value::I64(42));
/// assert_eq!(val!("hello"), Value::String("hello".to_string()));
/// ```
#[macro_export]
macro_rules! val {
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
