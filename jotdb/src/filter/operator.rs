use crate::common::Value;
use std::cmp::Ordering;
use std::fmt::Display;

/// Comparison operator of a [Condition](crate::filter::Condition).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    /// `=` or `==`
    Equal,
    /// `!=` or `<>`
    NotEqual,
    Greater,
    GreaterEqual,
    Lesser,
    LesserEqual,
    In,
    Like,
    /// Any other symbol; never matches.
    Unknown(String),
}

impl Operator {
    /// Parses an operator symbol. Symbols are case-insensitive for the word
    /// operators (`in`, `like`).
    pub fn parse(symbol: &str) -> Operator {
        match symbol.trim().to_lowercase().as_str() {
            "=" | "==" => Operator::Equal,
            "!=" | "<>" => Operator::NotEqual,
            ">" => Operator::Greater,
            ">=" => Operator::GreaterEqual,
            "<" => Operator::Lesser,
            "<=" => Operator::LesserEqual,
            "in" => Operator::In,
            "like" => Operator::Like,
            _ => Operator::Unknown(symbol.to_string()),
        }
    }

    /// Whether an index lookup can serve this operator.
    pub fn is_equality(&self) -> bool {
        matches!(self, Operator::Equal)
    }

    /// Applies the operator to a document value and the query operand.
    ///
    /// A missing field is passed in as [Value::Null].
    pub fn apply(&self, field_value: &Value, operand: &Value) -> bool {
        match self {
            Operator::Equal => field_value.loose_eq(operand),
            Operator::NotEqual => !field_value.loose_eq(operand),
            Operator::Greater => field_value.compare(operand) == Some(Ordering::Greater),
            Operator::GreaterEqual => matches!(
                field_value.compare(operand),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::Lesser => field_value.compare(operand) == Some(Ordering::Less),
            Operator::LesserEqual => matches!(
                field_value.compare(operand),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::In => match operand {
                Value::Array(candidates) => candidates.iter().any(|c| field_value.loose_eq(c)),
                _ => false,
            },
            Operator::Like => like(field_value, operand),
            Operator::Unknown(_) => false,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Equal => write!(f, "="),
            Operator::NotEqual => write!(f, "!="),
            Operator::Greater => write!(f, ">"),
            Operator::GreaterEqual => write!(f, ">="),
            Operator::Lesser => write!(f, "<"),
            Operator::LesserEqual => write!(f, "<="),
            Operator::In => write!(f, "in"),
            Operator::Like => write!(f, "like"),
            Operator::Unknown(symbol) => write!(f, "{}", symbol),
        }
    }
}

fn like_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_lowercase()),
        Value::Bool(b) => Some(b.to_string()),
        Value::I64(_) | Value::F64(_) => Some(value.to_key_string()),
        _ => None,
    }
}

fn like(field_value: &Value, pattern: &Value) -> bool {
    let (text, pattern) = match (like_text(field_value), like_text(pattern)) {
        (Some(text), Some(pattern)) => (text, pattern),
        _ => return false,
    };
    let needle = pattern.strip_prefix('%').unwrap_or(&pattern);
    let needle = needle.strip_suffix('%').unwrap_or(needle);
    text.contains(needle)
}
