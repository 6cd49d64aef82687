use crate::collection::Document;
use crate::common::Value;
use crate::filter::Operator;
use std::fmt::Display;

/// A single `field operator value` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    field: String,
    operator: Operator,
    value: Value,
}

impl Condition {
    pub fn new<T: Into<Value>>(field: &str, operator: &str, value: T) -> Self {
        Condition {
            field: field.to_string(),
            operator: Operator::parse(operator),
            value: value.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Evaluates the condition against a document. Missing fields are null.
    pub fn matches(&self, document: &Document) -> bool {
        let field_value = document.get(&self.field).unwrap_or(&Value::Null);
        self.operator.apply(field_value, &self.value)
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// One element of a query's predicate list.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Single(Condition),
    /// Holds when at least one condition holds.
    Any(Vec<Condition>),
}

impl Predicate {
    pub fn single(condition: Condition) -> Self {
        Predicate::Single(condition)
    }

    pub fn any(conditions: Vec<Condition>) -> Self {
        Predicate::Any(conditions)
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Predicate::Single(condition) => condition.matches(document),
            Predicate::Any(conditions) => conditions.iter().any(|c| c.matches(document)),
        }
    }

    /// Field paths referenced by this predicate.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Predicate::Single(condition) => vec![condition.field()],
            Predicate::Any(conditions) => conditions.iter().map(|c| c.field()).collect(),
        }
    }

    /// The condition if it can be answered by an index lookup: a top-level
    /// single equality against a non-null value.
    pub(crate) fn as_indexable(&self) -> Option<&Condition> {
        match self {
            Predicate::Single(c) if c.operator().is_equality() && !c.value().is_null() => Some(c),
            _ => None,
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Single(condition) => write!(f, "{}", condition),
            Predicate::Any(conditions) => {
                let parts: Vec<String> = conditions.iter().map(|c| c.to_string()).collect();
                write!(f, "({})", parts.join(" OR "))
            }
        }
    }
}

/// AND over the predicate list. An empty list matches everything.
pub fn matches_all(predicates: &[Predicate], document: &Document) -> bool {
    predicates.iter().all(|p| p.matches(document))
}
