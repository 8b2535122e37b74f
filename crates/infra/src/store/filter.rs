//! Structured document filters.
//!
//! A filter is a conjunction of predicates over top-level document fields.
//! Backends either evaluate it directly ([`Filter::matches`]) or compile it
//! to their own query language.

use serde_json::Value as JsonValue;

/// A single field predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field is present and equal to the value.
    Eq { field: String, value: JsonValue },
    /// Field is present, numeric, and strictly less than the bound.
    Lt { field: String, bound: f64 },
}

impl Predicate {
    pub fn field(&self) -> &str {
        match self {
            Predicate::Eq { field, .. } | Predicate::Lt { field, .. } => field,
        }
    }

    fn matches(&self, document: &JsonValue) -> bool {
        match self {
            Predicate::Eq { field, value } => document.get(field) == Some(value),
            Predicate::Lt { field, bound } => document
                .get(field)
                .and_then(JsonValue::as_f64)
                .is_some_and(|v| v < *bound),
        }
    }
}

/// Conjunction of predicates. The empty filter matches every document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::all().and_eq(field, value)
    }

    pub fn lt(field: impl Into<String>, bound: impl Into<f64>) -> Self {
        Self::all().and_lt(field, bound)
    }

    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.predicates.push(Predicate::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn and_lt(mut self, field: impl Into<String>, bound: impl Into<f64>) -> Self {
        self.predicates.push(Predicate::Lt {
            field: field.into(),
            bound: bound.into(),
        });
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, document: &JsonValue) -> bool {
        self.predicates.iter().all(|p| p.matches(document))
    }
}
