//! Structured query expressions sent to the cabinet's search endpoint.

use serde::Serialize;

/// Identifier field the cabinet indexes every document under.
pub const DOC_ID_FIELD: &str = "DWDOCID";

/// Boolean combinator applied across the conditions of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operation {
    /// All conditions must match.
    And,
    /// Any condition may match.
    Or,
}

/// Single equality condition over one index field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    /// Index field the condition applies to.
    pub field: String,
    /// Accepted values; a document matches when the field equals any of them.
    pub values: Vec<String>,
}

/// Structured predicate plus pagination window for a cabinet search.
#[derive(Debug, Clone, Serialize)]
pub struct QueryExpression {
    /// Equality conditions combined under `operation`.
    pub conditions: Vec<Condition>,
    /// Boolean combinator across conditions.
    pub operation: Operation,
    /// Zero-based offset of the first requested match.
    pub start: usize,
    /// Maximum number of matches to return.
    pub count: usize,
}

impl QueryExpression {
    /// Build the single-match lookup used by the delete path.
    ///
    /// Identifiers are expected unique, so the window is scoped to one result.
    pub fn by_document_id(document_id: &str) -> Self {
        Self {
            conditions: vec![Condition {
                field: DOC_ID_FIELD.to_string(),
                values: vec![document_id.to_string()],
            }],
            operation: Operation::And,
            start: 0,
            count: 1,
        }
    }
}
