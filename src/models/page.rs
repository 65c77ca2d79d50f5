//! Page and cursor models for upstream pagination.

use crate::models::Record;

/// Opaque continuation state identifying the next page of an upstream
/// listing.
///
/// Absence of a cursor signals that pagination is complete. A cursor is
/// consumed by the single fetch it parameterizes and never reused: each
/// fetched page yields a fresh cursor (or none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// Numeric page-start offset (paper search)
    Offset(usize),
    /// Opaque next-page URL supplied verbatim by the upstream (author
    /// profiles)
    NextUrl(String),
}

/// One page of normalized records in upstream order, plus the continuation
/// for the page after it.
#[derive(Debug, Clone)]
pub struct Page {
    /// Records of this page, exactly as ordered by the upstream
    pub records: Vec<Record>,
    /// Cursor for the next page; `None` when the upstream is exhausted
    pub next: Option<Cursor>,
}

impl Page {
    /// Create a page with a continuation
    pub fn new(records: Vec<Record>, next: Option<Cursor>) -> Self {
        Self { records, next }
    }

    /// Create a final page with no continuation
    pub fn last(records: Vec<Record>) -> Self {
        Self {
            records,
            next: None,
        }
    }
}
