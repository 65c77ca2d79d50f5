//! Collection request model.

use serde::{Deserialize, Serialize};

/// Fields requested from the paper-search upstream by default.
pub const DEFAULT_FIELDS: &[&str] = &[
    "title",
    "externalIds",
    "citationStyles",
    "url",
    "citationCount",
    "referenceCount",
    "year",
];

/// Caller-supplied query for one collection traversal.
///
/// A request is immutable once a traversal begins; changing any parameter
/// means constructing a new request and starting a new traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectRequest {
    /// Free-text search string (paper search)
    pub query: String,

    /// Inclusive lower bound of the publication-year filter
    pub year_from: Option<i32>,

    /// Inclusive upper bound of the publication-year filter
    pub year_to: Option<i32>,

    /// Field-of-study filters, comma-joined on the wire
    pub fields_of_study: Vec<String>,

    /// Restrict results to papers with an open-access PDF
    pub open_access_pdf: bool,

    /// Fields to retrieve per entry, comma-joined on the wire
    pub fields: Vec<String>,

    /// Author identifier (author-profile collection)
    pub author_id: Option<String>,

    /// Advisory cap on how many records the caller intends to keep.
    /// The pagination driver does not enforce this; the consumer stops
    /// pulling once it has enough.
    pub limit: Option<usize>,
}

impl Default for CollectRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            year_from: None,
            year_to: None,
            fields_of_study: Vec::new(),
            open_access_pdf: false,
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            author_id: None,
            limit: None,
        }
    }
}

impl CollectRequest {
    /// Create a free-text paper-search request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Create an author-profile request
    pub fn for_author(author_id: impl Into<String>) -> Self {
        Self {
            author_id: Some(author_id.into()),
            ..Default::default()
        }
    }

    /// Set the inclusive year range
    pub fn year_range(mut self, from: i32, to: i32) -> Self {
        self.year_from = Some(from);
        self.year_to = Some(to);
        self
    }

    /// Add a field-of-study filter
    pub fn field_of_study(mut self, field: impl Into<String>) -> Self {
        self.fields_of_study.push(field.into());
        self
    }

    /// Require an open-access PDF
    pub fn open_access_pdf(mut self, required: bool) -> Self {
        self.open_access_pdf = required;
        self
    }

    /// Replace the set of fields to retrieve
    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Set the advisory record limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = CollectRequest::new("perovskite solar cells")
            .year_range(2018, 2024)
            .field_of_study("Materials Science")
            .open_access_pdf(true)
            .limit(50);

        assert_eq!(request.query, "perovskite solar cells");
        assert_eq!(request.year_from, Some(2018));
        assert_eq!(request.year_to, Some(2024));
        assert_eq!(request.fields_of_study, vec!["Materials Science"]);
        assert!(request.open_access_pdf);
        assert_eq!(request.limit, Some(50));
    }

    #[test]
    fn test_default_fields_present() {
        let request = CollectRequest::new("anything");
        assert!(request.fields.iter().any(|f| f == "externalIds"));
        assert!(request.fields.iter().any(|f| f == "citationStyles"));
    }

    #[test]
    fn test_author_request() {
        let request = CollectRequest::for_author("4bahYMkAAAAJ");
        assert_eq!(request.author_id.as_deref(), Some("4bahYMkAAAAJ"));
        assert!(request.query.is_empty());
    }
}
