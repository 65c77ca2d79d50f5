//! Record model representing one collected bibliographic entry.

use serde::{Deserialize, Serialize};

/// The upstream service a record was collected from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    SemanticScholar,
    GoogleScholar,
    #[serde(untagged)]
    Other(String),
}

impl SourceType {
    /// Returns the display name of the source
    pub fn name(&self) -> &str {
        match self {
            SourceType::SemanticScholar => "Semantic Scholar",
            SourceType::GoogleScholar => "Google Scholar",
            SourceType::Other(s) => s,
        }
    }

    /// Returns the source identifier (for adapter selection)
    pub fn id(&self) -> &str {
        match self {
            SourceType::SemanticScholar => "semantic",
            SourceType::GoogleScholar => "scholar",
            SourceType::Other(s) => s,
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A normalized bibliographic record, independent of source format.
///
/// Records are final values once an adapter emits them: the pipeline never
/// mutates or retains a record after handing it downstream. Fields the
/// upstream did not supply stay `None`; nothing is defaulted to a sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Paper or article title
    pub title: String,

    /// Digital Object Identifier, when the source supplies one
    pub doi: Option<String>,

    /// Formatted citation text; present only when a DOI was available and
    /// the enrichment lookup succeeded
    pub citation: Option<String>,

    /// BibTeX entry as returned by the paper-search upstream
    pub bibtex: Option<String>,

    /// Page URL for the record
    pub source_url: Option<String>,

    /// Publication year
    pub year: Option<i32>,

    /// Times this work has been cited
    pub citation_count: Option<u32>,

    /// Number of works this one references (paper search only)
    pub reference_count: Option<u32>,

    /// Author names as supplied by the author-profile upstream
    pub authors: Option<String>,

    /// Venue/publication string (author profiles only)
    pub publication: Option<String>,

    /// Source where the record was found
    pub source: SourceType,
}

impl Record {
    /// Create a record with only the required fields set
    pub fn new(title: impl Into<String>, source: SourceType) -> Self {
        Self {
            title: title.into(),
            doi: None,
            citation: None,
            bibtex: None,
            source_url: None,
            year: None,
            citation_count: None,
            reference_count: None,
            authors: None,
            publication: None,
            source,
        }
    }

    /// Whether the record carries a persistent identifier
    pub fn has_doi(&self) -> bool {
        self.doi.is_some()
    }
}

/// Builder for constructing Record values
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Create a new builder with the required fields
    pub fn new(title: impl Into<String>, source: SourceType) -> Self {
        Self {
            record: Record::new(title, source),
        }
    }

    /// Set the DOI
    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.record.doi = Some(doi.into());
        self
    }

    /// Set the formatted citation
    pub fn citation(mut self, citation: impl Into<String>) -> Self {
        self.record.citation = Some(citation.into());
        self
    }

    /// Set the BibTeX entry
    pub fn bibtex(mut self, bibtex: impl Into<String>) -> Self {
        self.record.bibtex = Some(bibtex.into());
        self
    }

    /// Set the source URL
    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.record.source_url = Some(url.into());
        self
    }

    /// Set the publication year
    pub fn year(mut self, year: i32) -> Self {
        self.record.year = Some(year);
        self
    }

    /// Set the citation count
    pub fn citation_count(mut self, count: u32) -> Self {
        self.record.citation_count = Some(count);
        self
    }

    /// Set the reference count
    pub fn reference_count(mut self, count: u32) -> Self {
        self.record.reference_count = Some(count);
        self
    }

    /// Set the author list
    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.record.authors = Some(authors.into());
        self
    }

    /// Set the publication/venue
    pub fn publication(mut self, publication: impl Into<String>) -> Self {
        self.record.publication = Some(publication.into());
        self
    }

    /// Build the Record
    pub fn build(self) -> Record {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = RecordBuilder::new("Test Paper", SourceType::SemanticScholar)
            .doi("10.1234/test.1234")
            .citation("Doe, J. (2024). Test Paper.")
            .source_url("https://example.com/paper")
            .year(2024)
            .citation_count(42)
            .build();

        assert_eq!(record.title, "Test Paper");
        assert_eq!(record.doi, Some("10.1234/test.1234".to_string()));
        assert_eq!(record.year, Some(2024));
        assert_eq!(record.citation_count, Some(42));
        assert!(record.has_doi());
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let record = Record::new("Bare", SourceType::GoogleScholar);

        assert!(record.doi.is_none());
        assert!(record.citation.is_none());
        assert!(record.source_url.is_none());
        assert!(!record.has_doi());
    }

    #[test]
    fn test_source_type_display() {
        assert_eq!(SourceType::SemanticScholar.to_string(), "Semantic Scholar");
        assert_eq!(SourceType::GoogleScholar.to_string(), "Google Scholar");
        assert_eq!(SourceType::SemanticScholar.id(), "semantic");
    }
}
