//! Semantic Scholar paper-search adapter.

use async_trait::async_trait;
use serde::Deserialize;

use crate::enrich::CitationClient;
use crate::models::{CollectRequest, Cursor, Page, Record, RecordBuilder, SourceType};
use crate::sources::{FetchError, SourceAdapter, SourceCapabilities};
use crate::utils::HttpClient;

const SEMANTIC_API_BASE: &str = "https://api.semanticscholar.org/graph/v1";

/// Entries requested per page.
pub const PAGE_SIZE: usize = 100;

/// Offsets beyond this bound are never requested, even when the upstream
/// keeps reporting further pages.
pub const OFFSET_CEILING: usize = 10_000;

/// Paper-search adapter backed by the Semantic Scholar Graph API.
///
/// The page cursor is a numeric offset starting at 0 and advancing by
/// [`PAGE_SIZE`] after every page. Each entry that carries a DOI gets one
/// best-effort citation lookup through the enricher during normalization.
#[derive(Debug, Clone)]
pub struct PaperSearchSource {
    http: HttpClient,
    enricher: CitationClient,
    api_key: String,
    base_url: String,
}

impl PaperSearchSource {
    /// Create a new paper-search adapter
    pub fn new(http: HttpClient, enricher: CitationClient, api_key: impl Into<String>) -> Self {
        Self {
            http,
            enricher,
            api_key: api_key.into(),
            base_url: SEMANTIC_API_BASE.to_string(),
        }
    }

    /// Point the adapter at a different API base (used in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the search URL for one page. Optional request parameters are
    /// appended only when the caller supplied them; `openAccessPdf` is a
    /// presence-only flag with no value.
    fn build_url(&self, request: &CollectRequest, offset: usize) -> String {
        let mut url = format!(
            "{}/paper/search?query={}",
            self.base_url,
            urlencoding::encode(&request.query)
        );

        if let (Some(from), Some(to)) = (request.year_from, request.year_to) {
            url.push_str(&format!("&year={}-{}", from, to));
        }
        if request.open_access_pdf {
            url.push_str("&openAccessPdf");
        }
        if !request.fields_of_study.is_empty() {
            url.push_str(&format!(
                "&fieldsOfStudy={}",
                urlencoding::encode(&request.fields_of_study.join(","))
            ));
        }
        if !request.fields.is_empty() {
            url.push_str(&format!("&fields={}", request.fields.join(",")));
        }
        url.push_str(&format!("&limit={}&offset={}", PAGE_SIZE, offset));

        url
    }

    /// Map one raw entry to a canonical record, enriching it with a
    /// formatted citation when a DOI is present
    async fn normalize(&self, raw: S2Entry) -> Record {
        let mut record = RecordBuilder::new(raw.title, SourceType::SemanticScholar);

        if let Some(url) = raw.url {
            record = record.source_url(url);
        }
        if let Some(bibtex) = raw.citation_styles.and_then(|s| s.bibtex) {
            record = record.bibtex(bibtex);
        }
        if let Some(year) = raw.year {
            record = record.year(year);
        }
        if let Some(count) = raw.citation_count {
            record = record.citation_count(count);
        }
        if let Some(count) = raw.reference_count {
            record = record.reference_count(count);
        }

        let doi = raw
            .external_ids
            .and_then(|ids| ids.doi)
            .filter(|d| !d.is_empty());
        if let Some(doi) = doi {
            if let Some(citation) = self.enricher.fetch_citation(&doi).await {
                record = record.citation(citation);
            }
            record = record.doi(doi);
        }

        record.build()
    }
}

#[async_trait]
impl SourceAdapter for PaperSearchSource {
    fn id(&self) -> &str {
        "semantic"
    }

    fn name(&self) -> &str {
        "Semantic Scholar"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::SEARCH | SourceCapabilities::ENRICHMENT
    }

    fn safety_ceiling(&self) -> Option<usize> {
        Some(OFFSET_CEILING)
    }

    async fn fetch_page(
        &self,
        request: &CollectRequest,
        cursor: Option<&Cursor>,
    ) -> Result<Page, FetchError> {
        let offset = match cursor {
            None => 0,
            Some(Cursor::Offset(n)) => *n,
            Some(Cursor::NextUrl(_)) => {
                return Err(FetchError::Parse(
                    "paper search expects an offset cursor".to_string(),
                ))
            }
        };

        let url = self.build_url(request, offset);
        tracing::debug!(offset, "fetching paper-search page");

        let response = self
            .http
            .client()
            .get(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("paper search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                service: self.name().to_string(),
                status: response.status().as_u16(),
            });
        }

        let page: S2SearchPage = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(format!("paper search payload: {}", e)))?;

        // The upstream reports `next` whenever more pages exist; the cursor
        // itself advances by the fixed page size.
        let next = page.next.map(|_| Cursor::Offset(offset + PAGE_SIZE));

        let mut records = Vec::with_capacity(page.data.len());
        for entry in page.data {
            records.push(self.normalize(entry).await);
        }

        Ok(Page::new(records, next))
    }
}

// ===== Semantic Scholar API types =====

#[derive(Debug, Deserialize)]
struct S2SearchPage {
    data: Vec<S2Entry>,
    #[serde(default)]
    next: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct S2Entry {
    title: String,
    #[serde(rename = "externalIds")]
    external_ids: Option<S2ExternalIds>,
    #[serde(rename = "citationStyles")]
    citation_styles: Option<S2CitationStyles>,
    url: Option<String>,
    #[serde(rename = "citationCount")]
    citation_count: Option<u32>,
    #[serde(rename = "referenceCount")]
    reference_count: Option<u32>,
    year: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct S2ExternalIds {
    #[serde(rename = "DOI")]
    doi: Option<String>,
}

#[derive(Debug, Deserialize)]
struct S2CitationStyles {
    bibtex: Option<String>,
}
