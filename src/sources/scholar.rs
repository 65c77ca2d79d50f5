//! Google Scholar author-profile adapter, backed by the SerpAPI wrapper.
//!
//! Google Scholar has no official API; article listings come through
//! SerpAPI's `google_scholar_author` engine. Pagination here is opaque: the
//! upstream hands back a complete next-page URL instead of an offset, and
//! terminates naturally, so this adapter carries no safety ceiling.

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{CollectRequest, Cursor, Page, Record, RecordBuilder, SourceType};
use crate::sources::{FetchError, SourceAdapter, SourceCapabilities};
use crate::utils::HttpClient;

const SERPAPI_BASE: &str = "https://serpapi.com";

/// Articles requested per page (the upstream maximum).
const PAGE_SIZE: usize = 100;

/// Author-profile adapter producing one record per listed article.
#[derive(Debug, Clone)]
pub struct AuthorProfileSource {
    http: HttpClient,
    api_key: String,
    base_url: String,
}

impl AuthorProfileSource {
    /// Create a new author-profile adapter
    pub fn new(http: HttpClient, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: SERPAPI_BASE.to_string(),
        }
    }

    /// Point the adapter at a different API base (used in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn first_page_url(&self, author_id: &str) -> String {
        format!(
            "{}/search?engine=google_scholar_author&author_id={}&hl=en&start=0&num={}&api_key={}",
            self.base_url,
            urlencoding::encode(author_id),
            PAGE_SIZE,
            self.api_key
        )
    }

    /// The next-page URL from the upstream omits the credential; re-append
    /// it before following the cursor.
    fn next_page_url(&self, next: &str) -> Result<String, FetchError> {
        let mut url = match url::Url::parse(next) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => url::Url::parse(&self.base_url)
                .and_then(|base| base.join(next))
                .map_err(|e| FetchError::Parse(format!("next page url: {}", e)))?,
            Err(e) => return Err(FetchError::Parse(format!("next page url: {}", e))),
        };
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        Ok(url.into())
    }

    fn normalize(raw: AuthorArticle) -> Record {
        let mut record = RecordBuilder::new(raw.title, SourceType::GoogleScholar);

        if let Some(authors) = raw.authors {
            record = record.authors(authors);
        }
        if let Some(publication) = raw.publication {
            record = record.publication(publication);
        }
        if let Some(link) = raw.link {
            record = record.source_url(link);
        }
        if let Some(year) = raw.year.and_then(|y| y.parse::<i32>().ok()) {
            record = record.year(year);
        }
        if let Some(count) = raw.cited_by.and_then(|c| c.value) {
            record = record.citation_count(count);
        }

        record.build()
    }
}

#[async_trait]
impl SourceAdapter for AuthorProfileSource {
    fn id(&self) -> &str {
        "scholar"
    }

    fn name(&self) -> &str {
        "Google Scholar"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::AUTHOR_SEARCH
    }

    async fn fetch_page(
        &self,
        request: &CollectRequest,
        cursor: Option<&Cursor>,
    ) -> Result<Page, FetchError> {
        let url = match cursor {
            None => {
                let author_id = request.author_id.as_deref().ok_or_else(|| {
                    FetchError::Parse("author-profile request is missing an author id".to_string())
                })?;
                self.first_page_url(author_id)
            }
            Some(Cursor::NextUrl(next)) => self.next_page_url(next)?,
            Some(Cursor::Offset(_)) => {
                return Err(FetchError::Parse(
                    "author profiles expect a next-url cursor".to_string(),
                ))
            }
        };

        tracing::debug!("fetching author-profile page");

        let response = self
            .http
            .client()
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("author profile request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                service: self.name().to_string(),
                status: response.status().as_u16(),
            });
        }

        let page: AuthorArticlesPage = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(format!("author profile payload: {}", e)))?;

        let next = page
            .serpapi_pagination
            .and_then(|p| p.next)
            .map(Cursor::NextUrl);
        let records = page
            .articles
            .into_iter()
            .map(Self::normalize)
            .collect();

        Ok(Page::new(records, next))
    }
}

// ===== SerpAPI response types =====

#[derive(Debug, Deserialize)]
struct AuthorArticlesPage {
    #[serde(default)]
    articles: Vec<AuthorArticle>,
    #[serde(default)]
    serpapi_pagination: Option<SerpApiPagination>,
}

#[derive(Debug, Deserialize)]
struct SerpApiPagination {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthorArticle {
    title: String,
    authors: Option<String>,
    publication: Option<String>,
    link: Option<String>,
    year: Option<String>,
    cited_by: Option<CitedBy>,
}

#[derive(Debug, Deserialize)]
struct CitedBy {
    value: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn source_for(server: &mockito::ServerGuard) -> AuthorProfileSource {
        AuthorProfileSource::new(HttpClient::new(), "serp-key").with_base_url(server.url())
    }

    #[tokio::test]
    async fn test_first_page_and_normalization() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("engine".into(), "google_scholar_author".into()),
                Matcher::UrlEncoded("author_id".into(), "4bahYMkAAAAJ".into()),
                Matcher::UrlEncoded("hl".into(), "en".into()),
                Matcher::UrlEncoded("start".into(), "0".into()),
                Matcher::UrlEncoded("num".into(), "100".into()),
                Matcher::UrlEncoded("api_key".into(), "serp-key".into()),
            ]))
            .with_body(
                r#"{"articles":[{"title":"Deep Things","authors":"A Person, B Person","year":"2019","publication":"Journal of Things 12(3)","link":"https://scholar/x","cited_by":{"value":321}}]}"#,
            )
            .create_async()
            .await;

        let source = source_for(&server);
        let page = source
            .fetch_page(&CollectRequest::for_author("4bahYMkAAAAJ"), None)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.records.len(), 1);
        let record = &page.records[0];
        assert_eq!(record.title, "Deep Things");
        assert_eq!(record.authors.as_deref(), Some("A Person, B Person"));
        assert_eq!(record.publication.as_deref(), Some("Journal of Things 12(3)"));
        assert_eq!(record.year, Some(2019));
        assert_eq!(record.citation_count, Some(321));
        assert!(record.doi.is_none());
        assert!(record.citation.is_none());
        assert!(page.next.is_none());
    }

    #[tokio::test]
    async fn test_next_url_cursor_gets_credential_appended() {
        let mut server = mockito::Server::new_async().await;
        let next_url = format!("{}/search?engine=google_scholar_author&start=100", server.url());
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start".into(), "100".into()),
                Matcher::UrlEncoded("api_key".into(), "serp-key".into()),
            ]))
            .with_body(r#"{"articles":[{"title":"Page Two Article"}]}"#)
            .create_async()
            .await;

        let source = source_for(&server);
        let page = source
            .fetch_page(
                &CollectRequest::for_author("4bahYMkAAAAJ"),
                Some(&Cursor::NextUrl(next_url)),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.records[0].title, "Page Two Article");
    }

    #[tokio::test]
    async fn test_pagination_continuation_surfaces_as_cursor() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_body(
                r#"{"articles":[{"title":"First"}],"serpapi_pagination":{"next":"https://serpapi.com/search?start=100"}}"#,
            )
            .create_async()
            .await;

        let source = source_for(&server);
        let page = source
            .fetch_page(&CollectRequest::for_author("abc"), None)
            .await
            .unwrap();

        assert_eq!(
            page.next,
            Some(Cursor::NextUrl(
                "https://serpapi.com/search?start=100".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_missing_author_id_fails_before_network() {
        let server = mockito::Server::new_async().await;
        let source = source_for(&server);

        let err = source
            .fetch_page(&CollectRequest::new("free text"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn test_unparseable_year_stays_absent() {
        let record = AuthorProfileSource::normalize(AuthorArticle {
            title: "Odd Year".to_string(),
            authors: None,
            publication: None,
            link: None,
            year: Some("n.d.".to_string()),
            cited_by: None,
        });
        assert!(record.year.is_none());
    }
}
