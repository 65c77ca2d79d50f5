//! Best-effort citation formatting through the CrossCite service.

use crate::utils::HttpClient;

const CROSSCITE_BASE: &str = "https://citation.crosscite.org";

/// Citation style requested from the formatting service.
const STYLE: &str = "apa";

/// Locale for the formatted citation.
const LANG: &str = "en-US";

/// Client for the citation-formatting upstream.
///
/// Enrichment is strictly best-effort: one GET per DOI, no retries, and
/// every failure mode collapses to `None`. A record whose citation lookup
/// fails is still a valid record, just without the citation field.
#[derive(Debug, Clone)]
pub struct CitationClient {
    http: HttpClient,
    base_url: String,
}

impl CitationClient {
    /// Create a client against the public CrossCite endpoint
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            base_url: CROSSCITE_BASE.to_string(),
        }
    }

    /// Create a client against a different endpoint (used in tests)
    pub fn with_base_url(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Fetch a formatted citation for a DOI.
    ///
    /// Returns the response body on a 2xx answer. Transport errors,
    /// timeouts, non-2xx statuses, and unreadable bodies all yield `None`
    /// so that a single failed lookup cannot abort a traversal.
    pub async fn fetch_citation(&self, doi: &str) -> Option<String> {
        if doi.is_empty() {
            return None;
        }

        let url = format!(
            "{}/format?doi={}&style={}&lang={}",
            self.base_url,
            urlencoding::encode(doi),
            STYLE,
            LANG
        );

        let response = match self.http.client().get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(doi, error = %e, "citation lookup failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(doi, status = response.status().as_u16(), "citation unavailable");
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!(doi, error = %e, "citation body unreadable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> CitationClient {
        CitationClient::with_base_url(HttpClient::new(), server.url())
    }

    #[tokio::test]
    async fn test_successful_lookup_returns_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/format")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("doi".into(), "10.1234/x".into()),
                Matcher::UrlEncoded("style".into(), "apa".into()),
                Matcher::UrlEncoded("lang".into(), "en-US".into()),
            ]))
            .with_body("Doe, J. (2020). A title.")
            .create_async()
            .await;

        let citation = client_for(&server).fetch_citation("10.1234/x").await;
        assert_eq!(citation.as_deref(), Some("Doe, J. (2020). A title."));
    }

    #[tokio::test]
    async fn test_non_success_status_yields_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/format")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        assert!(client_for(&server).fetch_citation("10.1234/x").await.is_none());
    }

    #[tokio::test]
    async fn test_empty_doi_short_circuits() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/format")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        assert!(client_for(&server).fetch_citation("").await.is_none());
        mock.assert_async().await;
    }
}
