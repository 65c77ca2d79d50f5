//! Source adapters with a trait-based architecture.
//!
//! This module defines the [`SourceAdapter`] trait that both upstream
//! adapters implement. An adapter wires a request-construction strategy, a
//! page-continuation strategy, and a raw-to-canonical mapping into the same
//! paged contract, so the pagination driver in [`crate::collect`] never sees
//! the wire format differences between the two services.
//!
//! Adapters are registered with the [`SourceRegistry`]; only adapters whose
//! credential is configured are available at runtime.

pub mod mock;
mod registry;
mod scholar;
mod semantic;

pub use mock::ScriptedSource;
pub use registry::{SourceCapabilities, SourceRegistry};
pub use scholar::AuthorProfileSource;
pub use semantic::PaperSearchSource;

use crate::models::{CollectRequest, Cursor, Page};
use async_trait::async_trait;

/// The SourceAdapter trait defines the paged-fetch interface both upstream
/// services are unified behind.
///
/// # Contract
///
/// `fetch_page` issues exactly one upstream request. A `None` cursor means
/// the first page. The returned [`Page`] carries that page's entries, already
/// normalized, in upstream order, and the cursor for the following page
/// (`None` once the upstream signals exhaustion). A cursor handed back from
/// one page must be passed unchanged to the next call and never reused.
#[async_trait]
pub trait SourceAdapter: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this adapter (e.g. "semantic", "scholar")
    fn id(&self) -> &str;

    /// Human-readable name of the upstream service
    fn name(&self) -> &str;

    /// Describe the capabilities of this adapter
    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::SEARCH
    }

    /// Hard upper bound on the page-start offset, protecting against
    /// unbounded upstream pagination. `None` when the upstream terminates
    /// naturally.
    fn safety_ceiling(&self) -> Option<usize> {
        None
    }

    /// Fetch and normalize one page of results
    async fn fetch_page(
        &self,
        request: &CollectRequest,
        cursor: Option<&Cursor>,
    ) -> Result<Page, FetchError>;
}

/// Errors raised when an upstream page request fails.
///
/// A `FetchError` is fatal to the traversal that produced it: the driver
/// propagates it without retrying, and the caller keeps whatever records
/// earlier pages already emitted. Contrast with citation enrichment, whose
/// failures collapse to an absent field and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network or transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Upstream answered with a non-success status
    #[error("{service} returned status {status}")]
    Status {
        /// Name of the upstream service
        service: String,
        /// HTTP status code
        status: u16,
    },

    /// Payload could not be decoded
    #[error("malformed response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(format!("JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_capabilities() {
        let caps = SourceCapabilities::SEARCH | SourceCapabilities::ENRICHMENT;

        assert!(caps.contains(SourceCapabilities::SEARCH));
        assert!(caps.contains(SourceCapabilities::ENRICHMENT));
        assert!(!caps.contains(SourceCapabilities::AUTHOR_SEARCH));
    }

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Status {
            service: "Semantic Scholar".to_string(),
            status: 429,
        };
        assert_eq!(err.to_string(), "Semantic Scholar returned status 429");
    }
}
