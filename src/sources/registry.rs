//! Registry for the configured source adapters.

use std::collections::HashMap;
use std::sync::Arc;

use super::{AuthorProfileSource, PaperSearchSource, SourceAdapter};
use crate::config::{Config, ConfigError, SEMANTIC_SCHOLAR_KEY_VAR, SERPAPI_KEY_VAR};
use crate::enrich::CitationClient;
use crate::utils::HttpClient;

bitflags::bitflags! {
    /// Capabilities that an adapter can support
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SourceCapabilities: u32 {
        /// Free-text paper search
        const SEARCH = 1 << 0;
        /// Listing of an author's articles
        const AUTHOR_SEARCH = 1 << 1;
        /// Per-record citation enrichment
        const ENRICHMENT = 1 << 2;
    }
}

/// Registry holding the adapters whose credentials are configured.
///
/// Credentials are read once at construction; an adapter whose key is absent
/// is simply not registered, and selecting it fails with a configuration
/// error before any network call is attempted.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn SourceAdapter>>,
}

impl SourceRegistry {
    /// Build a registry from configuration, sharing one HTTP client across
    /// all adapters
    pub fn from_config(config: &Config) -> Self {
        let http = HttpClient::with_config(&config.http);
        let mut registry = Self::default();

        if let Some(key) = &config.api_keys.semantic_scholar {
            let enricher = CitationClient::new(http.clone());
            registry.register(Arc::new(PaperSearchSource::new(
                http.clone(),
                enricher,
                key.clone(),
            )));
        } else {
            tracing::debug!("{} not set, paper search unavailable", SEMANTIC_SCHOLAR_KEY_VAR);
        }

        if let Some(key) = &config.api_keys.serpapi {
            registry.register(Arc::new(AuthorProfileSource::new(http.clone(), key.clone())));
        } else {
            tracing::debug!("{} not set, author profiles unavailable", SERPAPI_KEY_VAR);
        }

        registry
    }

    /// Register an adapter
    pub fn register(&mut self, source: Arc<dyn SourceAdapter>) {
        self.sources.insert(source.id().to_string(), source);
    }

    /// Get an adapter by ID
    pub fn get(&self, id: &str) -> Option<&Arc<dyn SourceAdapter>> {
        self.sources.get(id)
    }

    /// Get an adapter by ID, reporting the missing credential if it was not
    /// configured
    pub fn get_required(&self, id: &str) -> Result<&Arc<dyn SourceAdapter>, ConfigError> {
        self.get(id).ok_or_else(|| match id {
            "semantic" => ConfigError::MissingCredential {
                service: "Semantic Scholar",
                env_var: SEMANTIC_SCHOLAR_KEY_VAR,
            },
            "scholar" => ConfigError::MissingCredential {
                service: "Google Scholar",
                env_var: SERPAPI_KEY_VAR,
            },
            other => ConfigError::UnknownSource(other.to_string()),
        })
    }

    /// Get all registered adapters
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn SourceAdapter>> {
        self.sources.values()
    }

    /// Get all adapter IDs
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(|s| s.as_str())
    }

    /// Get adapters that support a specific capability
    pub fn with_capability(&self, capability: SourceCapabilities) -> Vec<&Arc<dyn SourceAdapter>> {
        self.all()
            .filter(|s| s.capabilities().contains(capability))
            .collect()
    }

    /// Check if an adapter is registered
    pub fn has(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    /// Get the number of registered adapters
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKeys;

    fn config_with_keys(semantic: Option<&str>, serpapi: Option<&str>) -> Config {
        Config {
            api_keys: ApiKeys {
                semantic_scholar: semantic.map(String::from),
                serpapi: serpapi.map(String::from),
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_both_adapters_registered() {
        let registry = SourceRegistry::from_config(&config_with_keys(Some("k1"), Some("k2")));

        assert_eq!(registry.len(), 2);
        assert!(registry.has("semantic"));
        assert!(registry.has("scholar"));
    }

    #[test]
    fn test_missing_credential_not_registered() {
        let registry = SourceRegistry::from_config(&config_with_keys(Some("k1"), None));

        assert!(registry.has("semantic"));
        assert!(!registry.has("scholar"));

        let err = registry.get_required("scholar").unwrap_err();
        assert!(err.to_string().contains(SERPAPI_KEY_VAR));
    }

    #[test]
    fn test_unknown_source() {
        let registry = SourceRegistry::default();
        let err = registry.get_required("nonexistent").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSource(_)));
    }

    #[test]
    fn test_capability_filter() {
        let registry = SourceRegistry::from_config(&config_with_keys(Some("k1"), Some("k2")));

        let searchable = registry.with_capability(SourceCapabilities::SEARCH);
        assert_eq!(searchable.len(), 1);
        assert_eq!(searchable[0].id(), "semantic");

        let author = registry.with_capability(SourceCapabilities::AUTHOR_SEARCH);
        assert_eq!(author.len(), 1);
        assert_eq!(author[0].id(), "scholar");
    }
}
