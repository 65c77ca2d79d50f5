//! # citeharvest
//!
//! Incremental collection of scholarly metadata from paper-search and
//! author-profile services, with best-effort citation enrichment per record.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Record, CollectRequest, Cursor, Page)
//! - [`sources`]: Source adapters behind the [`SourceAdapter`] trait
//! - [`collect`]: The pagination driver producing the record sequence
//! - [`enrich`]: Best-effort citation formatting lookups
//! - [`export`]: CSV serialization of collected records
//! - [`ui`]: Terminal rendering for the CLI
//! - [`config`]: Configuration and credentials
//! - [`utils`]: Shared HTTP client

pub mod collect;
pub mod config;
pub mod enrich;
pub mod export;
pub mod models;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use collect::RecordStream;
pub use models::{CollectRequest, Record};
pub use sources::{SourceAdapter, SourceRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
