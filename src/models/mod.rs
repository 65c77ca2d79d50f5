//! Core data structures for the collection pipeline.

mod page;
mod record;
mod request;

pub use page::{Cursor, Page};
pub use record::{Record, RecordBuilder, SourceType};
pub use request::CollectRequest;
