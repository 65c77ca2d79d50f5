//! Scripted adapter for testing the pagination driver.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::models::{CollectRequest, Cursor, Page, Record, RecordBuilder, SourceType};
use crate::sources::{FetchError, SourceAdapter, SourceCapabilities};

/// An adapter that replays a scripted sequence of pages and errors, and
/// records every cursor it is asked to fetch.
///
/// With [`ScriptedSource::endless`] it instead fabricates pages forever,
/// always reporting a further offset cursor, which is how the safety-ceiling
/// behavior is exercised.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Page, FetchError>>>,
    endless_page_size: Option<usize>,
    ceiling: Option<usize>,
    seen: Mutex<Vec<Option<Cursor>>>,
}

impl ScriptedSource {
    /// Create a source with an empty script; exhausting the script yields
    /// empty final pages
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source that always reports another page of `page_size`
    /// records, bounded only by the given safety ceiling
    pub fn endless(page_size: usize, ceiling: Option<usize>) -> Self {
        Self {
            endless_page_size: Some(page_size),
            ceiling,
            ..Self::default()
        }
    }

    /// Append a page to the script
    pub fn push_page(&self, page: Page) {
        self.script.lock().unwrap().push_back(Ok(page));
    }

    /// Append a fetch failure to the script
    pub fn push_error(&self, err: FetchError) {
        self.script.lock().unwrap().push_back(Err(err));
    }

    /// Number of fetches observed so far
    pub fn fetch_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Cursors observed so far, one per fetch, in order
    pub fn seen_cursors(&self) -> Vec<Option<Cursor>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceAdapter for ScriptedSource {
    fn id(&self) -> &str {
        "scripted"
    }

    fn name(&self) -> &str {
        "Scripted Source"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::SEARCH
    }

    fn safety_ceiling(&self) -> Option<usize> {
        self.ceiling
    }

    async fn fetch_page(
        &self,
        _request: &CollectRequest,
        cursor: Option<&Cursor>,
    ) -> Result<Page, FetchError> {
        self.seen.lock().unwrap().push(cursor.cloned());

        if let Some(page_size) = self.endless_page_size {
            let offset = match cursor {
                Some(Cursor::Offset(n)) => *n,
                _ => 0,
            };
            let records = (0..page_size)
                .map(|i| make_record(&format!("entry {}", offset + i)))
                .collect();
            return Ok(Page::new(records, Some(Cursor::Offset(offset + page_size))));
        }

        match self.script.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(Page::last(Vec::new())),
        }
    }
}

/// Helper to create a minimal record for driver tests
pub fn make_record(title: &str) -> Record {
    RecordBuilder::new(title, SourceType::Other("scripted".to_string())).build()
}
