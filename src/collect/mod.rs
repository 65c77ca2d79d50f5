//! Pagination driver: turns a source adapter into an incremental,
//! cancellable sequence of records.
//!
//! The driver is strictly pull-based. It fetches a page only when the
//! consumer has drained everything already buffered, so stopping consumption
//! (or dropping the stream) cancels the traversal with zero further fetches.
//! Emission order is the concatenation of page order; within a page the
//! upstream order is preserved.

use std::collections::VecDeque;

use async_stream::try_stream;
use futures_util::stream::Stream;

use crate::models::{CollectRequest, Cursor, Record};
use crate::sources::{FetchError, SourceAdapter};

/// An incremental sequence of records pulled from one adapter traversal.
///
/// Each traversal owns its own cursor and buffer; nothing is shared across
/// calls, and constructing a new `RecordStream` restarts from the first
/// page. The stream ends when the adapter stops returning a cursor, when the
/// next page-start offset would exceed the safety ceiling, or when the
/// consumer stops pulling.
///
/// A page-fetch failure is returned once from [`next`](Self::next) and
/// finishes the stream; records emitted for earlier pages stay valid in the
/// caller's hands.
pub struct RecordStream<'a> {
    adapter: &'a dyn SourceAdapter,
    request: CollectRequest,
    cursor: Option<Cursor>,
    offset: usize,
    safety_ceiling: Option<usize>,
    buffer: VecDeque<Record>,
    started: bool,
    done: bool,
}

impl<'a> RecordStream<'a> {
    /// Start a traversal of `request` against `adapter`. The safety ceiling
    /// is taken from the adapter.
    pub fn new(adapter: &'a dyn SourceAdapter, request: CollectRequest) -> Self {
        Self {
            safety_ceiling: adapter.safety_ceiling(),
            adapter,
            request,
            cursor: None,
            offset: 0,
            buffer: VecDeque::new(),
            started: false,
            done: false,
        }
    }

    /// Override the adapter's safety ceiling for this traversal
    pub fn with_safety_ceiling(mut self, ceiling: Option<usize>) -> Self {
        self.safety_ceiling = ceiling;
        self
    }

    /// Number of records fetched so far
    pub fn fetched(&self) -> usize {
        self.offset
    }

    /// Whether the traversal has finished
    pub fn is_done(&self) -> bool {
        self.done && self.buffer.is_empty()
    }

    /// Pull the next record, fetching at most one page if the buffer is
    /// empty.
    ///
    /// Returns `Ok(None)` on exhaustion. Returns `Err` exactly once if a
    /// page fetch fails; afterwards the stream reports exhaustion.
    pub async fn next(&mut self) -> Result<Option<Record>, FetchError> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Ok(Some(record));
            }
            if self.done {
                return Ok(None);
            }
            if self.started && self.cursor.is_none() {
                self.done = true;
                return Ok(None);
            }
            // The ceiling caps the page-start offset the next fetch would
            // use, which is carried by the cursor itself; pages can be
            // shorter than the cursor stride, so the emitted-record count is
            // not a proxy for it. Opaque URL cursors are uncapped.
            if let (Some(ceiling), Some(Cursor::Offset(offset))) =
                (self.safety_ceiling, self.cursor.as_ref())
            {
                if *offset > ceiling {
                    tracing::warn!(
                        offset,
                        ceiling,
                        "stopping traversal at safety ceiling"
                    );
                    self.done = true;
                    return Ok(None);
                }
            }

            let page = match self
                .adapter
                .fetch_page(&self.request, self.cursor.as_ref())
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    self.done = true;
                    return Err(e);
                }
            };

            self.started = true;
            self.offset += page.records.len();
            self.cursor = page.next;
            if page.records.is_empty() && self.cursor.is_none() {
                self.done = true;
                return Ok(None);
            }
            self.buffer.extend(page.records);
        }
    }

    /// Drain records into a caller-owned collection, stopping at `limit`
    /// records if one is given.
    ///
    /// On a fetch failure the error is returned but everything already
    /// appended to `out` stays there; partial results are never discarded.
    pub async fn drain_into(
        &mut self,
        out: &mut Vec<Record>,
        limit: Option<usize>,
    ) -> Result<(), FetchError> {
        loop {
            if let Some(limit) = limit {
                if out.len() >= limit {
                    return Ok(());
                }
            }
            match self.next().await? {
                Some(record) => out.push(record),
                None => return Ok(()),
            }
        }
    }

    /// Collect up to `limit` records into a fresh collection
    pub async fn collect_up_to(&mut self, limit: usize) -> Result<Vec<Record>, FetchError> {
        let mut records = Vec::new();
        self.drain_into(&mut records, Some(limit)).await?;
        Ok(records)
    }

    /// View the traversal as a [`Stream`] of results
    pub fn into_stream(mut self) -> impl Stream<Item = Result<Record, FetchError>> + 'a {
        try_stream! {
            while let Some(record) = self.next().await? {
                yield record;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Page;
    use crate::sources::mock::{make_record, ScriptedSource};
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_empty_source_ends_immediately() {
        let source = ScriptedSource::new();
        let mut stream = RecordStream::new(&source, CollectRequest::new("q"));

        assert!(stream.next().await.unwrap().is_none());
        assert!(stream.is_done());
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_single_page_in_order() {
        let source = ScriptedSource::new();
        source.push_page(Page::last(vec![make_record("a"), make_record("b")]));

        let mut stream = RecordStream::new(&source, CollectRequest::new("q"));
        let records = stream.collect_up_to(10).await.unwrap();

        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(stream.fetched(), 2);
    }

    #[tokio::test]
    async fn test_stream_view_yields_same_sequence() {
        let source = ScriptedSource::new();
        source.push_page(Page::new(
            vec![make_record("a")],
            Some(Cursor::Offset(1)),
        ));
        source.push_page(Page::last(vec![make_record("b")]));

        let stream = RecordStream::new(&source, CollectRequest::new("q"));
        let records: Vec<_> = stream
            .into_stream()
            .map(|r| r.unwrap().title)
            .collect::<Vec<_>>()
            .await;

        assert_eq!(records, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_intermediate_page_is_skipped() {
        let source = ScriptedSource::new();
        source.push_page(Page::new(vec![make_record("a")], Some(Cursor::Offset(1))));
        source.push_page(Page::new(Vec::new(), Some(Cursor::Offset(1))));
        source.push_page(Page::last(vec![make_record("b")]));

        let mut stream = RecordStream::new(&source, CollectRequest::new("q"));
        let records = stream.collect_up_to(10).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(source.fetch_count(), 3);
    }
}
