//! Paginated stream for lazy iteration over listing endpoints.
//!
//! A [`PaginatedStream`] turns a paged listing into a single `Stream` of
//! records. Pages are fetched one at a time, only when the consumer has
//! used up the records of the previous page:
//!
//! 1. page 1, with the caller's query unchanged (no `page` parameter)
//! 2. pages `2..last` with `page=n`, in ascending order
//! 3. the last page (`page=last`)
//!
//! The page count comes from `lastPage` of the first response. With fewer
//! than two pages the first page doubles as the last page and nothing
//! else is fetched. The first and last page are cached, so
//! [`size`](PaginatedStream::size) and
//! [`total_pages`](PaginatedStream::total_pages) never cost more than one
//! request each, before, during or after iteration.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use serde::de::DeserializeOwned;

use super::ClientInner;
use crate::models::{ApiResponse, Query};
use crate::Result;

/// Type alias for a boxed future used internally.
type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Fetches one page; `None` requests the first page without a page number.
type PageFetcher = Box<dyn Fn(Option<u32>) -> BoxFuture<'static, Result<ApiResponse>> + Send + Sync>;

/// Which page a fetch is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    First,
    Middle(u32),
    Last(u32),
}

impl Slot {
    fn page(self) -> Option<u32> {
        match self {
            Slot::First => None,
            Slot::Middle(page) | Slot::Last(page) => Some(page),
        }
    }
}

/// Next step of the iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    First,
    Middle(u32),
    Last,
    Done,
}

struct PendingFetch {
    slot: Slot,
    future: BoxFuture<'static, Result<ApiResponse>>,
}

/// A stream that lazily fetches pages from a listing endpoint.
///
/// Items are `Result<T>`; a failed page fetch is yielded once as an error
/// and ends the stream. Each stream tracks its own fetch state and is
/// exhausted after one traversal; create a new one to start over.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
/// use dotypos_rs::Query;
///
/// # async fn example(client: dotypos_rs::DotyposClient) -> dotypos_rs::Result<()> {
/// let mut categories = client.categories().list(Query::new());
///
/// println!("{} categories on {} pages", categories.size().await?, categories.total_pages().await?);
///
/// while let Some(result) = categories.next().await {
///     let category = result?;
///     println!("{}", category["name"]);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PaginatedStream<T> {
    fetch_page: PageFetcher,
    data_key: String,
    first_page: Option<ApiResponse>,
    last_page: Option<ApiResponse>,
    /// Records of the current page not yet yielded.
    buffer: VecDeque<T>,
    cursor: Cursor,
    pending: Option<PendingFetch>,
}

impl<T: DeserializeOwned> PaginatedStream<T> {
    /// Create a stream over `resource`, reading records from `data_key`.
    pub(crate) fn new(
        inner: Arc<ClientInner>,
        resource: impl Into<String>,
        data_key: impl Into<String>,
        query: Query,
    ) -> Self {
        let resource = resource.into();

        Self::from_fetcher(data_key, move |page: Option<u32>| {
            let inner = inner.clone();
            let resource = resource.clone();
            let query = match page {
                Some(page) => query.with_page(page),
                None => query.clone(),
            };

            Box::pin(async move { inner.get(&resource, &query).await?.error_for_status() })
        })
    }

    /// Create a stream from a page-fetching function.
    pub(crate) fn from_fetcher<F>(data_key: impl Into<String>, fetch_page: F) -> Self
    where
        F: Fn(Option<u32>) -> BoxFuture<'static, Result<ApiResponse>> + Send + Sync + 'static,
    {
        Self {
            fetch_page: Box::new(fetch_page),
            data_key: data_key.into(),
            first_page: None,
            last_page: None,
            buffer: VecDeque::new(),
            cursor: Cursor::First,
            pending: None,
        }
    }

    /// The first page, fetched on first use.
    pub async fn first_page(&mut self) -> Result<&ApiResponse> {
        let page = match self.first_page.take() {
            Some(page) => page,
            None => self.fetch(Slot::First).await?,
        };
        Ok(self.first_page.insert(page))
    }

    /// The last page. Same as the first page when there are fewer than two.
    pub async fn last_page(&mut self) -> Result<&ApiResponse> {
        let total = self.total_pages().await?;
        if total < 2 {
            return self.first_page().await;
        }

        let page = match self.last_page.take() {
            Some(page) => page,
            None => self.fetch(Slot::Last(total)).await?,
        };
        Ok(self.last_page.insert(page))
    }

    /// Number of pages, as reported by the first page.
    pub async fn total_pages(&mut self) -> Result<u32> {
        Ok(self.first_page().await?.last_page())
    }

    /// Number of records across all pages, as reported by the first page.
    pub async fn size(&mut self) -> Result<u64> {
        Ok(self.first_page().await?.total_items_count())
    }

    /// Fetch a page, reusing the stream's in-flight request for the same
    /// page if there is one.
    async fn fetch(&mut self, slot: Slot) -> Result<ApiResponse> {
        match self.pending.take() {
            Some(pending) if pending.slot == slot => pending.future.await,
            other => {
                self.pending = other;
                tracing::debug!(data_key = %self.data_key, page = ?slot.page(), "fetching page");
                (self.fetch_page)(slot.page()).await
            }
        }
    }

    fn start(&mut self, slot: Slot) {
        tracing::debug!(data_key = %self.data_key, page = ?slot.page(), "fetching page");
        self.pending = Some(PendingFetch {
            slot,
            future: (self.fetch_page)(slot.page()),
        });
    }

    /// Page count known from the cached first page.
    fn known_total_pages(&self) -> u32 {
        self.first_page.as_ref().map_or(0, ApiResponse::last_page)
    }

    /// Store a completed fetch.
    fn accept(&mut self, slot: Slot, page: ApiResponse) -> Result<()> {
        match slot {
            Slot::First => self.first_page = Some(page),
            Slot::Last(_) => self.last_page = Some(page),
            Slot::Middle(n) => {
                self.buffer.extend(page.records::<T>(&self.data_key)?);
                self.cursor = Cursor::Middle(n + 1);
            }
        }
        Ok(())
    }

    /// Move the cursor one step: load cached records, start a fetch, or
    /// skip ahead.
    fn advance(&mut self) -> Result<()> {
        match self.cursor {
            Cursor::First => match &self.first_page {
                Some(page) => {
                    self.buffer.extend(page.records::<T>(&self.data_key)?);
                    self.cursor = if page.last_page() > 1 {
                        Cursor::Middle(2)
                    } else {
                        Cursor::Done
                    };
                }
                None => self.start(Slot::First),
            },
            Cursor::Middle(n) => {
                if n < self.known_total_pages() {
                    self.start(Slot::Middle(n));
                } else {
                    self.cursor = Cursor::Last;
                }
            }
            Cursor::Last => match &self.last_page {
                Some(page) => {
                    self.buffer.extend(page.records::<T>(&self.data_key)?);
                    self.cursor = Cursor::Done;
                }
                None => self.start(Slot::Last(self.known_total_pages())),
            },
            Cursor::Done => {}
        }
        Ok(())
    }
}

impl<T: DeserializeOwned> Stream for PaginatedStream<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if let Some(item) = this.buffer.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if let Some(pending) = this.pending.as_mut() {
                let polled = pending.future.as_mut().poll(cx);
                match polled {
                    Poll::Ready(result) => {
                        let slot = pending.slot;
                        this.pending = None;

                        if let Err(e) = result.and_then(|page| this.accept(slot, page)) {
                            this.cursor = Cursor::Done;
                            return Poll::Ready(Some(Err(e)));
                        }
                        continue;
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            if this.cursor == Cursor::Done {
                return Poll::Ready(None);
            }

            if let Err(e) = this.advance() {
                this.cursor = Cursor::Done;
                return Poll::Ready(Some(Err(e)));
            }
        }
    }
}

impl<T> Unpin for PaginatedStream<T> {}

impl<T> std::fmt::Debug for PaginatedStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedStream")
            .field("data_key", &self.data_key)
            .field("cursor", &self.cursor)
            .field("buffered", &self.buffer.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use futures_util::{StreamExt, TryStreamExt};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Page requests issued so far; `None` is the unnumbered first page.
    type Calls = Arc<Mutex<Vec<Option<u32>>>>;

    fn listing(total_items: u64, per_page: u64) -> (PaginatedStream<Value>, Calls) {
        paged(total_items, per_page)
    }

    /// A listing of `total_items` records split into pages of `per_page`.
    fn paged<T: DeserializeOwned>(total_items: u64, per_page: u64) -> (PaginatedStream<T>, Calls) {
        let calls: Calls = Arc::default();
        let recorded = calls.clone();
        let last_page = total_items.div_ceil(per_page).max(1);

        let stream = PaginatedStream::from_fetcher("data", move |page: Option<u32>| {
            recorded.lock().unwrap().push(page);
            let number = u64::from(page.unwrap_or(1));
            let start = (number - 1) * per_page;
            let end = (start + per_page).min(total_items);
            let records: Vec<Value> = (start..end).map(|id| json!({ "id": id })).collect();

            let response = if total_items == 0 {
                ApiResponse::no_results()
            } else {
                ApiResponse::new(
                    200,
                    json!({
                        "data": records,
                        "totalItemsCount": total_items,
                        "lastPage": last_page,
                    }),
                )
            };
            Box::pin(async move { Ok::<_, Error>(response) })
        });

        (stream, calls)
    }

    fn ids(records: &[Value]) -> Vec<u64> {
        records.iter().map(|r| r["id"].as_u64().unwrap()).collect()
    }

    fn recorded(calls: &Calls) -> Vec<Option<u32>> {
        calls.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let (mut stream, calls) = listing(0, 10);

        assert_eq!(stream.size().await.unwrap(), 0);
        let records: Vec<Value> = stream.try_collect().await.unwrap();

        assert!(records.is_empty());
        assert_eq!(recorded(&calls), vec![None]);
    }

    #[tokio::test]
    async fn test_single_page_fetched_once() {
        let (stream, calls) = listing(3, 10);

        let records: Vec<Value> = stream.try_collect().await.unwrap();

        assert_eq!(ids(&records), vec![0, 1, 2]);
        assert_eq!(recorded(&calls), vec![None]);
    }

    #[tokio::test]
    async fn test_pages_in_ascending_order() {
        let (stream, calls) = listing(45, 10);

        let records: Vec<Value> = stream.try_collect().await.unwrap();

        assert_eq!(ids(&records), (0..45).collect::<Vec<_>>());
        assert_eq!(
            recorded(&calls),
            vec![None, Some(2), Some(3), Some(4), Some(5)]
        );
    }

    #[tokio::test]
    async fn test_two_pages() {
        let (stream, calls) = listing(15, 10);

        let records: Vec<Value> = stream.try_collect().await.unwrap();

        assert_eq!(ids(&records), (0..15).collect::<Vec<_>>());
        assert_eq!(recorded(&calls), vec![None, Some(2)]);
    }

    #[tokio::test]
    async fn test_stops_at_consumption_point() {
        let (mut stream, calls) = listing(45, 10);

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first["id"], 0);
        assert_eq!(recorded(&calls), vec![None]);

        // The rest of page 1 comes from the buffer
        let rest: Vec<Value> = stream.by_ref().take(9).try_collect().await.unwrap();
        assert_eq!(rest.len(), 9);
        assert_eq!(recorded(&calls), vec![None]);

        stream.next().await.unwrap().unwrap();
        assert_eq!(recorded(&calls), vec![None, Some(2)]);
    }

    #[tokio::test]
    async fn test_size_and_total_pages_are_memoized() {
        let (mut stream, calls) = listing(45, 10);

        assert_eq!(stream.total_pages().await.unwrap(), 5);
        assert_eq!(stream.size().await.unwrap(), 45);
        assert_eq!(stream.last_page().await.unwrap().last_page(), 5);
        assert_eq!(stream.size().await.unwrap(), 45);
        assert_eq!(stream.last_page().await.unwrap().last_page(), 5);
        assert_eq!(recorded(&calls), vec![None, Some(5)]);

        // Traversal reuses both cached pages
        let records: Vec<Value> = stream.by_ref().try_collect().await.unwrap();
        assert_eq!(ids(&records), (0..45).collect::<Vec<_>>());
        assert_eq!(
            recorded(&calls),
            vec![None, Some(5), Some(2), Some(3), Some(4)]
        );

        assert_eq!(stream.total_pages().await.unwrap(), 5);
        assert_eq!(stream.size().await.unwrap(), 45);
        assert_eq!(recorded(&calls).len(), 5);
    }

    #[tokio::test]
    async fn test_last_page_is_first_page_when_single() {
        let (mut stream, calls) = listing(4, 10);

        let first = stream.first_page().await.unwrap().clone();
        let last = stream.last_page().await.unwrap().clone();

        assert_eq!(first, last);
        assert_eq!(recorded(&calls), vec![None]);
    }

    #[tokio::test]
    async fn test_missing_last_page_treated_as_single_page() {
        let calls: Calls = Arc::default();
        let recorded_calls = calls.clone();
        let mut stream = PaginatedStream::<Value>::from_fetcher("data", move |page| {
            recorded_calls.lock().unwrap().push(page);
            Box::pin(async { Ok::<_, Error>(ApiResponse::new(200, json!({ "data": [{ "id": 7 }] }))) })
        });

        assert_eq!(stream.total_pages().await.unwrap(), 0);
        let records: Vec<Value> = stream.by_ref().try_collect().await.unwrap();

        assert_eq!(ids(&records), vec![7]);
        assert_eq!(recorded(&calls), vec![None]);
    }

    #[tokio::test]
    async fn test_typed_records() {
        #[derive(serde::Deserialize)]
        struct Row {
            id: u64,
        }

        let (stream, _) = paged::<Row>(12, 5);

        let rows: Vec<Row> = stream.try_collect().await.unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), (0..12).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_error_mid_stream_ends_stream() {
        let mut stream = PaginatedStream::<Value>::from_fetcher("data", |page| {
            Box::pin(async move {
                match page {
                    None => Ok::<_, Error>(ApiResponse::new(
                        200,
                        json!({ "data": [{ "id": 1 }], "totalItemsCount": 3, "lastPage": 3 }),
                    )),
                    Some(_) => ApiResponse::new(500, json!({ "message": "boom" })).error_for_status(),
                }
            })
        });

        assert_eq!(stream.next().await.unwrap().unwrap()["id"], 1);
        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Api { status: 500, .. }));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_data_key_is_an_error() {
        let mut stream = PaginatedStream::<Value>::from_fetcher("products", |_| {
            Box::pin(async { Ok::<_, Error>(ApiResponse::new(200, json!({ "data": [], "lastPage": 1 }))) })
        });

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(_)));
        assert!(stream.next().await.is_none());
    }
}
