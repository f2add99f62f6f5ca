//! Lazy iteration over a server-side paged list endpoint.
//!
//! # Design
//! A `Paginator` wraps any [`PageSource`] (normally a resource service's
//! `search`) and presents it as one sequence of entities. It buffers a single
//! page and asks for the next one only when the buffer drains, so nothing is
//! fetched at construction and stopping early costs nothing.
//!
//! The sequence is bounded by the total count observed on the first fetch.
//! That total is kept for the rest of the pass even if later pages report a
//! different one; the source is treated as a stable snapshot. Iteration also
//! stops on the first empty page, so an overstated total cannot loop forever.
//! Consistency under concurrent server-side inserts or deletes is not
//! guaranteed: items may shift across page boundaries between fetches.
//!
//! A `Paginator` is single-consumer. Use independent instances to consume the
//! same search from several threads.

use std::collections::VecDeque;
use std::num::NonZeroU32;

use tracing::{debug, warn};

use crate::collection::{Collection, PageInfo};
use crate::config::{self, DEFAULT_PAGE_SIZE};
use crate::error::Result;
use crate::search::SearchParams;

/// Something that can return one page of a search.
pub trait PageSource {
    type Item;

    /// Fetch the page described by `params.offset` and `params.limit`.
    fn fetch_page(&self, params: &SearchParams) -> Result<Collection<Self::Item>>;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    type Item = S::Item;

    fn fetch_page(&self, params: &SearchParams) -> Result<Collection<Self::Item>> {
        (**self).fetch_page(params)
    }
}

pub struct Paginator<S: PageSource> {
    source: S,
    params: SearchParams,
    page_size: NonZeroU32,
    /// Offset of the buffered page, or of the next page once it is consumed.
    offset: u64,
    total: Option<u64>,
    buffer: VecDeque<S::Item>,
    /// Length of the buffered page while it has not yet been added to `offset`.
    pending: Option<usize>,
    current: Option<PageInfo>,
    exhausted: bool,
}

impl<S: PageSource> Paginator<S> {
    /// Start at `params.offset` (or 0). `params.limit` is ignored in favour of
    /// the page size.
    pub fn new(source: S, params: SearchParams) -> Self {
        Self {
            source,
            offset: params.offset.unwrap_or(0),
            params,
            page_size: DEFAULT_PAGE_SIZE,
            total: None,
            buffer: VecDeque::new(),
            pending: None,
            current: None,
            exhausted: false,
        }
    }

    /// Items requested per page. Fails with `ApiError::Config` for zero,
    /// like `ClientConfig::with_page_size`.
    pub fn with_page_size(self, page_size: u32) -> Result<Self> {
        Ok(self.sized(config::nonzero_page_size(page_size)?))
    }

    pub fn sized(mut self, page_size: NonZeroU32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.get()
    }

    /// Offset the next fetch will use once the buffered page is consumed.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Total count, if a page has been fetched yet.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Metadata of the most recently fetched page.
    pub fn current_page(&self) -> Option<&PageInfo> {
        self.current.as_ref()
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Total number of items across all pages.
    ///
    /// Served from cache when known; otherwise one minimal page (limit 1) is
    /// fetched for its count and its items are discarded. Neither the
    /// iteration cursor nor `current_page` is touched.
    pub fn total_count(&mut self) -> Result<u64> {
        if let Some(total) = self.total {
            return Ok(total);
        }
        let page = self.fetch(0, 1)?;
        Ok(page.total())
    }

    /// Fetch page `index` (zero-based) directly.
    ///
    /// The page's offset becomes the resume point of sequential iteration:
    /// anything still buffered is dropped and the next call to `next` starts
    /// at the first item of this page.
    pub fn page(&mut self, index: u64) -> Result<Collection<S::Item>> {
        let offset = index.saturating_mul(u64::from(self.page_size.get()));
        let page = self.fetch(offset, self.page_size.get())?;
        self.current = Some(page.info());
        self.offset = offset;
        self.buffer.clear();
        self.pending = None;
        self.exhausted = false;
        Ok(page)
    }

    /// Fetch the next whole page, or `None` when the sequence is done.
    ///
    /// Any items of the current page not yet yielded by `next` are skipped.
    pub fn next_page(&mut self) -> Option<Result<Collection<S::Item>>> {
        self.advance().transpose()
    }

    /// Page-at-a-time view of this paginator.
    pub fn pages(&mut self) -> Pages<'_, S> {
        Pages { paginator: self }
    }

    fn advance(&mut self) -> Result<Option<Collection<S::Item>>> {
        if let Some(len) = self.pending.take() {
            self.offset += len as u64;
        }
        self.buffer.clear();

        if self.exhausted {
            return Ok(None);
        }
        if let Some(total) = self.total {
            if self.offset >= total {
                self.exhausted = true;
                return Ok(None);
            }
        }

        let page = self.fetch(self.offset, self.page_size.get())?;
        self.current = Some(page.info());
        if page.is_empty() {
            debug!(offset = self.offset, total = ?self.total, "empty page, stopping");
            self.exhausted = true;
            return Ok(None);
        }
        self.pending = Some(page.len());
        Ok(Some(page))
    }

    fn fetch(&mut self, offset: u64, limit: u32) -> Result<Collection<S::Item>> {
        debug!(offset, limit, "fetching page");
        let page = self.source.fetch_page(&self.params.page(offset, limit))?;

        match self.total {
            None => self.total = Some(page.total()),
            Some(known) if known != page.total() => {
                warn!(
                    known,
                    reported = page.total(),
                    "total count changed mid-iteration, keeping the first one"
                );
            }
            Some(_) => {}
        }
        Ok(page)
    }
}

impl<S: PageSource> Iterator for Paginator<S> {
    type Item = Result<S::Item>;

    /// Errors from the source are yielded where the fetch happened; calling
    /// `next` again retries the same offset.
    fn next(&mut self) -> Option<Self::Item> {
        if let Some(item) = self.buffer.pop_front() {
            return Some(Ok(item));
        }
        match self.advance() {
            Ok(Some(page)) => {
                self.buffer.extend(page);
                self.buffer.pop_front().map(Ok)
            }
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.buffer.len(), None)
    }
}

/// Iterator over whole pages, borrowed from a [`Paginator`].
pub struct Pages<'p, S: PageSource> {
    paginator: &'p mut Paginator<S>,
}

impl<S: PageSource> Iterator for Pages<'_, S> {
    type Item = Result<Collection<S::Item>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.paginator.next_page()
    }
}
