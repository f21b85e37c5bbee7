//! Accumulated, paginated search results.
//!
//! Items are stored behind an `Arc` so snapshots handed to observers stay
//! immutable: appending while a snapshot is alive copies the list first
//! (`Arc::make_mut`), leaving the old snapshot untouched.

use std::sync::Arc;

use poimap_core::{ResultPage, SearchResult};

/// Immutable view of the accumulated results at one point in time.
pub type Snapshot = Arc<Vec<SearchResult>>;

/// Describes how the list changed so a renderer can update incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    /// The list was cleared.
    Reset,
    /// `len` items were appended starting at index `start`.
    Appended { start: usize, len: usize },
}

#[derive(Debug, Default)]
pub struct ResultStore {
    accumulated: Snapshot,
    current_page: u32,
    current_keyword: String,
    total_count: Option<u32>,
    received: usize,
    last_page_empty: bool,
}

impl ResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the accumulated results. Page and keyword bookkeeping is kept
    /// until the next successful append overwrites it.
    pub fn reset(&mut self) {
        self.accumulated = Arc::new(Vec::new());
        self.total_count = None;
        self.received = 0;
        self.last_page_empty = false;
    }

    /// Appends a page in order and records its page number and keyword.
    ///
    /// Items are never deduplicated: overlapping pages keep every copy.
    pub fn append(&mut self, page: ResultPage) -> StoreChange {
        let start = self.accumulated.len();
        let len = page.items.len();
        let received = page.received();
        Arc::make_mut(&mut self.accumulated).extend(page.items);

        self.current_page = page.page_number;
        self.current_keyword = page.query_keyword;
        if page.total_count.is_some() {
            self.total_count = page.total_count;
        }
        self.received += received;
        self.last_page_empty = received == 0;

        StoreChange::Appended { start, len }
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.accumulated)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accumulated.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty()
    }

    /// Page number of the last merged page (0 before the first merge).
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub fn current_keyword(&self) -> &str {
        &self.current_keyword
    }

    /// `true` once the provider has nothing more to return for the current
    /// keyword: the last page had no records at all, or the provider has
    /// already sent the reported total.
    ///
    /// Records dropped during normalization count as received, so a page
    /// whose records were all unusable does not end pagination.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.last_page_empty
            || self
                .total_count
                .is_some_and(|total| self.received >= total as usize)
    }
}
