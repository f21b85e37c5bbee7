//! Single-flight search session state machine.
//!
//! `SearchSession` owns the [`ResultStore`] and the observer registry and
//! performs no I/O: [`SearchSession::begin`] decides whether a request may
//! start and returns the [`PageRequest`] to execute, and
//! [`SearchSession::complete`] merges the outcome. The orchestrator runs the
//! network call between the two.
//!
//! ```text
//! Idle --begin--> Loading --complete(Ok)--> Idle  (append + results_updated)
//!                 Loading --complete(Err)-> Idle  (store untouched + error)
//! ```

use poimap_core::ResultPage;
use poimap_geo::DEFAULT_PAGE_SIZE;
use uuid::Uuid;

use crate::error::SearchError;
use crate::observer::{ObserverId, ObserverRegistry, SearchObserver};
use crate::store::{ResultStore, StoreChange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
}

/// What the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTarget {
    /// Page 1 of a new keyword.
    Start(String),
    /// The page after the last merged one, for the current keyword.
    Next,
    /// An explicit page.
    Page { keyword: String, page: u32 },
}

/// A request the session has accepted and moved to `Loading` for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub keyword: String,
    pub page: u32,
    pub page_size: u32,
}

/// Result of asking the session for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Started(PageRequest),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing loaded yet, so there is no "next" page.
    EmptyStore,
    /// The provider has no more results for the current keyword.
    Exhausted,
    /// The list is not scrolled to its end.
    NotAtEnd,
    /// A request is already running; the scroll trigger swallows `Busy`.
    InFlight,
}

#[derive(Debug)]
pub struct SearchSession {
    store: ResultStore,
    state: LoadState,
    page_size: u32,
    session_id: Option<Uuid>,
    observers: ObserverRegistry,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl SearchSession {
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            store: ResultStore::new(),
            state: LoadState::Idle,
            page_size: page_size.max(1),
            session_id: None,
            observers: ObserverRegistry::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    #[must_use]
    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Identifier of the current keyword session, regenerated on every
    /// page-1 request. Used to correlate log records.
    #[must_use]
    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn register(&mut self, observer: Box<dyn SearchObserver>) -> ObserverId {
        self.observers.register(observer)
    }

    pub fn unregister(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    /// Validates `target` and, if accepted, moves to `Loading`.
    ///
    /// A page-1 request clears the store immediately and notifies observers
    /// with [`StoreChange::Reset`].
    ///
    /// # Errors
    ///
    /// - [`SearchError::Busy`] if a request is already in flight; nothing changes.
    /// - [`SearchError::InvalidRequest`] for a blank keyword or page 0.
    pub fn begin(&mut self, target: PageTarget) -> Result<Dispatch, SearchError> {
        let (keyword, page) = match target {
            PageTarget::Start(keyword) => (keyword, 1),
            PageTarget::Page { keyword, page } => (keyword, page),
            PageTarget::Next => {
                if self.store.is_empty() {
                    return Ok(Dispatch::Skipped(SkipReason::EmptyStore));
                }
                if self.store.is_exhausted() {
                    return Ok(Dispatch::Skipped(SkipReason::Exhausted));
                }
                (
                    self.store.current_keyword().to_owned(),
                    self.store.current_page().saturating_add(1),
                )
            }
        };

        if self.state == LoadState::Loading {
            tracing::debug!(keyword = %keyword, page, "rejecting page request while loading");
            return Err(SearchError::Busy);
        }

        let keyword = keyword.trim().to_owned();
        if keyword.is_empty() {
            return Err(SearchError::InvalidRequest(
                "search keyword must not be empty".to_owned(),
            ));
        }
        if page == 0 {
            return Err(SearchError::InvalidRequest(
                "page numbers start at 1".to_owned(),
            ));
        }

        self.state = LoadState::Loading;
        self.observers.loading_changed(true);

        if page == 1 {
            self.session_id = Some(Uuid::new_v4());
            self.store.reset();
            self.observers
                .results_updated(&self.store.snapshot(), StoreChange::Reset);
        }

        tracing::info!(
            session = ?self.session_id,
            keyword = %keyword,
            page,
            page_size = self.page_size,
            "page request started"
        );

        Ok(Dispatch::Started(PageRequest {
            keyword,
            page,
            page_size: self.page_size,
        }))
    }

    /// Merges the outcome of `request` and returns to `Idle`.
    ///
    /// On success the page is appended and observers get the new snapshot.
    /// On failure the store is left as it was and observers get the error.
    /// Observers always see `loading = false` last.
    pub fn complete(&mut self, request: &PageRequest, outcome: Result<ResultPage, SearchError>) {
        if self.state != LoadState::Loading {
            tracing::warn!(
                keyword = %request.keyword,
                page = request.page,
                "ignoring completion with no request in flight"
            );
            return;
        }
        self.state = LoadState::Idle;

        match outcome {
            Ok(page) => {
                let items = page.items.len();
                let change = self.store.append(page);
                tracing::info!(
                    session = ?self.session_id,
                    keyword = %request.keyword,
                    page = self.store.current_page(),
                    items,
                    accumulated = self.store.len(),
                    "page merged"
                );
                self.observers
                    .results_updated(&self.store.snapshot(), change);
            }
            Err(err) => {
                tracing::warn!(
                    session = ?self.session_id,
                    keyword = %request.keyword,
                    page = request.page,
                    kind = %err.kind(),
                    error = %err,
                    "page request failed"
                );
                self.observers.error(err.kind(), &err.to_string());
            }
        }

        self.observers.loading_changed(false);
    }
}
