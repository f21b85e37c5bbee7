//! Scroll-to-load: request the next page when the list is scrolled to its
//! last item and cannot scroll further down.

use crate::error::SearchError;
use crate::orchestrator::SearchHandle;
use crate::session::{Dispatch, SkipReason};

/// What the list view reports after a scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    /// Index of the last (partially) visible row, `None` if nothing is shown.
    pub last_visible_index: Option<usize>,
    /// Number of rows currently in the list.
    pub item_count: usize,
    /// Whether the view still has room to scroll down.
    pub can_scroll_down: bool,
}

impl ScrollPosition {
    /// `true` when the last row is visible and there is no scroll room left.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.item_count > 0
            && !self.can_scroll_down
            && self.last_visible_index == Some(self.item_count - 1)
    }
}

/// Turns scroll positions into next-page requests.
///
/// There is no debouncing here: duplicate triggers while a page is loading
/// are absorbed by the orchestrator's busy check and reported as
/// [`SkipReason::InFlight`].
#[derive(Debug, Clone)]
pub struct ScrollToLoad {
    handle: SearchHandle,
}

impl ScrollToLoad {
    #[must_use]
    pub fn new(handle: SearchHandle) -> Self {
        Self { handle }
    }

    /// Call after every scroll event.
    ///
    /// # Errors
    ///
    /// Propagates [`SearchError::Closed`]; `Busy` is mapped to
    /// `Dispatch::Skipped(SkipReason::InFlight)`.
    pub async fn on_scrolled(&self, position: ScrollPosition) -> Result<Dispatch, SearchError> {
        if position.item_count == 0 {
            return Ok(Dispatch::Skipped(SkipReason::EmptyStore));
        }
        if !position.at_end() {
            return Ok(Dispatch::Skipped(SkipReason::NotAtEnd));
        }

        match self.handle.request_next_page().await {
            Err(SearchError::Busy) => {
                tracing::debug!("end of list reached while a page is loading");
                Ok(Dispatch::Skipped(SkipReason::InFlight))
            }
            other => other,
        }
    }
}
