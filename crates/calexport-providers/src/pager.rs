//! Walking a paginated event listing.
//!
//! The service returns events in pages; each page but the last carries a
//! continuation link. [`PageWalker`] follows those links one request at a
//! time, in server order, until a page has none.

use tracing::{debug, warn};
use url::Url;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::PageSource;
use crate::raw_event::RawEvent;

/// Lazily walks the pages of an event listing.
///
/// Each call to [`next_page`](Self::next_page) issues at most one request.
/// The walk ends after the last page or after the first failure.
pub struct PageWalker<'a, S: PageSource + ?Sized> {
    source: &'a S,
    next: Option<ProviderResult<String>>,
    pages: usize,
}

impl<'a, S: PageSource + ?Sized> PageWalker<'a, S> {
    /// Creates a walker starting at `start_url`.
    pub fn new(source: &'a S, start_url: impl Into<String>) -> Self {
        Self {
            source,
            next: Some(Ok(start_url.into())),
            pages: 0,
        }
    }

    /// Number of pages fetched successfully so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Fetches the next page.
    ///
    /// Returns `None` once the walk is over. After an `Err` the walk is over.
    pub async fn next_page(&mut self) -> Option<ProviderResult<Vec<RawEvent>>> {
        let url = match self.next.take()? {
            Ok(url) => url,
            Err(e) => return Some(Err(e)),
        };

        debug!(page = self.pages + 1, "fetching event page");
        let page = match self.source.fetch_page(&url).await {
            Ok(page) => page,
            Err(e) => return Some(Err(e)),
        };

        self.pages += 1;
        debug!(
            page = self.pages,
            events = page.events.len(),
            more = page.next_link.is_some(),
            "fetched event page"
        );

        self.next = page.next_link.map(|link| validate_link(&link).map(|_| link));
        Some(Ok(page.events))
    }

    /// Drains the walker, keeping everything fetched before any failure.
    pub async fn walk(mut self) -> WalkOutcome {
        let mut events = Vec::new();
        let mut error = None;

        while let Some(result) = self.next_page().await {
            match result {
                Ok(page) => events.extend(page),
                Err(e) => {
                    warn!(
                        pages = self.pages,
                        events = events.len(),
                        "stopping pagination: {}",
                        e
                    );
                    error = Some(e);
                }
            }
        }

        WalkOutcome {
            events,
            pages: self.pages,
            error,
        }
    }
}

/// Everything a finished walk produced.
#[derive(Debug)]
pub struct WalkOutcome {
    /// Events from every page fetched, in server order.
    pub events: Vec<RawEvent>,
    /// Number of pages fetched successfully.
    pub pages: usize,
    /// The failure that ended the walk early, if any.
    pub error: Option<ProviderError>,
}

impl WalkOutcome {
    /// Returns true if every page was fetched.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// A continuation link must be an absolute URL.
fn validate_link(link: &str) -> ProviderResult<()> {
    Url::parse(link).map(|_| ()).map_err(|e| {
        ProviderError::invalid_response(format!("invalid continuation link {:?}: {}", link, e))
            .with_source(e)
    })
}
