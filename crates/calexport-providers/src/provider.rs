//! The page-fetching seam between paging logic and HTTP.
//!
//! [`PageSource`] is "fetch this URL and give me the page". The real
//! implementation is [`crate::graph::GraphClient`]; tests substitute an
//! in-memory source.

use std::future::Future;
use std::pin::Pin;

use calexport_core::field;
use serde_json::Value;
use tracing::warn;

use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::RawEvent;

/// Key holding the events of a page.
pub const PAGE_ITEMS_KEY: &str = "value";

/// Key holding the continuation link of a page.
pub const NEXT_LINK_KEY: &str = "@odata.nextLink";

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One page of an event listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Events on this page, in server order.
    pub events: Vec<RawEvent>,
    /// Continuation link; `None` on the last page.
    pub next_link: Option<String>,
}

impl Page {
    /// Creates a page.
    pub fn new(events: Vec<RawEvent>, next_link: Option<String>) -> Self {
        Self { events, next_link }
    }

    /// Reads a page from a decoded response body.
    ///
    /// A body without an event list is an empty page. Entries that are not
    /// objects are skipped. An empty continuation link counts as none.
    pub fn from_value(body: &Value) -> ProviderResult<Self> {
        if !body.is_object() {
            return Err(ProviderError::invalid_response(
                "page body is not a JSON object",
            ));
        }

        let events = field::array(body, PAGE_ITEMS_KEY)
            .iter()
            .filter_map(|item| {
                let event = RawEvent::from_value(item.clone());
                if event.is_none() {
                    warn!("skipping non-object entry in event page");
                }
                event
            })
            .collect();

        let next_link = field::non_empty_str(body, NEXT_LINK_KEY).map(String::from);

        Ok(Self { events, next_link })
    }
}

/// Something that can fetch a page of events by URL.
pub trait PageSource: Send + Sync {
    /// Fetches the page at `url`.
    fn fetch_page<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ProviderResult<Page>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_events_and_next_link() {
        let body = json!({
            "value": [{"id": "1"}, {"id": "2"}],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/users/a/calendar/events?$skip=2"
        });
        let page = Page::from_value(&body).unwrap();
        assert_eq!(page.events.len(), 2);
        assert_eq!(page.events[0].id(), "1");
        assert!(page.next_link.is_some());
    }

    #[test]
    fn last_page_has_no_link() {
        let page = Page::from_value(&json!({"value": []})).unwrap();
        assert!(page.events.is_empty());
        assert!(page.next_link.is_none());

        let page = Page::from_value(&json!({"value": [], "@odata.nextLink": ""})).unwrap();
        assert!(page.next_link.is_none());
    }

    #[test]
    fn missing_value_is_empty_page() {
        let page = Page::from_value(&json!({"@odata.context": "x"})).unwrap();
        assert!(page.events.is_empty());
    }

    #[test]
    fn skips_non_object_entries() {
        let page = Page::from_value(&json!({"value": [{"id": "1"}, "junk", 3]})).unwrap();
        assert_eq!(page.events.len(), 1);
    }

    #[test]
    fn rejects_non_object_body() {
        assert!(Page::from_value(&json!([1, 2, 3])).is_err());
    }
}
