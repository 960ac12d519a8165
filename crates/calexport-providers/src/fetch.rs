//! Per-owner fetch pipeline: walk every page, then normalize.
//!
//! A page failure never escapes from here. The owner's export is cut short,
//! the failure is logged and kept on the result, and whatever was fetched is
//! still normalized.

use calexport_core::CanonicalEvent;
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::graph::GraphConfig;
use crate::normalize::normalize_events;
use crate::pager::PageWalker;
use crate::provider::PageSource;

/// The result of exporting one owner's calendar.
#[derive(Debug)]
pub struct OwnerExport {
    /// Mailbox that was exported.
    pub owner: String,
    /// Normalized events, in server order.
    pub events: Vec<CanonicalEvent>,
    /// Raw events received before filtering.
    pub fetched: usize,
    /// The page failure that cut the export short, if any.
    pub error: Option<ProviderError>,
}

impl OwnerExport {
    /// Returns true if every page was fetched.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Exports the calendar of `owner`, starting at `start_url`.
pub async fn export_owner<S: PageSource + ?Sized>(
    source: &S,
    start_url: &str,
    owner: &str,
    debug: bool,
) -> OwnerExport {
    let outcome = PageWalker::new(source, start_url).walk().await;
    let fetched = outcome.events.len();

    if let Some(ref e) = outcome.error {
        warn!(
            %owner,
            fetched,
            pages = outcome.pages,
            "export incomplete, keeping events fetched so far: {}",
            e
        );
    }

    let events = normalize_events(outcome.events, owner, debug);
    info!(%owner, fetched, exported = events.len(), "exported calendar");

    OwnerExport {
        owner: owner.to_string(),
        events,
        fetched,
        error: outcome.error,
    }
}

/// Exports several owners one after another.
///
/// A failure for one owner does not stop the others.
pub async fn export_owners<S: PageSource + ?Sized>(
    source: &S,
    config: &GraphConfig,
    owners: &[String],
    debug: bool,
) -> Vec<OwnerExport> {
    let mut exports = Vec::with_capacity(owners.len());
    for owner in owners {
        let url = config.events_url(owner);
        exports.push(export_owner(source, &url, owner, debug).await);
    }
    exports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderResult;
    use crate::provider::{BoxFuture, Page};
    use crate::raw_event::RawEvent;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves pages from closures keyed on call order.
    struct ScriptedSource {
        calls: AtomicUsize,
        script: Vec<fn(&str) -> ProviderResult<Page>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<fn(&str) -> ProviderResult<Page>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                script,
            }
        }
    }

    impl PageSource for ScriptedSource {
        fn fetch_page<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ProviderResult<Page>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let result = match self.script.get(n) {
                Some(step) => step(url),
                None => Err(ProviderError::server("unexpected request")),
            };
            Box::pin(async move { result })
        }
    }

    fn raw(value: Value) -> RawEvent {
        RawEvent::from_value(value).unwrap()
    }

    fn first_page(_: &str) -> ProviderResult<Page> {
        Ok(Page::new(
            vec![
                raw(json!({"id": "1", "subject": "Standup"})),
                raw(json!({"id": "2", "subject": "Off", "isCancelled": true})),
            ],
            Some("https://graph.test/next".to_string()),
        ))
    }

    fn failing_page(_: &str) -> ProviderResult<Page> {
        Err(ProviderError::network("connection reset"))
    }

    fn echo_owner_page(url: &str) -> ProviderResult<Page> {
        Ok(Page::new(vec![raw(json!({"id": url}))], None))
    }

    #[tokio::test]
    async fn partial_pages_are_still_exported() {
        let source = ScriptedSource::new(vec![first_page, failing_page]);

        let export = export_owner(&source, "https://graph.test/start", "a@x.com", false).await;

        assert!(!export.is_complete());
        assert_eq!(export.fetched, 2);
        assert_eq!(export.events.len(), 1);
        assert_eq!(export.events[0].event_name, "Standup");
        assert_eq!(export.events[0].user_email, "a@x.com");
    }

    #[tokio::test]
    async fn debug_keeps_cancelled() {
        let source = ScriptedSource::new(vec![first_page, failing_page]);
        let export = export_owner(&source, "https://graph.test/start", "a@x.com", true).await;
        assert_eq!(export.events.len(), 2);
    }

    #[tokio::test]
    async fn owners_are_exported_in_turn() {
        let source = ScriptedSource::new(vec![failing_page, echo_owner_page]);
        let config = GraphConfig::new().with_graph_base("https://graph.test");
        let owners = vec!["a@x.com".to_string(), "b@x.com".to_string()];

        let exports = export_owners(&source, &config, &owners, false).await;

        assert_eq!(exports.len(), 2);
        assert!(exports[0].events.is_empty());
        assert!(exports[0].error.is_some());
        assert!(exports[1].is_complete());
        assert_eq!(
            exports[1].events[0].event_id,
            "https://graph.test/users/b%40x.com/calendar/events?$top=1000"
        );
        assert_eq!(exports[1].events[0].user_email, "b@x.com");
    }
}
