//! Microsoft Graph calendar provider and the fetch pipeline.
//!
//! ```text
//! ┌─────────────────┐
//! │ Authenticator   │  tenant/client/secret -> bearer token
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐      ┌─────────────┐
//! │  PageWalker     │ ───▶ │ PageSource  │  GraphClient (or a test double)
//! └────────┬────────┘      └─────────────┘
//!          │ RawEvent
//!          ▼ normalize_events()
//!   ┌──────────────────┐
//!   │ CanonicalEvent   │
//!   └──────────────────┘
//! ```

pub mod error;
pub mod fetch;
pub mod graph;
pub mod normalize;
pub mod pager;
pub mod provider;
pub mod raw_event;

// Re-export main types at crate root
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use fetch::{OwnerExport, export_owner, export_owners};
pub use normalize::{normalize_event, normalize_events};
pub use pager::{PageWalker, WalkOutcome};
pub use provider::{BoxFuture, Page, PageSource};
pub use raw_event::RawEvent;
