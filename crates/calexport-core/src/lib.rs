//! Core types: canonical events, export document, field access, grouping, meeting links

pub mod document;
pub mod event;
pub mod field;
pub mod group;
pub mod links;
pub mod tracing;

pub use document::{ExportDocument, ExportInfo, JsonStyle, StoredDocument};
pub use event::{
    Attendee, CanonicalEvent, DEFAULT_TIMEZONE, NO_RESPONSE, NO_TITLE, StoredAttendee, StoredEvent,
};
pub use group::{OwnerBucket, UNKNOWN_OWNER, group_by_owner};
pub use links::{location_has_link, resolve_meeting_url};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
