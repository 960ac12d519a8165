//! Canonical event records.
//!
//! [`CanonicalEvent`] is the storage-ready shape written by the fetcher.
//! [`StoredEvent`] is the tolerant view the projector reads back: every field
//! is optional so documents written by other tools still project. Numbers and
//! booleans are read as text; other mismatched values read as absent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{field, links};

/// Title used when the source event has no subject.
pub const NO_TITLE: &str = "No Title";

/// Timezone label used when the source event does not carry one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Response status used when an attendee has not responded.
pub const NO_RESPONSE: &str = "none";

/// An attendee of an exported event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    /// The attendee's email address. Never empty.
    pub email: String,
    /// Display name, empty when the source has none.
    pub name: String,
    /// Response status as reported by the source (`accepted`, `declined`, ...).
    pub response: String,
}

impl Attendee {
    /// Creates an attendee with no name and no response.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: String::new(),
            response: NO_RESPONSE.to_string(),
        }
    }

    /// Builder method to set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder method to set the response status.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }
}

/// A normalized calendar event for one owner.
///
/// Field names are the persisted JSON keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    /// Mailbox whose calendar this event was exported from.
    pub user_email: String,
    /// Identifier assigned by the calendar service.
    pub event_id: String,
    /// Event title.
    pub event_name: String,
    /// Plain-text preview of the event body.
    pub event_description: String,
    /// Start instant as reported by the service, empty if unknown.
    pub start_date: String,
    /// End instant as reported by the service, empty if unknown.
    pub end_date: String,
    /// Timezone label of the start instant.
    pub timezone: String,
    /// Online-meeting join URL, empty if the event has none.
    pub meeting_url: String,
    /// Attendees that have an email address.
    pub attendees: Vec<Attendee>,
    /// Free-text location display name.
    pub location: String,
    /// Whether the organizer cancelled the event.
    pub is_cancelled: bool,
    /// Creation instant, empty if unknown.
    pub created_date: String,
    /// Last modification instant, empty if unknown.
    pub modified_date: String,
    /// The online-meeting object as sent by the service (`{}` when absent).
    pub online_meeting: Value,
    /// The complete source record.
    pub raw_event: Value,
}

impl CanonicalEvent {
    /// Creates an event with every optional field at its default.
    pub fn new(user_email: impl Into<String>, event_id: impl Into<String>) -> Self {
        Self {
            user_email: user_email.into(),
            event_id: event_id.into(),
            event_name: NO_TITLE.to_string(),
            event_description: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            meeting_url: String::new(),
            attendees: Vec::new(),
            location: String::new(),
            is_cancelled: false,
            created_date: String::new(),
            modified_date: String::new(),
            online_meeting: Value::Object(Default::default()),
            raw_event: Value::Object(Default::default()),
        }
    }

    /// Returns true if the event carries a meeting join URL.
    pub fn has_meeting_url(&self) -> bool {
        !self.meeting_url.is_empty()
    }
}

/// An attendee as read back from an export document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredAttendee {
    /// Email address, if present.
    pub email: Option<String>,
    /// Display name, if present.
    pub name: Option<String>,
}

impl StoredAttendee {
    /// Reads an attendee entry. Non-object entries have no fields.
    pub fn from_value(value: &Value) -> Self {
        Self {
            email: field::text_opt(value, "email"),
            name: field::text_opt(value, "name"),
        }
    }
}

/// An exported event as read back by the projector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredEvent {
    pub user_email: Option<String>,
    pub event_id: Option<String>,
    pub event_name: Option<String>,
    pub event_description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub timezone: Option<String>,
    pub meeting_url: Option<String>,
    pub location: Option<String>,
    pub attendees: Vec<StoredAttendee>,
}

impl StoredEvent {
    /// Reads one event record of an export document. Never fails.
    pub fn from_value(value: &Value) -> Self {
        Self {
            user_email: field::text_opt(value, "user_email"),
            event_id: field::text_opt(value, "event_id"),
            event_name: field::text_opt(value, "event_name"),
            event_description: field::text_opt(value, "event_description"),
            start_date: field::text_opt(value, "start_date"),
            end_date: field::text_opt(value, "end_date"),
            timezone: field::text_opt(value, "timezone"),
            meeting_url: field::text_opt(value, "meeting_url"),
            location: field::text_opt(value, "location"),
            attendees: field::array(value, "attendees")
                .iter()
                .map(StoredAttendee::from_value)
                .collect(),
        }
    }

    /// Meeting URL to display, preferring a link found in the location.
    ///
    /// See [`links::resolve_meeting_url`].
    pub fn display_meeting_url(&self) -> &str {
        links::resolve_meeting_url(
            self.location.as_deref().unwrap_or_default(),
            self.meeting_url.as_deref().unwrap_or_default(),
        )
    }

    /// Emails of the attendees that have one, in document order.
    pub fn attendee_emails(&self) -> Vec<&str> {
        self.attendees
            .iter()
            .filter_map(|a| a.email.as_deref())
            .filter(|email| !email.is_empty())
            .collect()
    }

    /// Number of attendee entries, with or without an email.
    pub fn attendee_count(&self) -> usize {
        self.attendees.len()
    }
}
