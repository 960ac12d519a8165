//! The export document handed from the fetcher to the projector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use serde_json::Value;

use crate::event::{CanonicalEvent, StoredEvent};
use crate::field;

/// Metadata describing one export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportInfo {
    /// Mailbox that was exported.
    pub user_email: String,
    /// When the export was produced.
    pub export_date: DateTime<Utc>,
    /// Number of events in the document.
    pub total_events: usize,
    /// Whether cancelled events were kept.
    pub debug_mode: bool,
}

/// Serialization layout for an export document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonStyle {
    /// No inserted whitespace.
    #[default]
    Compact,
    /// Two-space indented, one field per line.
    Pretty,
}

/// Export metadata plus the ordered normalized events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub export_info: ExportInfo,
    pub events: Vec<CanonicalEvent>,
}

impl ExportDocument {
    /// Builds a document stamped with the current time.
    pub fn new(user_email: impl Into<String>, events: Vec<CanonicalEvent>, debug: bool) -> Self {
        Self::at(user_email, events, debug, Utc::now())
    }

    /// Builds a document stamped with `export_date`.
    pub fn at(
        user_email: impl Into<String>,
        events: Vec<CanonicalEvent>,
        debug: bool,
        export_date: DateTime<Utc>,
    ) -> Self {
        Self {
            export_info: ExportInfo {
                user_email: user_email.into(),
                export_date,
                total_events: events.len(),
                debug_mode: debug,
            },
            events,
        }
    }

    /// Number of events that carry a meeting join URL.
    pub fn meeting_url_count(&self) -> usize {
        self.events.iter().filter(|e| e.has_meeting_url()).count()
    }

    /// Serializes the document. Non-ASCII text is kept as UTF-8.
    pub fn to_json(&self, style: JsonStyle) -> serde_json::Result<String> {
        match style {
            JsonStyle::Compact => serde_json::to_string(self),
            JsonStyle::Pretty => serde_json::to_string_pretty(self),
        }
    }
}

/// The part of an export document the projector reads.
///
/// A document without an `events` list reads as empty. Records are read
/// with [`StoredEvent::from_value`], so one odd record never fails the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredDocument {
    pub events: Vec<StoredEvent>,
}

impl StoredDocument {
    /// Parses a document from JSON text. Only malformed JSON is an error.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    /// Reads a document from a decoded JSON value.
    pub fn from_value(value: &Value) -> Self {
        Self {
            events: field::array(value, "events")
                .iter()
                .map(StoredEvent::from_value)
                .collect(),
        }
    }
}
