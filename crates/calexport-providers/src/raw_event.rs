//! Raw event type from the calendar service.
//!
//! A [`RawEvent`] is the event object exactly as the service returned it. Its
//! schema is not ours, so it is kept as a JSON object and read through the
//! accessors in [`calexport_core::field`], where absence is never an error.

use calexport_core::field;
use serde::Serialize;
use serde_json::Value;

/// A calendar event as returned by the service.
///
/// Always wraps a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawEvent(Value);

impl RawEvent {
    /// Wraps a JSON value. Returns `None` if it is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        value.is_object().then_some(Self(value))
    }

    /// The underlying JSON object.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the event, returning the underlying JSON object.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// The service identifier, empty if absent.
    pub fn id(&self) -> String {
        field::str_or(&self.0, "id", "")
    }

    /// The subject, if the event has one.
    pub fn subject(&self) -> Option<&str> {
        field::str_opt(&self.0, "subject")
    }

    /// Returns true if the event is flagged as cancelled.
    pub fn is_cancelled(&self) -> bool {
        field::bool_or(&self.0, "isCancelled", false)
    }
}
