//! RawEvent to CanonicalEvent conversion.
//!
//! Field resolution for a Microsoft Graph event:
//!
//! | canonical field     | source                               | default      |
//! |---------------------|--------------------------------------|--------------|
//! | `event_id`          | `id`                                 | `""`         |
//! | `event_name`        | `subject`                            | `"No Title"` |
//! | `event_description` | `bodyPreview`                        | `""`         |
//! | `start_date`        | `start.dateTime`                     | `""`         |
//! | `end_date`          | `end.dateTime`                       | `""`         |
//! | `timezone`          | `start.timeZone`                     | `"UTC"`      |
//! | `meeting_url`       | `onlineMeeting.joinUrl`              | `""`         |
//! | `location`          | `location.displayName`               | `""`         |
//! | `is_cancelled`      | `isCancelled`                        | `false`      |
//! | `created_date`      | `createdDateTime`                    | `""`         |
//! | `modified_date`     | `lastModifiedDateTime`               | `""`         |
//!
//! The meeting URL comes only from the online-meeting object; the location
//! text is never inspected here.

use calexport_core::field;
use calexport_core::{Attendee, CanonicalEvent, DEFAULT_TIMEZONE, NO_RESPONSE, NO_TITLE};
use serde_json::Value;
use tracing::debug;

use crate::raw_event::RawEvent;

/// Converts one raw event of `owner` into a [`CanonicalEvent`].
///
/// Never fails: every missing field takes its default.
pub fn normalize_event(raw: RawEvent, owner: &str) -> CanonicalEvent {
    let value = raw.as_value();

    CanonicalEvent {
        user_email: owner.to_string(),
        event_id: field::str_or(value, "id", ""),
        event_name: field::str_or(value, "subject", NO_TITLE),
        event_description: field::str_or(value, "bodyPreview", ""),
        start_date: field::str_at(value, &["start", "dateTime"], ""),
        end_date: field::str_at(value, &["end", "dateTime"], ""),
        timezone: field::str_at(value, &["start", "timeZone"], DEFAULT_TIMEZONE),
        meeting_url: join_url(value),
        attendees: attendees(value),
        location: field::str_at(value, &["location", "displayName"], ""),
        is_cancelled: field::bool_or(value, "isCancelled", false),
        created_date: field::str_or(value, "createdDateTime", ""),
        modified_date: field::str_or(value, "lastModifiedDateTime", ""),
        online_meeting: field::object_or_empty(value, "onlineMeeting"),
        raw_event: raw.into_value(),
    }
}

/// Normalizes a sequence of raw events, in order.
///
/// Cancelled events are dropped unless `debug` is set. In debug mode every
/// kept event is traced with its title and meeting URL.
pub fn normalize_events(
    raw_events: impl IntoIterator<Item = RawEvent>,
    owner: &str,
    debug: bool,
) -> Vec<CanonicalEvent> {
    raw_events
        .into_iter()
        .filter(|raw| debug || !raw.is_cancelled())
        .map(|raw| {
            let event = normalize_event(raw, owner);
            if debug {
                trace_kept(&event);
            }
            event
        })
        .collect()
}

fn trace_kept(event: &CanonicalEvent) {
    if event.has_meeting_url() {
        debug!(
            title = %event.event_name,
            meeting_url = %event.meeting_url,
            "exported event"
        );
    } else {
        debug!(title = %event.event_name, "exported event");
    }
}

/// The online-meeting join URL, if the event has a non-empty meeting object.
fn join_url(value: &Value) -> String {
    field::object(value, "onlineMeeting")
        .filter(|meeting| !meeting.is_empty())
        .and_then(|meeting| meeting.get("joinUrl"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Attendees that expose an email address; the rest are dropped.
fn attendees(value: &Value) -> Vec<Attendee> {
    field::array(value, "attendees")
        .iter()
        .filter_map(|entry| {
            let address = field::get(entry, "emailAddress")?;
            let email = field::non_empty_str(address, "address")?;
            Some(
                Attendee::new(email)
                    .with_name(field::str_or(address, "name", ""))
                    .with_response(field::str_at(entry, &["status", "response"], NO_RESPONSE)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const OWNER: &str = "alice@example.com";

    fn raw(value: Value) -> RawEvent {
        RawEvent::from_value(value).unwrap()
    }

    fn full_event() -> Value {
        json!({
            "id": "AAMkAGI2",
            "subject": "Quarterly planning",
            "bodyPreview": "Agenda: roadmap",
            "start": {"dateTime": "2025-03-10T09:00:00.0000000", "timeZone": "Europe/Paris"},
            "end": {"dateTime": "2025-03-10T10:00:00.0000000", "timeZone": "Europe/Paris"},
            "location": {"displayName": "Room 4B"},
            "isCancelled": false,
            "createdDateTime": "2025-02-01T08:00:00Z",
            "lastModifiedDateTime": "2025-02-02T08:00:00Z",
            "onlineMeeting": {"joinUrl": "https://teams.microsoft.com/l/meetup-join/abc"},
            "attendees": [
                {
                    "emailAddress": {"address": "a@x.com", "name": "Ann"},
                    "status": {"response": "accepted"}
                },
                {
                    "emailAddress": {"address": "b@x.com"}
                },
                {
                    "type": "resource"
                }
            ]
        })
    }

    mod field_resolution {
        use super::*;

        #[test]
        fn maps_every_field() {
            let event = normalize_event(raw(full_event()), OWNER);

            assert_eq!(event.user_email, OWNER);
            assert_eq!(event.event_id, "AAMkAGI2");
            assert_eq!(event.event_name, "Quarterly planning");
            assert_eq!(event.event_description, "Agenda: roadmap");
            assert_eq!(event.start_date, "2025-03-10T09:00:00.0000000");
            assert_eq!(event.end_date, "2025-03-10T10:00:00.0000000");
            assert_eq!(event.timezone, "Europe/Paris");
            assert_eq!(
                event.meeting_url,
                "https://teams.microsoft.com/l/meetup-join/abc"
            );
            assert_eq!(event.location, "Room 4B");
            assert!(!event.is_cancelled);
            assert_eq!(event.created_date, "2025-02-01T08:00:00Z");
            assert_eq!(event.modified_date, "2025-02-02T08:00:00Z");
            assert_eq!(
                event.online_meeting,
                json!({"joinUrl": "https://teams.microsoft.com/l/meetup-join/abc"})
            );
        }

        #[test]
        fn keeps_raw_event_verbatim() {
            let event = normalize_event(raw(full_event()), OWNER);
            assert_eq!(event.raw_event, full_event());
        }

        #[test]
        fn empty_record_takes_every_default() {
            let event = normalize_event(raw(json!({})), OWNER);

            assert_eq!(event.event_id, "");
            assert_eq!(event.event_name, "No Title");
            assert_eq!(event.event_description, "");
            assert_eq!(event.start_date, "");
            assert_eq!(event.end_date, "");
            assert_eq!(event.timezone, "UTC");
            assert_eq!(event.meeting_url, "");
            assert!(event.attendees.is_empty());
            assert_eq!(event.location, "");
            assert!(!event.is_cancelled);
            assert_eq!(event.created_date, "");
            assert_eq!(event.modified_date, "");
            assert_eq!(event.online_meeting, json!({}));
        }

        #[test]
        fn nulls_and_wrong_types_take_defaults() {
            let event = normalize_event(
                raw(json!({
                    "subject": null,
                    "bodyPreview": 42,
                    "start": "2025-01-01",
                    "end": {"dateTime": null},
                    "location": null,
                    "attendees": {"not": "a list"},
                    "isCancelled": "yes",
                    "onlineMeeting": null
                })),
                OWNER,
            );

            assert_eq!(event.event_name, "No Title");
            assert_eq!(event.event_description, "");
            assert_eq!(event.start_date, "");
            assert_eq!(event.timezone, "UTC");
            assert_eq!(event.end_date, "");
            assert_eq!(event.location, "");
            assert!(event.attendees.is_empty());
            assert!(!event.is_cancelled);
            assert_eq!(event.meeting_url, "");
        }

        #[test]
        fn start_without_timezone_defaults_to_utc() {
            let event = normalize_event(
                raw(json!({"start": {"dateTime": "2025-03-10T09:00:00"}})),
                OWNER,
            );
            assert_eq!(event.start_date, "2025-03-10T09:00:00");
            assert_eq!(event.timezone, "UTC");
        }
    }

    mod meeting_url {
        use super::*;

        #[test]
        fn empty_online_meeting_object() {
            let event = normalize_event(raw(json!({"onlineMeeting": {}})), OWNER);
            assert_eq!(event.meeting_url, "");
        }

        #[test]
        fn online_meeting_without_join_url() {
            let event = normalize_event(
                raw(json!({"onlineMeeting": {"conferenceId": "123"}})),
                OWNER,
            );
            assert_eq!(event.meeting_url, "");
        }

        #[test]
        fn never_reads_location() {
            let event = normalize_event(
                raw(json!({"location": {"displayName": "https://zoom.us/j/123"}})),
                OWNER,
            );
            assert_eq!(event.meeting_url, "");
            assert_eq!(event.location, "https://zoom.us/j/123");
        }
    }

    mod attendee_extraction {
        use super::*;

        #[test]
        fn keeps_only_entries_with_email() {
            let event = normalize_event(raw(full_event()), OWNER);

            assert_eq!(
                event.attendees,
                vec![
                    Attendee::new("a@x.com")
                        .with_name("Ann")
                        .with_response("accepted"),
                    Attendee::new("b@x.com"),
                ]
            );
        }

        #[test]
        fn drops_empty_or_missing_address() {
            let event = normalize_event(
                raw(json!({"attendees": [
                    {"emailAddress": {"name": "No address"}},
                    {"emailAddress": {"address": ""}},
                    {"emailAddress": null},
                    "garbage"
                ]})),
                OWNER,
            );
            assert!(event.attendees.is_empty());
        }

        #[test]
        fn missing_status_is_none() {
            let event = normalize_event(
                raw(json!({"attendees": [{"emailAddress": {"address": "c@x.com"}, "status": {}}]})),
                OWNER,
            );
            assert_eq!(event.attendees[0].response, "none");
        }
    }

    mod cancellation {
        use super::*;

        fn batch() -> Vec<RawEvent> {
            vec![
                raw(json!({"id": "1", "subject": "Kept"})),
                raw(json!({"id": "2", "subject": "Cancelled", "isCancelled": true})),
                raw(json!({"id": "3", "subject": "Also kept", "isCancelled": false})),
            ]
        }

        fn ids(events: &[CanonicalEvent]) -> Vec<&str> {
            events.iter().map(|e| e.event_id.as_str()).collect()
        }

        #[test]
        fn drops_cancelled_without_debug() {
            let events = normalize_events(batch(), OWNER, false);
            assert_eq!(ids(&events), vec!["1", "3"]);
        }

        #[test]
        fn keeps_cancelled_with_debug() {
            let events = normalize_events(batch(), OWNER, true);
            assert_eq!(ids(&events), vec!["1", "2", "3"]);
            assert!(events[1].is_cancelled);
        }

        #[test]
        fn repeated_runs_agree() {
            assert_eq!(
                normalize_events(batch(), OWNER, false),
                normalize_events(batch(), OWNER, false)
            );
            assert_eq!(
                normalize_events(batch(), OWNER, true),
                normalize_events(batch(), OWNER, true)
            );
        }
    }

    mod debug_trace {
        use super::*;
        use std::io;
        use std::sync::{Arc, Mutex};

        /// Collects formatted log output in memory.
        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        impl Captured {
            fn lines(&self) -> Vec<String> {
                let bytes = self.0.lock().unwrap().clone();
                String::from_utf8(bytes)
                    .unwrap()
                    .lines()
                    .filter(|l| l.contains("exported event"))
                    .map(String::from)
                    .collect()
            }
        }

        fn normalize_traced(debug: bool) -> (Vec<CanonicalEvent>, Vec<String>) {
            let captured = Captured::default();
            let writer = captured.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_ansi(false)
                .without_time()
                .with_writer(move || writer.clone())
                .finish();

            let batch = vec![
                raw(json!({
                    "id": "1",
                    "subject": "Standup",
                    "onlineMeeting": {"joinUrl": "https://teams.microsoft.com/l/standup"}
                })),
                raw(json!({"id": "2", "subject": "Offsite", "isCancelled": true})),
                raw(json!({"id": "3", "subject": "Lunch"})),
            ];
            let events = tracing::subscriber::with_default(subscriber, || {
                normalize_events(batch, OWNER, debug)
            });
            (events, captured.lines())
        }

        #[test]
        fn one_line_per_kept_event() {
            let (events, lines) = normalize_traced(true);

            assert_eq!(events.len(), 3);
            assert_eq!(lines.len(), 3, "{:?}", lines);
            assert!(lines[0].contains("title=Standup"));
            assert!(lines[0].contains("meeting_url=https://teams.microsoft.com/l/standup"));
            assert!(lines[1].contains("title=Offsite"));
            assert!(!lines[1].contains("meeting_url"));
            assert!(lines[2].contains("title=Lunch"));
            assert!(!lines[2].contains("meeting_url"));
        }

        #[test]
        fn silent_without_debug() {
            let (events, lines) = normalize_traced(false);
            assert_eq!(events.len(), 2);
            assert!(lines.is_empty(), "{:?}", lines);
        }
    }
}
