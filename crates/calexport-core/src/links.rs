//! Meeting link resolution for the CSV projection.
//!
//! Some organizers paste the join link into the free-text location instead of
//! creating an online meeting. When the location looks like a link it is
//! preferred over the stored `meeting_url`, which lets documents exported
//! without this heuristic still surface those links.
//!
//! ```
//! use calexport_core::links::resolve_meeting_url;
//!
//! let url = resolve_meeting_url("Join via https://zoom.us/j/123", "https://teams.microsoft.com/x");
//! assert_eq!(url, "Join via https://zoom.us/j/123");
//! assert_eq!(resolve_meeting_url("Room 4B", "https://teams.microsoft.com/x"), "https://teams.microsoft.com/x");
//! assert_eq!(resolve_meeting_url("", ""), "");
//! ```

/// Substrings that mark a location as a meeting link (matched case-insensitively).
pub const LOCATION_LINK_MARKERS: [&str; 3] = ["http", "zoom.us", "teams.microsoft.com"];

/// Returns true if the location text looks like a meeting link.
pub fn location_has_link(location: &str) -> bool {
    if location.is_empty() {
        return false;
    }
    let lower = location.to_lowercase();
    LOCATION_LINK_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Picks the meeting URL to display for a record.
///
/// First match wins:
/// 1. the location text, verbatim, when it looks like a link
/// 2. the stored meeting URL, when non-empty
/// 3. the empty string
pub fn resolve_meeting_url<'a>(location: &'a str, meeting_url: &'a str) -> &'a str {
    if location_has_link(location) {
        location
    } else if !meeting_url.is_empty() {
        meeting_url
    } else {
        ""
    }
}
