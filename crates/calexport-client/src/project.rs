//! Projecting an export document into one CSV file per owner.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use calexport_core::{OwnerBucket, StoredDocument, StoredEvent, group_by_owner};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Column names, in output order.
pub const CSV_HEADER: [&str; 10] = [
    "event_id",
    "event_name",
    "event_description",
    "start_date",
    "end_date",
    "timezone",
    "meeting_url",
    "location",
    "attendees_emails",
    "attendees_count",
];

/// Separator between attendee emails in a single cell.
pub const ATTENDEE_SEPARATOR: &str = "; ";

/// One CSV file written by [`project`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerFile {
    pub owner: String,
    pub events: usize,
    pub path: PathBuf,
}

/// Outcome of a projection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionSummary {
    /// Events in the input document.
    pub total_events: usize,
    /// Distinct owners in the input document, before filtering.
    pub owners_found: usize,
    /// Files written, in owner order.
    pub files: Vec<OwnerFile>,
}

/// Reads an export document.
///
/// A missing file is reported as [`ClientError::InputNotFound`].
pub fn read_document(path: &Path) -> ClientResult<StoredDocument> {
    if !path.exists() {
        return Err(ClientError::InputNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|e| ClientError::io(path, e))?;
    StoredDocument::from_json(&content).map_err(|source| ClientError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })
}

/// Keeps only the bucket whose owner matches `filter`, ignoring ASCII case.
///
/// Without a filter every bucket is kept.
pub fn select_buckets(buckets: Vec<OwnerBucket>, filter: Option<&str>) -> Vec<OwnerBucket> {
    match filter {
        None => buckets,
        Some(wanted) => {
            let selected: Vec<_> = buckets
                .into_iter()
                .filter(|b| b.owner.eq_ignore_ascii_case(wanted))
                .collect();
            if selected.is_empty() {
                warn!(owner = wanted, "no events for the requested owner, nothing written");
            }
            selected
        }
    }
}

/// Builds the CSV row for one record.
pub fn csv_row(event: &StoredEvent) -> [String; 10] {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    [
        text(&event.event_id),
        text(&event.event_name),
        text(&event.event_description),
        text(&event.start_date),
        text(&event.end_date),
        text(&event.timezone),
        event.display_meeting_url().to_string(),
        text(&event.location),
        event.attendee_emails().join(ATTENDEE_SEPARATOR),
        event.attendee_count().to_string(),
    ]
}

/// File name for an owner's CSV. Path separators in the owner become `_`.
pub fn csv_file_name(bucket: &OwnerBucket) -> String {
    let base = bucket.base_name().replace(['/', '\\'], "_");
    format!("{}_events.csv", base)
}

/// Writes one owner's records to `<dir>/<base>_events.csv`, replacing any
/// existing file.
pub fn write_owner_csv(bucket: &OwnerBucket, dir: &Path) -> ClientResult<PathBuf> {
    let path = dir.join(csv_file_name(bucket));

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(&path)
        .map_err(|e| ClientError::csv(&path, e))?;

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| ClientError::csv(&path, e))?;
    for event in &bucket.events {
        writer
            .write_record(csv_row(event))
            .map_err(|e| ClientError::csv(&path, e))?;
    }
    writer.flush().map_err(|e| ClientError::io(&path, e))?;

    debug!(owner = %bucket.owner, rows = bucket.events.len(), path = %path.display(), "wrote csv");
    Ok(path)
}

/// Reads `input`, groups its records by owner and writes one CSV per owner
/// into `output_dir`.
///
/// The input is checked before anything is created, so a missing input
/// leaves the file system untouched. Otherwise `output_dir` is created even
/// when there is nothing to write.
pub fn project(
    input: &Path,
    output_dir: &Path,
    filter: Option<&str>,
) -> ClientResult<ProjectionSummary> {
    let document = read_document(input)?;
    let total_events = document.events.len();

    let buckets = group_by_owner(document.events);
    let owners_found = buckets.len();
    let selected = select_buckets(buckets, filter);

    std::fs::create_dir_all(output_dir).map_err(|e| ClientError::io(output_dir, e))?;

    let mut names = HashSet::new();
    let files = selected
        .iter()
        .map(|bucket| {
            let name = csv_file_name(bucket);
            if !names.insert(name.clone()) {
                warn!(
                    owner = %bucket.owner,
                    file = %name,
                    "file name already used by another owner, overwriting"
                );
            }
            write_owner_csv(bucket, output_dir).map(|path| OwnerFile {
                owner: bucket.owner.clone(),
                events: bucket.events.len(),
                path,
            })
        })
        .collect::<ClientResult<Vec<_>>>()?;

    Ok(ProjectionSummary {
        total_events,
        owners_found,
        files,
    })
}
