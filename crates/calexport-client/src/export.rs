//! Writing export documents to disk.

use std::path::{Path, PathBuf};

use calexport_core::{ExportDocument, JsonStyle};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// What was written by [`write_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Number of events in the document.
    pub total_events: usize,
    /// Number of events that carry a meeting join URL.
    pub with_meeting_url: usize,
    /// Path of the written file.
    pub output: PathBuf,
}

/// Serializes `document` to `path`, creating the parent directory if needed.
///
/// An existing file is replaced.
pub fn write_document(
    document: &ExportDocument,
    path: &Path,
    style: JsonStyle,
) -> ClientResult<ExportSummary> {
    let json = document.to_json(style).map_err(ClientError::Serialize)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ClientError::io(parent, e))?;
    }
    std::fs::write(path, json).map_err(|e| ClientError::io(path, e))?;
    debug!(path = %path.display(), ?style, "wrote export document");

    Ok(ExportSummary {
        total_events: document.events.len(),
        with_meeting_url: document.meeting_url_count(),
        output: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use calexport_core::{CanonicalEvent, StoredDocument};

    fn document() -> ExportDocument {
        let mut with_url = CanonicalEvent::new("a@x.com", "1");
        with_url.event_name = "Réunion".to_string();
        with_url.meeting_url = "https://teams.microsoft.com/l/1".to_string();
        let plain = CanonicalEvent::new("a@x.com", "2");
        ExportDocument::new("a@x.com", vec![with_url, plain], false)
    }

    #[test]
    fn writes_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("export.json");

        let summary = write_document(&document(), &path, JsonStyle::Pretty).unwrap();

        assert_eq!(summary.total_events, 2);
        assert_eq!(summary.with_meeting_url, 1);
        assert_eq!(summary.output, path);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"export_info\""));
        assert!(text.contains("Réunion"));
    }

    #[test]
    fn written_document_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        write_document(&document(), &path, JsonStyle::Compact).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains('\n'));

        let stored = StoredDocument::from_json(&text).unwrap();
        assert_eq!(stored.events.len(), 2);
        assert_eq!(stored.events[0].event_name.as_deref(), Some("Réunion"));
    }

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, "stale contents that are longer than nothing").unwrap();

        let empty = ExportDocument::new("a@x.com", Vec::new(), false);
        let summary = write_document(&empty, &path, JsonStyle::Compact).unwrap();

        assert_eq!(summary.total_events, 0);
        let stored = StoredDocument::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(stored.events.is_empty());
    }
}
