use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Identity of a rendered page: its path, compared verbatim.
pub type PageId = String;

/// Every page's notes, in creation order per page.
pub type NotesByPage = BTreeMap<PageId, Vec<Note>>;

/// A single note attached to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "NoteRecord")]
pub struct Note {
    pub id: String,
    pub content: String,
    /// ISO-8601 creation time. Older blobs stored this as `timestamp`.
    pub created_at: String,
    /// ISO-8601 time of the last edit. Older blobs stored this as `updated`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Fields this crate doesn't know about, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A note as found in a blob. Old and new field names may both be present
/// when two versions of the overlay have edited the same note.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteRecord {
    id: String,
    content: String,
    created_at: Option<String>,
    timestamp: Option<String>,
    updated_at: Option<String>,
    updated: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        // ISO-8601 UTC strings order chronologically
        let updated_at = match (record.updated_at, record.updated) {
            (Some(new), Some(old)) => Some(new.max(old)),
            (new, old) => new.or(old),
        };
        Self {
            id: record.id,
            content: record.content,
            created_at: record.created_at.or(record.timestamp).unwrap_or_default(),
            updated_at,
            extra: record.extra,
        }
    }
}

impl Note {
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            created_at: timestamp(created_at),
            updated_at: None,
            extra: Map::new(),
        }
    }

    /// Whether the note has been edited since creation.
    pub fn is_edited(&self) -> bool {
        self.updated_at.is_some()
    }

    /// Local date and time of creation, for display.
    pub fn created_label(&self) -> String {
        format_created_at(&self.created_at)
    }
}

/// Format a UTC instant the way browsers' `Date.toISOString()` does,
/// e.g. `2024-03-01T09:30:00.000Z`.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a stored creation time in the local timezone.
///
/// Unparsable input is returned as-is rather than hidden.
pub fn format_created_at(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(at) => at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_matches_browser_iso_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(timestamp(at), "2024-03-01T09:30:00.000Z");
    }

    #[test]
    fn test_serializes_camel_case_without_missing_update() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let note = Note::new("1709285400000", "hello", at);
        let json = serde_json::to_value(&note).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "1709285400000",
                "content": "hello",
                "createdAt": "2024-03-01T09:30:00.000Z",
            })
        );
    }

    #[test]
    fn test_reads_legacy_field_names() {
        let note: Note = serde_json::from_str(
            r#"{"content":"old","timestamp":"2023-01-01T00:00:00.000Z","id":"1","updated":"2023-01-02T00:00:00.000Z"}"#,
        )
        .unwrap();

        assert_eq!(note.created_at, "2023-01-01T00:00:00.000Z");
        assert_eq!(note.updated_at.as_deref(), Some("2023-01-02T00:00:00.000Z"));
        assert!(note.is_edited());

        let rewritten = serde_json::to_value(&note).unwrap();
        assert!(rewritten.get("createdAt").is_some());
        assert!(rewritten.get("timestamp").is_none());
    }

    #[test]
    fn test_reads_note_with_old_and_new_names() {
        let note: Note = serde_json::from_str(
            r#"{"id":"1","content":"both","createdAt":"2024-01-01T00:00:00.000Z","timestamp":"2023-01-01T00:00:00.000Z","updatedAt":"2024-02-01T00:00:00.000Z","updated":"2024-03-01T00:00:00.000Z"}"#,
        )
        .unwrap();

        assert_eq!(note.created_at, "2024-01-01T00:00:00.000Z");
        // The later edit wins, whichever name it was written under
        assert_eq!(note.updated_at.as_deref(), Some("2024-03-01T00:00:00.000Z"));

        let rewritten = serde_json::to_value(&note).unwrap();
        assert!(rewritten.get("updated").is_none());
        assert!(rewritten.get("timestamp").is_none());
    }

    #[test]
    fn test_keeps_unknown_fields() {
        let raw = r#"{"id":"1","content":"x","createdAt":"2024-01-01T00:00:00.000Z","color":"yellow","pinned":true}"#;
        let note: Note = serde_json::from_str(raw).unwrap();
        assert_eq!(note.extra.get("color"), Some(&Value::from("yellow")));

        assert_eq!(
            serde_json::to_value(&note).unwrap(),
            serde_json::from_str::<Value>(raw).unwrap()
        );
    }

    #[test]
    fn test_format_created_at() {
        let label = format_created_at("2024-03-01T09:30:00.000Z");
        // Exact value depends on the local timezone.
        assert_eq!(label.len(), "2024-03-01 09:30:00".len());
        assert!(label.starts_with("2024-0"));

        assert_eq!(format_created_at("yesterday"), "yesterday");
    }
}
