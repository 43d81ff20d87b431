//! Journal entry and export file types.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Version tag written into export files.
pub const EXPORT_VERSION: &str = "1.0";

/// One journal note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Opaque unique identifier (UUID v7 for entries created here).
    pub id: String,
    /// The text of the entry, trimmed on save.
    pub content: String,
    /// When the entry was first saved. Later edits keep this value.
    pub date: DateTime<Utc>,
    /// Whitespace-separated word count of `content`.
    #[serde(default)]
    pub word_count: usize,
    /// Optional short label shown in listings.
    #[serde(default)]
    pub title: Option<String>,
}

impl JournalEntry {
    pub fn new(id: impl Into<String>, content: impl Into<String>, date: DateTime<Utc>) -> Self {
        let content = content.into();
        Self {
            id: id.into(),
            word_count: count_words(&content),
            content,
            date,
            title: None,
        }
    }

    /// `M/D/YYYY` in the given time zone.
    pub fn date_label<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: Display,
    {
        format_date(&self.date, tz)
    }
}

/// Format a timestamp as `M/D/YYYY` in `tz`.
pub fn format_date<Tz: TimeZone>(date: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    date.with_timezone(tz).format("%-m/%-d/%Y").to_string()
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The JSON document produced by export and accepted by import.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub export_date: Option<DateTime<Utc>>,
    pub entries: Vec<JournalEntry>,
}

fn default_version() -> String {
    EXPORT_VERSION.to_string()
}
