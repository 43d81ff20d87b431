//! The in-memory entry collection and its persistence.
//!
//! [`EntryBook`] owns the journal as a single JSON array stored under
//! [`ENTRIES_KEY`]. Storage failures never escape: a failed load yields an
//! empty book and a failed write is logged and otherwise ignored.

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::db::KeyValueStore;
use crate::journal::types::{count_words, format_date, ExportData, JournalEntry, EXPORT_VERSION};

/// Store key holding the serialized entry collection.
pub const ENTRIES_KEY: &str = "journal_entries";

/// Outcome of [`EntryBook::import`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Journal entries, most recent first.
pub struct EntryBook {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<JournalEntry>,
}

impl EntryBook {
    /// Load the collection from `store`. Missing or unreadable data gives an empty book.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.get(ENTRIES_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<JournalEntry>>(&json) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "stored journal is not valid JSON, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read journal, starting empty");
                Vec::new()
            }
        };
        debug!(count = entries.len(), "journal loaded");
        Self { store, entries }
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Save `content` as the entry `current_id`, or as a new entry.
    ///
    /// See [`save_entry_at`](Self::save_entry_at).
    pub fn save_entry(&mut self, current_id: Option<&str>, content: &str) -> Option<&JournalEntry> {
        self.save_entry_at(current_id, content, Utc::now())
    }

    /// Save `content` with `now` as the creation time for new entries.
    ///
    /// Blank content saves nothing and returns `None`. An existing id keeps its
    /// date, title and position; only content and word count change. An id that
    /// is not in the book (or no id) creates a new entry at the front.
    pub fn save_entry_at(
        &mut self,
        current_id: Option<&str>,
        content: &str,
        now: DateTime<Utc>,
    ) -> Option<&JournalEntry> {
        let content = content.trim();
        if content.is_empty() {
            debug!("nothing to save");
            return None;
        }

        let index = match current_id.and_then(|id| self.position(id)) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.content = content.to_string();
                entry.word_count = count_words(content);
                debug!(id = %entry.id, words = entry.word_count, "entry updated");
                index
            }
            None => {
                let id = current_id
                    .map(str::to_string)
                    .unwrap_or_else(|| uuid::Uuid::now_v7().to_string());
                let entry = JournalEntry::new(id, content, now);
                debug!(id = %entry.id, words = entry.word_count, "entry created");
                self.entries.insert(0, entry);
                0
            }
        };

        self.persist();
        self.entries.get(index)
    }

    /// Remove an entry. Returns `false` if no entry has that id.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn set_title(&mut self, id: &str, title: &str) -> bool {
        self.update_title(id, Some(title.trim().to_string()))
    }

    /// Drop an entry's title without touching its content.
    pub fn clear_title(&mut self, id: &str) -> bool {
        self.update_title(id, None)
    }

    fn update_title(&mut self, id: &str, title: Option<String>) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.entries[index].title = title;
        self.persist();
        true
    }

    /// Entries whose content or local date contains `query` (case-insensitive).
    pub fn filter(&self, query: &str) -> Vec<&JournalEntry> {
        self.filter_in(query, &Local)
    }

    pub fn filter_in<Tz: TimeZone>(&self, query: &str, tz: &Tz) -> Vec<&JournalEntry>
    where
        Tz::Offset: Display,
    {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries
            .iter()
            .filter(|e| {
                e.content.to_lowercase().contains(&query)
                    || format_date(&e.date, tz).contains(&query)
            })
            .collect()
    }

    /// Merge entries whose ids are not already present, then re-sort newest first.
    pub fn import(&mut self, data: ExportData) -> ImportReport {
        let mut report = ImportReport {
            imported: 0,
            skipped: 0,
        };

        for entry in data.entries {
            if self.position(&entry.id).is_some() {
                report.skipped += 1;
                continue;
            }
            self.entries.push(entry);
            report.imported += 1;
        }

        self.entries.sort_by(|a, b| b.date.cmp(&a.date));
        self.persist();

        info!(
            imported = report.imported,
            skipped = report.skipped,
            "journal import finished"
        );
        report
    }

    pub fn export(&self) -> ExportData {
        ExportData {
            version: EXPORT_VERSION.to_string(),
            export_date: Some(Utc::now()),
            entries: self.entries.clone(),
        }
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize journal");
                return;
            }
        };
        if let Err(e) = self.store.set(ENTRIES_KEY, &json) {
            warn!(error = %e, "failed to save journal");
        }
    }
}

/// Group entries under day headings relative to `now`.
///
/// Headings are `Today`, `Yesterday`, or `Weekday, Month D` (with `, YYYY`
/// appended outside the current year). Groups keep first-seen order.
pub fn group_by_day<'a, Tz: TimeZone>(
    entries: impl IntoIterator<Item = &'a JournalEntry>,
    now: &DateTime<Tz>,
) -> Vec<(String, Vec<&'a JournalEntry>)>
where
    Tz::Offset: Display,
{
    let tz = now.timezone();
    let today = now.date_naive();
    let yesterday = today.pred_opt();

    let mut groups: Vec<(String, Vec<&'a JournalEntry>)> = Vec::new();
    for entry in entries {
        let local = entry.date.with_timezone(&tz);
        let day = local.date_naive();
        let label = if day == today {
            "Today".to_string()
        } else if Some(day) == yesterday {
            "Yesterday".to_string()
        } else if day.year() == today.year() {
            local.format("%A, %B %-d").to_string()
        } else {
            local.format("%A, %B %-d, %Y").to_string()
        };

        match groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, group)) => group.push(entry),
            None => groups.push((label, vec![entry])),
        }
    }
    groups
}
