//! Journal entries and their persisted collection.

pub mod book;
pub mod types;

pub use book::{group_by_day, EntryBook, ImportReport, ENTRIES_KEY};
pub use types::{ExportData, JournalEntry};
