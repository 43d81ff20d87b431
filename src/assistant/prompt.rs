//! The instruction template wrapped around journal context.

use chrono::TimeZone;
use std::fmt::Display;

use crate::journal::types::{format_date, JournalEntry};

const PREAMBLE: &str = "You are a thoughtful reflection companion. Someone has shared their personal \
journal with you and is asking for insights. Be supportive and helpful without being overly emotional.";

const GUIDANCE: &str = "Please provide a helpful, supportive response that:
- Offers genuine insights and perspectives
- Acknowledges patterns or growth you notice
- Provides practical reflection questions when appropriate
- References specific entries when relevant: \"In your entry from [date]...\"
- Maintains a warm but professional tone
- Focuses on their personal development and self-awareness
- Avoids being overly sentimental or dramatic

Your thoughtful response:";

/// Block describing the entry open in the editor, dated in `tz`.
pub fn current_entry_block<Tz: TimeZone>(entry: &JournalEntry, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    format!(
        "CURRENT ENTRY (what they're viewing now):\n[{}] {}",
        format_date(&entry.date, tz),
        entry.content
    )
}

/// Full prompt: preamble, journal context, optional current entry, the question, guidance.
pub fn compose_prompt(query: &str, context: &str, current_entry: Option<&str>) -> String {
    let current = current_entry
        .map(|block| format!("\n\n{block}"))
        .unwrap_or_default();
    format!("{PREAMBLE}\n\n{context}{current}\n\nTheir question: {query}\n\n{GUIDANCE}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn prompt_contains_context_and_question() {
        let prompt = compose_prompt("How was my week?", "COMPLETE JOURNAL HISTORY (1 total entries):", None);
        assert!(prompt.starts_with("You are a thoughtful reflection companion."));
        assert!(prompt.contains("\n\nCOMPLETE JOURNAL HISTORY (1 total entries):\n\nTheir question: How was my week?\n\n"));
        assert!(prompt.contains("\"In your entry from [date]...\""));
        assert!(prompt.ends_with("Your thoughtful response:"));
        assert!(!prompt.contains("CURRENT ENTRY"));
    }

    #[test]
    fn current_entry_follows_context() {
        let date = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        let entry = JournalEntry::new("a", "Leap day thoughts", date);
        let block = current_entry_block(&entry, &Utc);
        let prompt = compose_prompt("q?", "CTX", Some(&block));

        assert!(prompt.contains(
            "CTX\n\nCURRENT ENTRY (what they're viewing now):\n[2/29/2024] Leap day thoughts\n\nTheir question: q?"
        ));
    }
}
