//! Turning an unbounded journal into a bounded block of prompt context.
//!
//! Entries are split into three tiers:
//!
//! 1. **relevant**: content contains a query term; shown at up to
//!    `relevant_chars` characters each
//! 2. **recent**: the first `recent_limit` other entries; up to `recent_chars`
//! 3. **older**: everything else, summarized per calendar month as a count and
//!    the most frequent words
//!
//! Relevance is plain substring containment of the lower-cased query terms in
//! the lower-cased content, so `art` matches `start`.

use chrono::{Local, TimeZone};
use std::collections::HashMap;
use std::fmt::Display;

use crate::config::ContextConfig;
use crate::journal::types::{format_date, JournalEntry};

/// Returned by [`ContextAssembler::build_context`] for an empty journal.
pub const NO_ENTRIES: &str = "No journal entries found.";

const ELLIPSIS: &str = "...";

/// Words ignored when extracting query terms.
const QUERY_STOPWORDS: &[&str] = &[
    "the", "and", "but", "for", "are", "was", "were", "been", "have", "has", "had", "will",
    "would", "could", "should", "what", "when", "where", "why", "how", "about", "with", "from",
    "they", "them", "their", "this", "that", "these", "those",
];

/// Words ignored when extracting month themes.
const THEME_STOPWORDS: &[&str] = &[
    "the", "and", "but", "for", "are", "was", "were", "been", "have", "has", "had", "will",
    "would", "could", "should", "with", "from", "they", "them", "their", "this", "that", "these",
    "those", "very", "just", "like", "more", "some", "time", "only", "know", "think", "also",
    "back", "after", "use", "two", "way", "even", "new", "want", "because", "any", "give", "day",
    "most", "us",
];

/// Lower-case `text` and replace everything but word characters and whitespace with spaces.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Significant terms of a query: longer than two characters and not a stopword.
pub fn query_terms(query: &str) -> Vec<String> {
    normalize(query)
        .split_whitespace()
        .filter(|t| t.chars().count() > 2)
        .filter(|t| !QUERY_STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

fn is_relevant(terms: &[String], content: &str) -> bool {
    let content = content.to_lowercase();
    terms.iter().any(|t| content.contains(t.as_str()))
}

/// Split `entries` into (relevant, other), keeping input order in both.
pub fn rank_relevance<'a>(
    query: &str,
    entries: &'a [JournalEntry],
) -> (Vec<&'a JournalEntry>, Vec<&'a JournalEntry>) {
    let terms = query_terms(query);
    entries
        .iter()
        .partition(|entry| is_relevant(&terms, &entry.content))
}

/// The `n` most frequent words across `entries`, ties in first-seen order.
///
/// Words of three characters or fewer and theme stopwords are ignored.
pub fn extract_themes(entries: &[&JournalEntry], n: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let text = normalize(&entry.content);
        for word in text.split_whitespace() {
            if word.chars().count() <= 3 || THEME_STOPWORDS.contains(&word) {
                continue;
            }
            match index.get(word) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(word.to_string(), counts.len());
                    counts.push((word.to_string(), 1));
                }
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(n).map(|(word, _)| word).collect()
}

/// Group entries by `Month YYYY` in `tz`, groups in first-seen order.
pub fn group_by_month<'a, Tz: TimeZone>(
    entries: &[&'a JournalEntry],
    tz: &Tz,
) -> Vec<(String, Vec<&'a JournalEntry>)>
where
    Tz::Offset: Display,
{
    let mut groups: Vec<(String, Vec<&'a JournalEntry>)> = Vec::new();
    for &entry in entries {
        let key = entry.date.with_timezone(tz).format("%B %Y").to_string();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(entry),
            None => groups.push((key, vec![entry])),
        }
    }
    groups
}

/// First `max_chars` characters of `text`, with an ellipsis if anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}{ELLIPSIS}", &text[..end]),
        None => text.to_string(),
    }
}

/// Builds prompt context from journal entries within configured bounds.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    limits: ContextConfig,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}

impl ContextAssembler {
    pub fn new(limits: ContextConfig) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ContextConfig {
        &self.limits
    }

    /// Context text for `query` with dates in the local time zone.
    pub fn build_context(&self, query: &str, entries: &[JournalEntry]) -> String {
        self.build_context_in(query, entries, &Local)
    }

    /// Context text for `query` with dates rendered in `tz`.
    pub fn build_context_in<Tz: TimeZone>(
        &self,
        query: &str,
        entries: &[JournalEntry],
        tz: &Tz,
    ) -> String
    where
        Tz::Offset: Display,
    {
        if entries.is_empty() {
            return NO_ENTRIES.to_string();
        }

        let mut context = format!(
            "COMPLETE JOURNAL HISTORY ({} total entries):\n\n",
            entries.len()
        );

        let (relevant, other) = rank_relevance(query, entries);
        tracing::debug!(
            relevant = relevant.len(),
            other = other.len(),
            "ranked entries for context"
        );

        if !relevant.is_empty() {
            context.push_str("MOST RELEVANT ENTRIES:\n");
            for entry in &relevant {
                context.push_str(&format!(
                    "[{}] {}\n\n",
                    format_date(&entry.date, tz),
                    truncate_chars(&entry.content, self.limits.relevant_chars)
                ));
            }
        }

        let split = other.len().min(self.limits.recent_limit);
        let (recent, older) = other.split_at(split);

        if !recent.is_empty() {
            context.push_str("RECENT ENTRIES:\n");
            for entry in recent {
                context.push_str(&format!(
                    "[{}] {}\n\n",
                    format_date(&entry.date, tz),
                    truncate_chars(&entry.content, self.limits.recent_chars)
                ));
            }
        }

        if !older.is_empty() {
            context.push_str(&format!(
                "OLDER ENTRIES SUMMARY ({} entries):\n",
                older.len()
            ));
            for (month, group) in group_by_month(older, tz) {
                let themes = extract_themes(&group, self.limits.theme_count);
                context.push_str(&format!(
                    "{month}: {} entries - Main themes: {}\n",
                    group.len(),
                    themes.join(", ")
                ));
            }
        }

        context
    }
}
