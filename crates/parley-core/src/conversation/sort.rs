//! Display orderings for the saved-conversations list.
//!
//! The ledger itself has no order guarantee; callers pick one of these.

use super::record::ConversationRecord;
use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationSort {
    /// Newest `createdAt` first.
    #[default]
    CreatedDesc,
    /// Most recently updated (`timestamp`) first.
    RecentDesc,
    /// Title, case-insensitive.
    Name,
    /// Longest conversation first.
    MessageCountDesc,
}

impl ConversationSort {
    pub fn apply(self, records: &mut [ConversationRecord]) {
        match self {
            Self::CreatedDesc => records.sort_by(|a, b| {
                created_at(b)
                    .cmp(&created_at(a))
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
            Self::RecentDesc => records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            Self::Name => records.sort_by(|a, b| {
                a.title()
                    .to_lowercase()
                    .cmp(&b.title().to_lowercase())
                    .then_with(|| a.id.cmp(&b.id))
            }),
            Self::MessageCountDesc => records.sort_by(|a, b| {
                match b.message_count().cmp(&a.message_count()) {
                    Ordering::Equal => b.timestamp.cmp(&a.timestamp),
                    other => other,
                }
            }),
        }
    }
}

fn created_at(record: &ConversationRecord) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(&record.created_at).ok()
}

impl FromStr for ConversationSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" | "date" => Ok(Self::CreatedDesc),
            "recent" | "updated" => Ok(Self::RecentDesc),
            "name" | "title" => Ok(Self::Name),
            "messages" | "count" => Ok(Self::MessageCountDesc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

impl fmt::Display for ConversationSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CreatedDesc => "created",
            Self::RecentDesc => "recent",
            Self::Name => "name",
            Self::MessageCountDesc => "messages",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::message::Message;

    fn record(
        id: &str,
        name: Option<&str>,
        created_at: &str,
        timestamp: i64,
        n: usize,
    ) -> ConversationRecord {
        let mut messages = Vec::new();
        for i in 0..n {
            messages.push(Message::user(format!("{id}-{i}")));
        }
        ConversationRecord {
            id: id.to_string(),
            name: name.map(str::to_string),
            messages,
            created_at: created_at.to_string(),
            timestamp,
        }
    }

    fn ids(records: &[ConversationRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_created_desc() {
        let mut records = vec![
            record("a", None, "2024-01-01T00:00:00+00:00", 5, 1),
            record("b", None, "2024-03-01T00:00:00+00:00", 1, 1),
            record("c", None, "2024-02-01T00:00:00+07:00", 9, 1),
        ];
        ConversationSort::CreatedDesc.apply(&mut records);
        assert_eq!(ids(&records), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_name_is_case_insensitive() {
        let mut records = vec![
            record("1", Some("beta"), "2024-01-01T00:00:00+00:00", 0, 1),
            record("2", Some("Alpha"), "2024-01-01T00:00:00+00:00", 0, 1),
            record("3", Some("gamma"), "2024-01-01T00:00:00+00:00", 0, 1),
        ];
        ConversationSort::Name.apply(&mut records);
        assert_eq!(ids(&records), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_message_count_desc_then_recent() {
        let mut records = vec![
            record("short", None, "2024-01-01T00:00:00+00:00", 10, 2),
            record("long", None, "2024-01-01T00:00:00+00:00", 1, 6),
            record("short-newer", None, "2024-01-01T00:00:00+00:00", 20, 2),
        ];
        ConversationSort::MessageCountDesc.apply(&mut records);
        assert_eq!(ids(&records), vec!["long", "short-newer", "short"]);
    }

    #[test]
    fn test_parse_round_trip() {
        for sort in [
            ConversationSort::CreatedDesc,
            ConversationSort::RecentDesc,
            ConversationSort::Name,
            ConversationSort::MessageCountDesc,
        ] {
            assert_eq!(sort.to_string().parse::<ConversationSort>().unwrap(), sort);
        }
        assert!("sideways".parse::<ConversationSort>().is_err());
    }
}
