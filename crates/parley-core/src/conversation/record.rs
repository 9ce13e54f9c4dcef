//! Saved conversation records.
//!
//! A [`ConversationRecord`] is one entry of the saved-conversations ledger.
//! Records are matched against the live session by [`Fingerprint`], the
//! first user message of the conversation.

use super::message::{Message, MessageRole, conversational_count, without_system};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

const TITLE_MAX_CHARS: usize = 40;
const PREVIEW_MAX_CHARS: usize = 80;

/// One saved conversation.
///
/// Stored as part of the `saved_conversations` collection:
///
/// ```json
/// {"id": "1718000000000", "name": "Dự án A", "messages": [...],
///  "createdAt": "2024-06-10T06:13:20+00:00", "timestamp": 1718000000000}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    /// Stable identifier. Never changes after creation.
    pub id: String,
    /// User-assigned label; `None` for auto-saved conversations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Messages in chronological order, system messages excluded.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Creation time (RFC 3339). Set once.
    pub created_at: String,
    /// Last content update, epoch milliseconds.
    pub timestamp: i64,
}

impl ConversationRecord {
    /// Builds a new record stamped with the current time.
    ///
    /// System messages in `messages` are dropped.
    pub fn new(id: impl Into<String>, name: Option<String>, messages: &[Message]) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name,
            messages: without_system(messages),
            created_at: now.to_rfc3339(),
            timestamp: now.timestamp_millis(),
        }
    }

    /// Overwrites the message list and refreshes `timestamp`.
    pub fn replace_messages(&mut self, messages: &[Message]) {
        self.messages = without_system(messages);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.timestamp = Utc::now().timestamp_millis();
    }

    pub fn fingerprint(&self) -> Option<Fingerprint> {
        Fingerprint::of(&self.messages)
    }

    pub fn message_count(&self) -> usize {
        conversational_count(&self.messages)
    }

    /// Display title: the name if set, else derived from the first user message.
    pub fn title(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }

        match self.messages.iter().find(|m| m.role() == MessageRole::User) {
            Some(first) if !first.content.trim().is_empty() => {
                truncate_chars(first.content.trim(), TITLE_MAX_CHARS)
            }
            Some(first) if first.image_uri.is_some() => "Image conversation".to_string(),
            _ => "Untitled conversation".to_string(),
        }
    }

    /// Short excerpt of the latest non-system message.
    pub fn preview(&self) -> Option<String> {
        self.messages
            .iter()
            .rev()
            .find(|m| !m.is_system())
            .map(|m| truncate_chars(m.content.trim(), PREVIEW_MAX_CHARS))
    }
}

/// Identity key used to recognise the same conversation across autosaves.
///
/// Two message lists share a fingerprint when their first user messages have
/// the same content and the same image reference (both absent counts as equal).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub content: String,
    pub image_uri: Option<String>,
}

impl Fingerprint {
    /// Fingerprint of the first user message, if any.
    pub fn of(messages: &[Message]) -> Option<Self> {
        messages
            .iter()
            .find(|m| m.role() == MessageRole::User)
            .map(|m| Self {
                content: m.content.clone(),
                image_uri: m.image_uri.clone(),
            })
    }
}

/// Generates a record id from `now_millis`.
///
/// The plain millisecond string is used when free; otherwise a random
/// 4-hex-digit suffix is appended until `is_taken` rejects no more.
pub fn generate_id<F>(now_millis: i64, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let base = now_millis.to_string();
    if !is_taken(&base) {
        return base;
    }

    let mut rng = rand::thread_rng();
    loop {
        let suffix: u32 = rng.gen_range(0..0x1_0000);
        let candidate = format!("{}-{:04x}", base, suffix);
        if !is_taken(&candidate) {
            return candidate;
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}
