//! Ledger commands.
//!
//! Every change to the saved-conversations collection is expressed as a
//! [`LedgerCommand`] and applied to the fully loaded collection in memory.
//! Storage backends wrap [`LedgerCommand::apply`] in their own
//! load → apply → save transaction; a command that returns `Err` leaves the
//! collection untouched.

use super::message::{Message, MessageRole, conversational_count};
use super::record::{ConversationRecord, Fingerprint, generate_id};
use crate::error::{ParleyError, Result};
use chrono::Utc;

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    /// Append a new record. `name: None` marks an auto-saved record.
    Create {
        name: Option<String>,
        messages: Vec<Message>,
    },
    /// Overwrite a record's messages and refresh its timestamp.
    ReplaceMessages { id: String, messages: Vec<Message> },
    /// Set a record's name.
    Rename { id: String, name: String },
    /// Remove a record. Removing a missing id is not an error.
    Delete { id: String },
    /// Update the record whose fingerprint matches `messages`, or append one.
    Reconcile { messages: Vec<Message> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerOutcome {
    Created(String),
    Updated(String),
    Renamed(String),
    Deleted(String),
    /// The command targeted an id that is not in the ledger.
    Missing(String),
}

impl LedgerOutcome {
    /// Whether the collection must be written back.
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Missing(_))
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Created(id)
            | Self::Updated(id)
            | Self::Renamed(id)
            | Self::Deleted(id)
            | Self::Missing(id) => id,
        }
    }
}

impl LedgerCommand {
    /// Short name used in logs and timeout errors.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::ReplaceMessages { .. } => "replace_messages",
            Self::Rename { .. } => "rename",
            Self::Delete { .. } => "delete",
            Self::Reconcile { .. } => "reconcile",
        }
    }

    /// Applies the command to `records`.
    ///
    /// Validation happens before any mutation, so an `Err` always means
    /// `records` is unchanged.
    pub fn apply(self, records: &mut Vec<ConversationRecord>) -> Result<LedgerOutcome> {
        match self {
            Self::Create { name, messages } => {
                let name = match name {
                    Some(name) => Some(normalize_name(&name)?),
                    None => None,
                };
                if conversational_count(&messages) == 0 {
                    return Err(ParleyError::validation(
                        "conversation has no user or assistant messages",
                    ));
                }
                let id = fresh_id(records);
                records.push(ConversationRecord::new(id.clone(), name, &messages));
                Ok(LedgerOutcome::Created(id))
            }
            Self::ReplaceMessages { id, messages } => {
                match records.iter_mut().find(|r| r.id == id) {
                    Some(record) => {
                        record.replace_messages(&messages);
                        Ok(LedgerOutcome::Updated(id))
                    }
                    None => Ok(LedgerOutcome::Missing(id)),
                }
            }
            Self::Rename { id, name } => {
                let name = normalize_name(&name)?;
                match records.iter_mut().find(|r| r.id == id) {
                    Some(record) => {
                        record.name = Some(name);
                        record.touch();
                        Ok(LedgerOutcome::Renamed(id))
                    }
                    None => Ok(LedgerOutcome::Missing(id)),
                }
            }
            Self::Delete { id } => {
                let before = records.len();
                records.retain(|r| r.id != id);
                if records.len() == before {
                    Ok(LedgerOutcome::Missing(id))
                } else {
                    Ok(LedgerOutcome::Deleted(id))
                }
            }
            Self::Reconcile { messages } => {
                let fingerprint = Fingerprint::of(&messages).ok_or_else(|| {
                    ParleyError::validation("session has no user message to match on")
                })?;
                if !messages.iter().any(|m| m.role() == MessageRole::Assistant) {
                    return Err(ParleyError::validation("session has no assistant reply yet"));
                }

                let existing = records
                    .iter()
                    .position(|r| r.fingerprint().as_ref() == Some(&fingerprint));
                match existing {
                    Some(index) => {
                        let record = &mut records[index];
                        record.replace_messages(&messages);
                        Ok(LedgerOutcome::Updated(record.id.clone()))
                    }
                    None => {
                        let id = fresh_id(records);
                        records.push(ConversationRecord::new(id.clone(), None, &messages));
                        Ok(LedgerOutcome::Created(id))
                    }
                }
            }
        }
    }
}

fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ParleyError::validation("conversation name is empty"));
    }
    Ok(trimmed.to_string())
}

fn fresh_id(records: &[ConversationRecord]) -> String {
    generate_id(Utc::now().timestamp_millis(), |candidate| {
        records.iter().any(|r| r.id == candidate)
    })
}
