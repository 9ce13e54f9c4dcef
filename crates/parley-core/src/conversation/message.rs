//! Conversation message types.
//!
//! This module contains the message shape shared by the live session and
//! the saved-conversations ledger, including the opaque product payload
//! that assistant replies may carry.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Greeting / instruction message. Never persisted into the ledger.
    System,
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
}

/// A product suggestion attached to an assistant reply.
///
/// Products come from the search provider and are stored exactly as
/// received, whatever their shape. Accessors only read; nothing is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Product(Value);

impl Product {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Raw field lookup. `None` if the product is not a JSON object.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.as_object().and_then(|fields| fields.get(key))
    }

    pub fn name(&self) -> Option<&str> {
        self.field("name").and_then(Value::as_str)
    }

    /// Price for display. Strings are shown as-is, numbers in plain form.
    pub fn price_label(&self) -> Option<String> {
        match self.field("price")? {
            Value::String(price) => Some(price.clone()),
            Value::Number(price) => Some(price.to_string()),
            _ => None,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Product {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A single message in a conversation.
///
/// The role is fixed at construction; use [`Message::role`] to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    role: MessageRole,
    /// Text content. May be empty when an image is attached.
    #[serde(default)]
    pub content: String,
    /// Opaque reference to a locally stored image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    /// Product suggestions (assistant replies only, by convention).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            image_uri: None,
            products: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn with_image(mut self, image_uri: impl Into<String>) -> Self {
        self.image_uri = Some(image_uri.into());
        self
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = Some(products);
        self
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn is_system(&self) -> bool {
        self.role == MessageRole::System
    }
}

/// Returns a copy of `messages` with every system message removed.
///
/// Order of the remaining messages is preserved.
pub fn without_system(messages: &[Message]) -> Vec<Message> {
    messages.iter().filter(|m| !m.is_system()).cloned().collect()
}

/// Number of user/assistant messages in `messages`.
pub fn conversational_count(messages: &[Message]) -> usize {
    messages.iter().filter(|m| !m.is_system()).count()
}
