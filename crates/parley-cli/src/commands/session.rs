//! Live-session commands.

use super::render::{print_message, print_messages};
use anyhow::{Result, bail};
use clap::ValueEnum;
use colored::Colorize;
use parley_application::{AutoSaveOutcome, ParleyServices};
use parley_core::conversation::{Message, MessageRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    User,
    Assistant,
    System,
}

impl From<RoleArg> for MessageRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::User => MessageRole::User,
            RoleArg::Assistant => MessageRole::Assistant,
            RoleArg::System => MessageRole::System,
        }
    }
}

pub async fn current(services: &ParleyServices) {
    let messages = services.startup.load().await;
    print_messages(&messages);
}

/// Appends one message to the session and persists the result.
pub async fn say(
    services: &ParleyServices,
    text: &str,
    role: RoleArg,
    image: Option<String>,
) -> Result<()> {
    let mut message = Message::new(role.into(), text);
    if let Some(image) = image {
        message = message.with_image(image);
    }

    let mut messages = services.startup.load().await;
    messages.push(message);

    let outcome = services.session.persist(&messages).await;
    if !outcome.slot_saved {
        bail!("Failed to save the current session");
    }
    if let Some(last) = messages.last() {
        print_message(last);
    }
    match outcome.autosave {
        AutoSaveOutcome::Created(id) => {
            println!("{}", format!("Auto-saved as {}", id).bright_black())
        }
        AutoSaveOutcome::Updated(id) => {
            println!("{}", format!("Auto-saved to {}", id).bright_black())
        }
        AutoSaveOutcome::Failed => println!("{}", "Auto-save failed, see log".yellow()),
        AutoSaveOutcome::Skipped | AutoSaveOutcome::Superseded => {}
    }
    Ok(())
}

pub async fn new_chat(services: &ParleyServices) {
    let messages = services.session.start_new_chat().await;
    println!("{}", "Started a new chat.".green());
    print_messages(&messages);
}

pub async fn open(services: &ParleyServices, id: &str) -> Result<()> {
    let Some(messages) = services.session.open_conversation(id).await else {
        bail!("No conversation with id {}", id);
    };
    println!("{}", format!("Opened {}", id).green());
    print_messages(&messages);
    Ok(())
}
