//! Saved-conversation commands.

use super::render::{print_messages, print_record_line};
use anyhow::{Result, bail};
use colored::Colorize;
use parley_application::ParleyServices;
use parley_core::conversation::ConversationSort;

pub async fn list(services: &ParleyServices, sort: ConversationSort) {
    let records = services.store.list_sorted(sort).await;
    if records.is_empty() {
        println!("{}", "No saved conversations.".bright_black());
        return;
    }
    for record in &records {
        print_record_line(record);
    }
}

pub async fn show(services: &ParleyServices, id: &str) -> Result<()> {
    let Some(record) = services.store.get(id).await else {
        bail!("No conversation with id {}", id);
    };
    println!("{}", record.title().bright_magenta().bold());
    println!("{}", format!("created {}", record.created_at).bright_black());
    print_messages(&record.messages);
    Ok(())
}

/// Saves the current session under `name`.
pub async fn save(services: &ParleyServices, name: &str) -> Result<()> {
    let messages = services.startup.load().await;
    match services.store.create(name, &messages).await {
        Some(id) => {
            println!("{}", format!("Saved as {} ({})", name.trim(), id).green());
            Ok(())
        }
        None => bail!("Nothing saved: the name must not be blank and the chat must have messages"),
    }
}

pub async fn rename(services: &ParleyServices, id: &str, name: &str) -> Result<()> {
    if !services.store.rename(id, name).await {
        bail!("Could not rename {}", id);
    }
    println!("{}", format!("Renamed {} to {}", id, name.trim()).green());
    Ok(())
}

pub async fn delete(services: &ParleyServices, id: &str) -> Result<()> {
    if !services.store.delete(id).await {
        bail!("Could not delete {}", id);
    }
    println!("{}", format!("Deleted {}", id).green());
    Ok(())
}
