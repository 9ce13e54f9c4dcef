//! Terminal rendering of records and messages.

use chrono::{DateTime, Utc};
use colored::Colorize;
use parley_core::conversation::{ConversationRecord, Message, MessageRole};

pub fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn print_record_line(record: &ConversationRecord) {
    println!(
        "{}  {}  {}",
        record.id.bright_black(),
        record.title().bold(),
        format!(
            "({} messages, updated {})",
            record.message_count(),
            format_millis(record.timestamp)
        )
        .bright_black()
    );
    if let Some(preview) = record.preview() {
        println!("    {}", preview.dimmed());
    }
}

pub fn print_message(message: &Message) {
    let label = match message.role() {
        MessageRole::System => "system".bright_magenta(),
        MessageRole::User => "user".green(),
        MessageRole::Assistant => "assistant".cyan(),
    };
    println!("{} {}", format!("[{}]", label).bold(), message.content);
    if let Some(image) = &message.image_uri {
        println!("    {} {}", "image:".bright_black(), image);
    }
    if let Some(products) = &message.products {
        for product in products {
            let name = product.name().unwrap_or("(unnamed product)");
            match product.price_label() {
                Some(price) => println!("    {} {} {}", "*".yellow(), name, price.yellow()),
                None => println!("    {} {}", "*".yellow(), name),
            }
        }
    }
}

pub fn print_messages(messages: &[Message]) {
    for message in messages {
        print_message(message);
    }
}
