use crate::models::{ChatMessage, Session};
use crate::ui::markup;
use colored::*;

/// Inline error banner
pub fn display_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message.red());
}

/// One exchange: the user's symptoms, the rendered response, and when it happened
pub fn display_message(message: &ChatMessage) {
    println!("{}", "You:".cyan().bold());
    println!("{}", message.user_message);
    println!("{}", "AI:".magenta().bold());
    println!("{}", markup::to_terminal(&message.ai_response));
    println!(
        "{}",
        message
            .created_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .dimmed()
    );
    println!();
}

pub fn display_history(messages: &[ChatMessage]) {
    if messages.is_empty() {
        println!("{}", "No chat history yet. Start by describing your symptoms...".dimmed());
        return;
    }
    for message in messages {
        display_message(message);
    }
}

pub fn display_session(session: &Session) {
    match session.role() {
        Some(role) => {
            let name = session.display_name().unwrap_or("(no display name)");
            println!("{} {} ({})", "Logged in as".green(), name.bold(), role);
        }
        None => println!("{}", "Not logged in.".yellow()),
    }
}
