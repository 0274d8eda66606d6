//! Prints dispatched events to the terminal.

use nexus_chat_client::protocol::ChatMessage;
use nexus_chat_client::EventHandler;
use std::collections::BTreeSet;

pub struct Terminal;

/// `HH:MM` out of an ISO-8601 timestamp, or the raw value.
fn clock(timestamp: &str) -> &str {
    timestamp.get(11..16).unwrap_or(timestamp)
}

fn print_message(message: &ChatMessage) {
    match message.timestamp.as_deref() {
        Some(ts) => println!("[{}] {}: {}", clock(ts), message.user, message.text),
        None => println!("{}: {}", message.user, message.text),
    }
}

impl EventHandler for Terminal {
    fn on_connection_change(&mut self, connected: bool) {
        println!("* {}", if connected { "connected" } else { "disconnected" });
    }

    fn on_system_notice(&mut self, text: &str) {
        println!("* {text}");
    }

    fn on_chat_message(&mut self, message: &ChatMessage) {
        print_message(message);
    }

    fn on_history(&mut self, messages: &[ChatMessage]) {
        messages.iter().for_each(print_message);
    }

    fn on_roster(&mut self, members: &BTreeSet<String>) {
        let names: Vec<_> = members.iter().map(String::as_str).collect();
        match names.len() {
            0 => println!("* no members online"),
            1 => println!("* 1 member online: {}", names[0]),
            n => println!("* {n} members online: {}", names.join(", ")),
        }
    }

    fn on_room_list(&mut self, names: &[String]) {
        if names.is_empty() {
            println!("* no rooms available");
        } else {
            println!("* rooms: {}", names.join(", "));
        }
    }

    fn on_protocol_error(&mut self, text: &str) {
        eprintln!("! {text}");
    }

    fn on_transient_warning(&mut self, text: &str) {
        eprintln!("! connection problem: {text}");
    }
}
