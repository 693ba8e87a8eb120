use tracing::{debug, error};

use crate::platform::{ChatInfo, IncomingMessage, OutgoingReply, ReplySink, SenderInfo};

pub const UNKNOWN_SENDER_LINE: &str =
    "Cannot get user information (possibly anonymous admin or channel message)";

fn blank(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn chat_block(chat: &ChatInfo) -> String {
    let mut out = String::from("--- Chat Information ---\n");
    out.push_str(&format!("Type: {}\n", chat.chat_type));
    out.push_str(&format!("ID: {}\n", chat.id));
    out.push_str(&format!("Title: {}\n", blank(&chat.title)));
    out.push_str(&format!("Username: @{}\n", blank(&chat.username)));
    out.push_str(&format!("Is Forum/Topics Enabled: {}\n", chat.is_forum));
    out
}

fn topic_block(message: &IncomingMessage) -> String {
    let mut out = String::from("\n--- Topic Information ---\n");
    out.push_str(&format!("Is Topic Message: {}\n", message.is_topic_message));
    out.push_str(&format!("Thread ID: {}\n", message.thread_id.unwrap_or(0)));
    out.push_str("Note: Topic name needs to be obtained through other means.\n");
    out
}

fn sender_block(from: Option<&SenderInfo>) -> String {
    let mut out = String::from("\n--- Sender Information ---\n");
    match from {
        Some(user) => {
            out.push_str(&format!("User ID: {}\n", user.id));
            out.push_str(&format!("First Name: {}\n", blank(&user.first_name)));
            out.push_str(&format!("Last Name: {}\n", blank(&user.last_name)));
            out.push_str(&format!("Username: @{}\n", blank(&user.username)));
            out.push_str(&format!("Is Bot: {}\n", user.is_bot));
            out.push_str(&format!("Language Code: {}\n", blank(&user.language_code)));
        }
        None => {
            out.push_str(UNKNOWN_SENDER_LINE);
            out.push('\n');
        }
    }
    out
}

/// Render the chat, topic and sender report for a `/userinfo` message.
///
/// Missing optional fields render as empty strings after their label.
/// The topic block appears only for messages inside a topic thread.
pub fn format_reply(message: &IncomingMessage) -> String {
    let mut text = chat_block(&message.chat);
    if message.in_topic() {
        text.push_str(&topic_block(message));
    }
    text.push_str(&sender_block(message.from.as_ref()));
    text
}

/// Address the formatted report to the originating chat, and to the
/// originating thread when the message was sent inside a topic.
pub fn build_reply(message: &IncomingMessage) -> OutgoingReply {
    let thread_id = if message.in_topic() {
        message.thread_id.filter(|id| *id != 0)
    } else {
        None
    };

    OutgoingReply {
        chat_id: message.chat.id,
        thread_id,
        text: format_reply(message),
    }
}

/// Build and send the reply. Send failures are logged and swallowed so one
/// bad chat never stops the update loop.
pub async fn respond<R: ReplySink + ?Sized>(message: &IncomingMessage, sink: &R) {
    let reply = build_reply(message);
    debug!(
        "Replying to chat {} (thread: {:?})",
        reply.chat_id, reply.thread_id
    );

    if let Err(e) = sink.send_reply(&reply).await {
        error!("Failed to send message (ChatID: {}): {:#}", reply.chat_id, e);
    }
}
