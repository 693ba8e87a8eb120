pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

/// Kind of conversation a message arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl std::fmt::Display for ChatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatType::Private => write!(f, "private"),
            ChatType::Group => write!(f, "group"),
            ChatType::Supergroup => write!(f, "supergroup"),
            ChatType::Channel => write!(f, "channel"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatInfo {
    pub id: i64,
    pub chat_type: ChatType,
    pub title: Option<String>,
    pub username: Option<String>,
    /// Whether topics are enabled for this chat
    pub is_forum: bool,
}

/// The user who sent a message. Absent for anonymous admins and channel posts.
#[derive(Debug, Clone, PartialEq)]
pub struct SenderInfo {
    pub id: u64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub is_bot: bool,
    pub language_code: Option<String>,
}

/// A message received from the platform
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingMessage {
    pub text: Option<String>,
    pub chat: ChatInfo,
    pub from: Option<SenderInfo>,
    pub is_topic_message: bool,
    pub thread_id: Option<i32>,
}

impl IncomingMessage {
    /// True when the message belongs to a topic thread, so replies should
    /// stay inside that thread.
    pub fn in_topic(&self) -> bool {
        self.is_topic_message || (self.chat.is_forum && self.thread_id.unwrap_or(0) != 0)
    }
}

/// One event pulled from the update stream
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingUpdate {
    pub message: Option<IncomingMessage>,
}

/// A text reply addressed to a chat, optionally pinned to a topic thread
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingReply {
    pub chat_id: i64,
    pub thread_id: Option<i32>,
    pub text: String,
}

/// Delivers replies back to the platform
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_reply(&self, reply: &OutgoingReply) -> Result<()>;
}
