use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::{future, Stream, StreamExt};
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{
    AllowedUpdate, Chat, ChatKind, Message, MessageId, PublicChatKind, ThreadId, Update,
    UpdateKind, User,
};
use teloxide::update_listeners::{AsUpdateStream, Polling, UpdateListener};
use teloxide::utils::command::BotCommands;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::bot::Command;
use crate::config::Config;
use crate::platform::{
    ChatInfo, ChatType, IncomingMessage, IncomingUpdate, OutgoingReply, ReplySink, SenderInfo,
};

/// Who the bot token belongs to, as reported by `getMe`
#[derive(Debug, Clone)]
pub struct BotIdentity {
    pub first_name: String,
    pub username: String,
}

/// Build an authenticated Bot handle. When a proxy is configured, every
/// Bot API request is routed through it.
pub fn connect(config: &Config) -> Result<Bot> {
    let mut settings = teloxide::net::default_reqwest_settings();

    if let Some(proxy_url) = &config.network.https_proxy {
        info!(
            "HTTPS_PROXY detected: {}, configuring proxy...",
            config.network.redacted_proxy().unwrap_or_default()
        );
        let proxy = reqwest::Proxy::all(proxy_url.as_str())
            .context("Failed to parse HTTPS_PROXY URL")?;
        settings = settings.proxy(proxy);
    }

    let client = settings
        .build()
        .context("Failed to build Telegram HTTP client")?;

    Ok(Bot::with_client(config.telegram.bot_token.clone(), client))
}

/// Call `getMe`. A failure here means the token is unusable.
pub async fn verify_identity(bot: &Bot) -> Result<BotIdentity> {
    let me = bot
        .get_me()
        .await
        .context("Cannot get bot information")?;

    Ok(BotIdentity {
        first_name: me.user.first_name.clone(),
        username: me.user.username.clone().unwrap_or_default(),
    })
}

/// Publish the command menu.
pub async fn register_commands(bot: &Bot) -> Result<()> {
    bot.set_my_commands(Command::bot_commands())
        .await
        .context("setMyCommands request failed")?;
    Ok(())
}

/// Long-polling listener restricted to plain message updates.
pub fn polling(bot: Bot) -> Polling<Bot> {
    Polling::builder(bot)
        .allowed_updates(vec![AllowedUpdate::Message])
        .build()
}

/// Ordered stream of updates. Cancelling `token` stops the listener: updates
/// already fetched are still yielded, the last offset is acknowledged, and
/// then the stream ends. Polling errors are logged and skipped.
///
/// Must be called from within a tokio runtime.
pub fn update_stream(
    listener: &mut Polling<Bot>,
    token: CancellationToken,
) -> impl Stream<Item = IncomingUpdate> + '_ {
    let stop_token = listener.stop_token();
    tokio::spawn(async move {
        token.cancelled().await;
        stop_token.stop();
    });

    listener
        .as_stream()
        .filter_map(|result| {
            future::ready(match result {
                Ok(update) => Some(incoming_update(&update)),
                Err(e) => {
                    warn!("Error while polling for updates: {}", e);
                    None
                }
            })
        })
}

pub fn incoming_update(update: &Update) -> IncomingUpdate {
    let message = match &update.kind {
        UpdateKind::Message(message) => Some(incoming_message(message)),
        _ => None,
    };
    IncomingUpdate { message }
}

pub fn incoming_message(message: &Message) -> IncomingMessage {
    IncomingMessage {
        text: message.text().map(str::to_string),
        chat: chat_info(&message.chat),
        from: message.from.as_ref().map(sender_info),
        is_topic_message: message.is_topic_message,
        thread_id: message.thread_id.map(|ThreadId(MessageId(id))| id),
    }
}

fn chat_info(chat: &Chat) -> ChatInfo {
    let chat_type = if chat.is_private() {
        ChatType::Private
    } else if chat.is_channel() {
        ChatType::Channel
    } else if chat.is_supergroup() {
        ChatType::Supergroup
    } else {
        ChatType::Group
    };

    let is_forum = match &chat.kind {
        ChatKind::Public(public) => match &public.kind {
            PublicChatKind::Supergroup(supergroup) => supergroup.is_forum,
            _ => false,
        },
        _ => false,
    };

    ChatInfo {
        id: chat.id.0,
        chat_type,
        title: chat.title().map(str::to_string),
        username: chat.username().map(str::to_string),
        is_forum,
    }
}

fn sender_info(user: &User) -> SenderInfo {
    SenderInfo {
        id: user.id.0,
        first_name: Some(user.first_name.clone()).filter(|name| !name.is_empty()),
        last_name: user.last_name.clone(),
        username: user.username.clone(),
        is_bot: user.is_bot,
        language_code: user.language_code.clone(),
    }
}

/// Sends replies through the Bot API
#[derive(Clone)]
pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ReplySink for TelegramSink {
    async fn send_reply(&self, reply: &OutgoingReply) -> Result<()> {
        let mut request = self
            .bot
            .send_message(ChatId(reply.chat_id), reply.text.clone());
        if let Some(thread_id) = reply.thread_id {
            request = request.message_thread_id(ThreadId(MessageId(thread_id)));
        }

        request.await.context("sendMessage request failed")?;
        Ok(())
    }
}
