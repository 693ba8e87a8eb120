use futures::{pin_mut, Stream, StreamExt};
use teloxide::utils::command::BotCommands;
use tracing::debug;

use crate::platform::{IncomingUpdate, ReplySink};
use crate::responder;

pub const USERINFO_PREFIX: &str = "/userinfo";

/// Commands advertised in the Telegram command menu
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "Get current chat and user information")]
    Userinfo,
}

/// Prefix match: arguments after the command are ignored.
pub fn is_userinfo_command(text: Option<&str>) -> bool {
    text.is_some_and(|t| t.starts_with(USERINFO_PREFIX))
}

/// Consume updates in delivery order until the stream ends, answering
/// every `/userinfo` message. Returns the number of replies attempted.
pub async fn run<S, R>(updates: S, sink: &R) -> usize
where
    S: Stream<Item = IncomingUpdate>,
    R: ReplySink + ?Sized,
{
    pin_mut!(updates);
    let mut handled = 0;

    while let Some(update) = updates.next().await {
        let Some(message) = update.message else {
            continue;
        };

        if !is_userinfo_command(message.text.as_deref()) {
            continue;
        }

        debug!("/userinfo from chat {}", message.chat.id);
        responder::respond(&message, sink).await;
        handled += 1;
    }

    handled
}
