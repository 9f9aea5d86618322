pub mod commands;

use std::sync::Arc;

use arch_bot_commons::useful_methods::{BotArchSendMsg, MessageStuff};
use teloxide::{
    types::{Me, Message},
    Bot, RequestError,
};

use crate::{
    actions::{delete_message, mute_user},
    config::Config,
    database::Database,
    misc::{chat_name_prettyprint, message_has_link, sender_name_prettyprint},
};

use self::commands::handle_command;

pub async fn handle_message(
    bot: Bot,
    me: Me,
    message: Message,
    config: Arc<Config>,
    database: Arc<Database>,
) -> Result<(), RequestError> {
    handle_message_new_or_edit(bot, me, message, config, database, false).await
}

pub async fn handle_edited_message(
    bot: Bot,
    me: Me,
    message: Message,
    config: Arc<Config>,
    database: Arc<Database>,
) -> Result<(), RequestError> {
    handle_message_new_or_edit(bot, me, message, config, database, true).await
}

/// # Panics
///
/// Panics if the database dies lol
async fn handle_message_new_or_edit(
    bot: Bot,
    me: Me,
    message: Message,
    config: Arc<Config>,
    database: Arc<Database>,
    edited: bool,
) -> Result<(), RequestError> {
    // First check if it's a private message.
    if message.chat.is_private() {
        if !edited {
            handle_private_message(&bot, &message).await?;
        }
        return Ok(());
    }

    if message.chat.id != config.allowed_chat {
        log::debug!(
            "Ignoring a message in a chat we don't moderate: {}",
            chat_name_prettyprint(&message.chat, true)
        );
        return Ok(());
    }

    // Bot ignores messages made by itself.
    if message.from.as_ref().map(|from| from.id) == Some(me.id) {
        return Ok(());
    }

    if message.is_join_or_leave() {
        // Service messages can't be edited, but eh.
        if !edited {
            handle_join_or_leave(&bot, &message).await;
        }
        return Ok(());
    }

    if !edited && handle_command(&bot, &me, &message, &config, &database).await? {
        return Ok(());
    }

    if !message_has_link(&message) {
        return Ok(());
    }

    if config.admins.is_sender_admin(&bot, &message).await? {
        log::debug!("Skipping deleting message from an admin.");
        return Ok(());
    }

    // Links and not an admin. Buh-bye!
    let sender_name = sender_name_prettyprint(&message, true);

    match delete_message(&bot, message.chat.id, message.id).await {
        Ok(true) => log::info!("Deleted a message with a link from {sender_name}"),
        Ok(false) => (),
        Err(e) => log::warn!("Failed to delete a message with a link from {sender_name}: {e}"),
    }

    // Messages sent on behalf of channels can't have their senders muted.
    if message.sender_chat.is_some() {
        return Ok(());
    }
    let Some(user) = &message.from else {
        return Ok(());
    };

    let minutes = database
        .get_mute_minutes(config.default_mute)
        .await
        .expect("Database died!");

    if minutes.is_disabled() {
        return Ok(());
    }

    match mute_user(&bot, message.chat.id, user.id, minutes).await {
        Ok(()) => log::info!("Muted {sender_name} for {minutes}"),
        Err(e) => log::warn!("Failed to mute {sender_name}: {e}"),
    }

    Ok(())
}

/// Delete a "user joined" or "user left" message. Failures are only logged.
async fn handle_join_or_leave(bot: &Bot, message: &Message) {
    match delete_message(bot, message.chat.id, message.id).await {
        Ok(true) => log::info!("Deleted a join/leave message"),
        Ok(false) => (),
        Err(e) => log::warn!("Failed to delete a join/leave message: {e}"),
    }
}

pub async fn handle_private_message(bot: &Bot, message: &Message) -> Result<(), RequestError> {
    // Telegram automatically trims preceding and following newlines, so this is fine.
    bot.archsendmsg_no_link_preview(
        message.chat.id,
        "
This bot keeps a single group chat clean. It is not open for use in other chats.

In the chat it moderates, it removes messages with links unless they are sent by an admin, \
mutes their senders for a while, and removes \"user joined\" and \"user left\" messages.

Admins of that chat can use these commands there:
/mute_time - show or set the mute time, in minutes. <code>0</code> disables muting.
/mute - reply to a message to mute its sender, optionally for this many minutes.
/unmute - reply to a message to unmute its sender.",
        None,
    )
    .await?;
    Ok(())
}
