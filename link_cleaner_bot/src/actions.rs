use arch_bot_commons::teloxide_retry;
use teloxide::{
    payloads::RestrictChatMemberSetters,
    prelude::Requester,
    types::{ChatId, ChatPermissions, MessageId, UserId},
    ApiError, Bot, RequestError,
};

use crate::types::MuteMinutes;

/// Delete a message. Returns `false` if it could not be deleted, but in a way we don't care
/// about, like if someone else already deleted it or if we lack the rights to.
pub async fn delete_message(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
) -> Result<bool, RequestError> {
    match teloxide_retry!(bot.delete_message(chat_id, message_id).await) {
        Ok(_) => Ok(true),
        Err(RequestError::Api(ApiError::MessageIdInvalid | ApiError::MessageToDeleteNotFound)) => {
            // Someone else probably has already deleted it. That's fine.
            Ok(false)
        }
        Err(RequestError::Api(ApiError::MessageCantBeDeleted)) => {
            // No rights? Older than 48 hours?
            log::warn!(
                "Could not delete message {} in chat {}. Is this bot an admin with ability to delete messages?",
                message_id.0,
                chat_id
            );
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Take away all permissions of this user in this chat for this long.
/// Does nothing if the mute time is [`MuteMinutes::DISABLED`].
pub async fn mute_user(
    bot: &Bot,
    chat_id: ChatId,
    user_id: UserId,
    minutes: MuteMinutes,
) -> Result<(), RequestError> {
    let Some(duration) = minutes.to_duration() else {
        return Ok(());
    };
    let until = chrono::Utc::now() + duration;

    teloxide_retry!(
        bot.restrict_chat_member(chat_id, user_id, ChatPermissions::empty())
            .until_date(until)
            .await
    )?;

    log::debug!("Muted user {user_id} in chat {chat_id} until {until}");
    Ok(())
}

/// Give this user in this chat all of their permissions back.
pub async fn unmute_user(bot: &Bot, chat_id: ChatId, user_id: UserId) -> Result<(), RequestError> {
    teloxide_retry!(
        bot.restrict_chat_member(chat_id, user_id, ChatPermissions::all())
            .await
    )?;

    log::debug!("Unmuted user {user_id} in chat {chat_id}");
    Ok(())
}
