use arch_bot_commons::useful_methods::BotArchSendMsg;
use html_escape::encode_text;
use teloxide::{
    types::{BotCommand, Me, Message},
    Bot, RequestError,
};

use crate::{
    actions::{mute_user, unmute_user},
    config::Config,
    database::Database,
    misc::user_name_prettyprint,
    types::MuteMinutes,
};

/// Commands admins of the moderated chat can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show the mute time, or set it if `Some`.
    MuteTime(Option<MuteMinutes>),
    /// Mute the user who sent the replied-to message, for this long or for the mute time.
    Mute(Option<MuteMinutes>),
    /// Unmute the user who sent the replied-to message.
    Unmute,
}

/// Command name, bot command description.
const COMMANDS: &[(&str, &str)] = &[
    (
        "mute_time",
        "Show or set the mute time for posting links, in minutes. 0 disables muting.",
    ),
    (
        "mute",
        "Reply to a message to mute its sender, optionally for this many minutes.",
    ),
    ("unmute", "Reply to a message to unmute its sender."),
];

pub fn generate_bot_commands() -> Vec<BotCommand> {
    COMMANDS
        .iter()
        .map(|(command, description)| BotCommand::new(*command, *description))
        .collect()
}

/// Parse a command out of the text of a message.
///
/// Returns [`None`] if this is not a command, or is not a command for us.
/// Returns `Some(Err(...))` with an explanation to show if the command's parameters are bad.
pub fn parse_command(text: &str, bot_username: &str) -> Option<Result<Command, &'static str>> {
    // Check if it starts with "/", like how a command should.
    let text = text.strip_prefix('/')?;

    // Get first word in the message, the command itself.
    let command = text.split(char::is_whitespace).next()?;
    if command.is_empty() {
        return None;
    }
    let params = text[command.len()..].trim();

    // A command may be addressed to a specific bot, like "/mute@some_bot".
    let command = match command.split_once('@') {
        Some((command, username)) => {
            if !username.eq_ignore_ascii_case(bot_username) {
                return None;
            }
            command
        }
        None => command,
    };

    let minutes = || -> Result<Option<MuteMinutes>, &'static str> {
        if params.is_empty() {
            return Ok(None);
        }
        params.parse().map(Some)
    };

    let command = match command.to_lowercase().as_str() {
        "mute_time" => minutes().map(Command::MuteTime),
        "mute" => match minutes() {
            Ok(Some(minutes)) if minutes.is_disabled() => {
                Err("Muting someone for 0 minutes is kind of pointless.")
            }
            result => result.map(Command::Mute),
        },
        "unmute" => Ok(Command::Unmute),
        _ => return None,
    };

    Some(command)
}

/// Run the command in this message, if there's one. The message must be in the moderated chat.
///
/// Returns `true` if a command was parsed and responded to.
///
/// # Panics
///
/// Panics if the database dies lol
pub async fn handle_command(
    bot: &Bot,
    me: &Me,
    message: &Message,
    config: &Config,
    database: &Database,
) -> Result<bool, RequestError> {
    // Get text of the message.
    let Some(text) = message.text() else {
        return Ok(false);
    };

    let Some(command) = parse_command(text, me.username()) else {
        return Ok(false);
    };

    if !config.admins.is_sender_admin(bot, message).await? {
        log::info!(
            "Non-admin tried to use a command: {}",
            crate::misc::sender_name_prettyprint(message, true)
        );
        return Ok(false);
    }

    let command = match command {
        Ok(command) => command,
        Err(explanation) => {
            bot.archsendmsg_no_link_preview(message.chat.id, explanation, message.id)
                .await?;
            return Ok(true);
        }
    };

    log::debug!("Running command {command:?}");

    let response: String = match command {
        Command::MuteTime(None) => {
            let minutes = database
                .get_mute_minutes(config.default_mute)
                .await
                .expect("Database died!");
            if minutes.is_disabled() {
                "Muting users for posting links is disabled.".to_string()
            } else {
                format!("Users posting links get muted for {minutes}.")
            }
        }
        Command::MuteTime(Some(minutes)) => {
            database
                .set_mute_minutes(minutes)
                .await
                .expect("Database died!");
            log::info!("Mute time set to {minutes}");
            if minutes.is_disabled() {
                "Users posting links will no longer be muted.".to_string()
            } else {
                format!("Users posting links will now be muted for {minutes}.")
            }
        }
        Command::Mute(minutes) => {
            let minutes = match minutes {
                Some(minutes) => minutes,
                None => database
                    .get_mute_minutes(config.default_mute)
                    .await
                    .expect("Database died!"),
            };

            match replied_user(message) {
                Err(explanation) => explanation.to_string(),
                Ok(_) if minutes.is_disabled() => concat!(
                    "Muting is disabled. ",
                    "Specify for how many minutes to mute, like <code>/mute 30</code>."
                )
                .to_string(),
                Ok(user) => match mute_user(bot, message.chat.id, user.id, minutes).await {
                    Ok(()) => format!(
                        "Muted {} for {minutes}.",
                        encode_text(&user_name_prettyprint(user, false))
                    ),
                    Err(e) => {
                        log::warn!("Failed to mute: {e}");
                        format!("Failed to mute: {}", encode_text(&e.to_string()))
                    }
                },
            }
        }
        Command::Unmute => match replied_user(message) {
            Err(explanation) => explanation.to_string(),
            Ok(user) => match unmute_user(bot, message.chat.id, user.id).await {
                Ok(()) => format!(
                    "Unmuted {}.",
                    encode_text(&user_name_prettyprint(user, false))
                ),
                Err(e) => {
                    log::warn!("Failed to unmute: {e}");
                    format!("Failed to unmute: {}", encode_text(&e.to_string()))
                }
            },
        },
    };

    bot.archsendmsg_no_link_preview(message.chat.id, response.as_str(), message.id)
        .await?;

    Ok(true)
}

/// Get the user that sent the message this one replies to.
fn replied_user(message: &Message) -> Result<&teloxide::types::User, &'static str> {
    let Some(replied) = message.reply_to_message() else {
        return Err("Reply to a message of the user with this command.");
    };

    if replied.sender_chat.is_some() {
        return Err("That message was sent on behalf of a chat, which can't be muted.");
    }

    replied
        .from
        .as_ref()
        .ok_or("Can't tell who sent that message.")
}
