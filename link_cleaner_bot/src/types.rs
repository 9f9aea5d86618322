use std::{collections::HashSet, fmt::Display, num::ParseIntError, str::FromStr};

use teloxide::{
    prelude::*,
    types::{ChatMember, UserId},
    RequestError,
};

/// How long users who post links get muted for, in minutes. Zero means muting is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MuteMinutes(u32);

impl MuteMinutes {
    /// Telegram considers restrictions longer than 366 days to be permanent.
    pub const MAX: u32 = 366 * 24 * 60;
    pub const DISABLED: MuteMinutes = MuteMinutes(0);
    pub const DEFAULT: MuteMinutes = MuteMinutes(60);

    /// Returns [`None`] if above [`Self::MAX`].
    #[must_use]
    pub fn new(minutes: u32) -> Option<Self> {
        (minutes <= Self::MAX).then_some(Self(minutes))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn is_disabled(self) -> bool {
        self.0 == 0
    }

    /// Returns [`None`] if muting is disabled.
    #[must_use]
    pub fn to_duration(self) -> Option<chrono::Duration> {
        match self.0 {
            0 => None,
            minutes => Some(chrono::Duration::minutes(minutes.into())),
        }
    }
}

impl FromStr for MuteMinutes {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or("Mute time must be a whole number of minutes from 0 to 527040.")
    }
}

impl Display for MuteMinutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_disabled() {
            return write!(f, "disabled");
        }

        let days = self.0 / (24 * 60);
        let hours = self.0 / 60 % 24;
        let minutes = self.0 % 60;

        let mut first = true;
        for (amount, unit) in [(days, "day"), (hours, "hour"), (minutes, "minute")] {
            if amount == 0 {
                continue;
            }
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{amount} {unit}")?;
            if amount != 1 {
                write!(f, "s")?;
            }
        }
        Ok(())
    }
}

/// How to decide whether someone is an admin of the moderated chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCheck {
    /// Only users in this list are admins. No API requests are made.
    Static(HashSet<UserId>),
    /// Ask Telegram about the user's status in the chat every time.
    Live,
}

impl AdminCheck {
    /// Parse a list of user IDs separated by commas and/or whitespace.
    /// An empty list yields [`AdminCheck::Live`].
    ///
    /// # Errors
    /// Errors if any of the entries is not an integer.
    pub fn parse_list(list: &str) -> Result<Self, ParseIntError> {
        let ids = list
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|x| !x.is_empty())
            .map(|x| x.parse().map(UserId))
            .collect::<Result<HashSet<UserId>, _>>()?;

        if ids.is_empty() {
            Ok(AdminCheck::Live)
        } else {
            Ok(AdminCheck::Static(ids))
        }
    }

    /// Checks if the sender of this message is an admin of the chat it was sent in.
    pub async fn is_sender_admin(&self, bot: &Bot, message: &Message) -> Result<bool, RequestError> {
        // check if a chat sent this, i.e. an anonymous admin.
        // In such a case, "from" is @GroupAnonymousBot for backwards compatibility.
        if let Some(sender_chat) = &message.sender_chat {
            if sender_chat.id == message.chat.id {
                return Ok(true);
            }

            return match self {
                AdminCheck::Static(_) => Ok(false),
                AdminCheck::Live => {
                    // It may have been sent by the channel linked to this chat, then.
                    let chat_full = bot.get_chat(message.chat.id).await?;
                    Ok(chat_full.linked_chat_id() == Some(sender_chat.id.0))
                }
            };
        }

        let Some(user) = &message.from else {
            return Ok(false);
        };

        match self {
            AdminCheck::Static(ids) => Ok(ids.contains(&user.id)),
            AdminCheck::Live => {
                let ChatMember { kind, .. } =
                    bot.get_chat_member(message.chat.id, user.id).await?;
                Ok(kind.is_privileged())
            }
        }
    }
}
