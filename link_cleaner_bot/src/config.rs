use std::{fmt::Display, fs};

use teloxide::types::ChatId;

use crate::types::{AdminCheck, MuteMinutes};

/// Default connection string of the settings database.
pub const DEFAULT_SETTINGS_DB: &str = "sqlite:link_cleaner_bot.sqlite";

/// Everything the bot needs to know before it can start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot API token.
    pub token: String,
    /// The only chat this bot moderates.
    pub allowed_chat: ChatId,
    /// How admins are recognized.
    pub admins: AdminCheck,
    /// Mute time used until an admin sets one with `/mute_time`.
    pub default_mute: MuteMinutes,
    /// Connection string of the settings database.
    pub settings_db: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither `BOT_TOKEN` nor the key file are available.
    MissingToken,
    /// A required variable is not set.
    Missing(&'static str),
    /// A variable is set, but makes no sense.
    Invalid {
        variable: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingToken => write!(
                f,
                "BOT_TOKEN is not set and the \"{}\" key file could not be read",
                key_file_name()
            ),
            ConfigError::Missing(variable) => write!(f, "{variable} is not set"),
            ConfigError::Invalid {
                variable,
                value,
                reason,
            } => write!(f, "{variable}={value:?} is invalid: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Name of the file with the bot token, used if `BOT_TOKEN` is not set.
fn key_file_name() -> &'static str {
    match cfg!(debug_assertions) {
        true => "key_debug",
        false => "key",
    }
}

impl Config {
    /// Load the configuration from the process environment, falling back to the key file
    /// for the bot token.
    ///
    /// # Errors
    /// Errors if a required variable is missing or any variable is unparsable.
    pub fn load() -> Result<Config, ConfigError> {
        Self::from_lookup(|name| {
            let value = std::env::var(name).ok();
            if value.is_none() && name == "BOT_TOKEN" {
                return fs::read_to_string(key_file_name()).ok();
            }
            value
        })
    }

    /// Same as [`Self::load`], but reads variables with `lookup` instead.
    ///
    /// # Errors
    /// Errors if a required variable is missing or any variable is unparsable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let token = lookup("BOT_TOKEN")
            .map(|x| x.trim().to_string())
            .filter(|x| !x.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let allowed_chat = {
            let value = lookup("ALLOWED_CHAT_ID").ok_or(ConfigError::Missing("ALLOWED_CHAT_ID"))?;
            let invalid = |reason| ConfigError::Invalid {
                variable: "ALLOWED_CHAT_ID",
                value: value.clone(),
                reason,
            };

            let id: i64 = value
                .trim()
                .parse()
                .map_err(|_| invalid("not an integer"))?;
            if id == 0 {
                return Err(invalid("must not be zero"));
            }
            ChatId(id)
        };

        let admins = match lookup("ADMIN_IDS") {
            Some(value) => AdminCheck::parse_list(&value).map_err(|_| ConfigError::Invalid {
                variable: "ADMIN_IDS",
                value,
                reason: "not a list of user IDs",
            })?,
            None => AdminCheck::Live,
        };

        let default_mute = match lookup("MUTE_MINUTES").filter(|x| !x.trim().is_empty()) {
            Some(value) => value.parse::<MuteMinutes>().map_err(|reason| ConfigError::Invalid {
                variable: "MUTE_MINUTES",
                value,
                reason,
            })?,
            None => MuteMinutes::DEFAULT,
        };

        let settings_db = lookup("SETTINGS_DB")
            .filter(|x| !x.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SETTINGS_DB.to_string());

        Ok(Config {
            token,
            allowed_chat,
            admins,
            default_mute,
            settings_db,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashMap;

    use teloxide::types::UserId;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn minimal_config() {
        let config = Config::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "123:abc\n"),
            ("ALLOWED_CHAT_ID", "-1001234567890"),
        ]))
        .unwrap();

        assert_eq!(config.token, "123:abc");
        assert_eq!(config.allowed_chat, ChatId(-1001234567890));
        assert_eq!(config.admins, AdminCheck::Live);
        assert_eq!(config.default_mute, MuteMinutes::DEFAULT);
        assert_eq!(config.settings_db, DEFAULT_SETTINGS_DB);
    }

    #[test]
    fn full_config() {
        let config = Config::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "123:abc"),
            ("ALLOWED_CHAT_ID", "-42"),
            ("ADMIN_IDS", "1,2"),
            ("MUTE_MINUTES", "0"),
            ("SETTINGS_DB", "sqlite::memory:"),
        ]))
        .unwrap();

        assert_eq!(
            config.admins,
            AdminCheck::Static([UserId(1), UserId(2)].into_iter().collect())
        );
        assert!(config.default_mute.is_disabled());
        assert_eq!(config.settings_db, "sqlite::memory:");
    }

    #[test]
    fn missing_token() {
        let err = Config::from_lookup(lookup_from(&[("ALLOWED_CHAT_ID", "5")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingToken);

        let err = Config::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "   "),
            ("ALLOWED_CHAT_ID", "5"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingToken);
    }

    #[test]
    fn bad_chat_id() {
        let err = Config::from_lookup(lookup_from(&[("BOT_TOKEN", "t")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("ALLOWED_CHAT_ID"));

        for (value, reason) in [("0", "must not be zero"), ("chat", "not an integer")] {
            let err = Config::from_lookup(lookup_from(&[
                ("BOT_TOKEN", "t"),
                ("ALLOWED_CHAT_ID", value),
            ]))
            .unwrap_err();
            assert_eq!(
                err,
                ConfigError::Invalid {
                    variable: "ALLOWED_CHAT_ID",
                    value: value.to_string(),
                    reason,
                }
            );
        }
    }

    #[test]
    fn bad_optional_values() {
        let err = Config::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "t"),
            ("ALLOWED_CHAT_ID", "5"),
            ("ADMIN_IDS", "1,two"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { variable: "ADMIN_IDS", .. }));

        let err = Config::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "t"),
            ("ALLOWED_CHAT_ID", "5"),
            ("MUTE_MINUTES", "forever"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { variable: "MUTE_MINUTES", .. }));
        assert!(err.to_string().starts_with("MUTE_MINUTES=\"forever\" is invalid"));
    }

    #[test]
    fn empty_optional_values_mean_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "t"),
            ("ALLOWED_CHAT_ID", "5"),
            ("ADMIN_IDS", ""),
            ("MUTE_MINUTES", " "),
            ("SETTINGS_DB", ""),
        ]))
        .unwrap();

        assert_eq!(config.admins, AdminCheck::Live);
        assert_eq!(config.default_mute, MuteMinutes::DEFAULT);
        assert_eq!(config.settings_db, DEFAULT_SETTINGS_DB);
    }
}
