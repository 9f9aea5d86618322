use std::sync::LazyLock;

use arch_bot_commons::useful_methods::MessageStuff;
use regex::Regex;
use teloxide::types::{Chat, Message, MessageEntityKind, User};

/// Things in plain text that we consider to be a link, even if Telegram didn't mark them as one.
static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://|t\.me/|telegram\.me/")
        .expect("Regex will always be valid")
});

/// Returns `true` if this text has something that looks like a link in it.
#[must_use]
pub fn text_has_link(text: &str) -> bool {
    LINK_REGEX.is_match(text)
}

/// Returns `true` if this kind of message entity is a link.
#[must_use]
pub fn entity_is_link(kind: &MessageEntityKind) -> bool {
    matches!(kind, MessageEntityKind::Url | MessageEntityKind::TextLink { .. })
}

/// Returns `true` if the text or caption of this message has any links.
#[must_use]
pub fn message_has_link(message: &Message) -> bool {
    if message.text_full().is_some_and(text_has_link) {
        return true;
    }

    message
        .parse_entities_full()
        .unwrap_or_default()
        .iter()
        .any(|x| entity_is_link(x.kind()))
}

/// Tries to print the user in the prettiest way possible, with either `@username` or full name.
/// Optionally allows including user ID.
#[must_use]
pub fn user_name_prettyprint(user: &User, with_id: bool) -> String {
    let mut name = match &user.username {
        Some(username) => format!("@{username}"),
        None => user.full_name(),
    };

    if with_id {
        use std::fmt::Write;
        write!(name, " (userid {})", user.id).expect("Writing to a String never fails");
    }

    name
}

/// Tries to print the chat name as either `@username` or chat title.
#[must_use]
pub fn chat_name_prettyprint(chat: &Chat, with_id: bool) -> String {
    let name = match (chat.username(), chat.title()) {
        (Some(username), _) => format!("@{username}"),
        (None, Some(title)) => title.to_string(),
        (None, None) => "an untitled chat".to_string(),
    };

    match with_id {
        true => format!("{name} (chatid {})", chat.id),
        false => name,
    }
}

/// Tries to print the name of the sender of this message, using either [`user_name_prettyprint`]
/// or [`chat_name_prettyprint`].
#[must_use]
pub fn sender_name_prettyprint(message: &Message, with_id: bool) -> String {
    if let Some(chat) = &message.sender_chat {
        chat_name_prettyprint(chat, with_id)
    } else if let Some(user) = &message.from {
        user_name_prettyprint(user, with_id)
    } else {
        // Shouldn't happen, but eh.
        "a private sender".to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn links_in_text() {
        assert!(text_has_link("look at http://example.com"));
        assert!(text_has_link("https://example.com/thing?a=b"));
        assert!(text_has_link("HTTPS://EXAMPLE.COM"));
        assert!(text_has_link("join t.me/somechannel now"));
        assert!(text_has_link("t.me/somechannel"));
        assert!(text_has_link("(telegram.me/joinchat/abc)"));
        assert!(text_has_link("T.ME/shouting"));
        assert!(text_has_link("what.me/worry"));
        assert!(text_has_link("joint.me/chan"));
        assert!(text_has_link("1t.me/x"));
        assert!(text_has_link("xtelegram.me/chan"));
    }

    #[test]
    fn no_links_in_text() {
        assert!(!text_has_link(""));
        assert!(!text_has_link("hello everyone"));
        assert!(!text_has_link("http is a protocol"));
        assert!(!text_has_link("let me/you decide"));
        assert!(!text_has_link("t.me alone"));
    }

    fn message(json: serde_json::Value) -> Message {
        let mut base = serde_json::json!({
            "message_id": 1,
            "date": 1700000000,
            "chat": { "id": -1001234, "type": "supergroup", "title": "Chat" },
            "from": { "id": 42, "is_bot": false, "first_name": "Someone" },
        });
        for (key, value) in json.as_object().unwrap() {
            base[key] = value.clone();
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn plain_messages() {
        assert!(!message_has_link(&message(serde_json::json!({ "text": "hello" }))));
        assert!(message_has_link(&message(
            serde_json::json!({ "text": "see https://example.com" })
        )));
    }

    #[test]
    fn caption_links() {
        let photo = serde_json::json!([{
            "file_id": "a", "file_unique_id": "b", "width": 1, "height": 1, "file_size": 1
        }]);

        assert!(message_has_link(&message(serde_json::json!({
            "photo": photo, "caption": "join t.me/spam"
        }))));
        assert!(!message_has_link(&message(serde_json::json!({
            "photo": photo, "caption": "nice cat"
        }))));
        assert!(!message_has_link(&message(serde_json::json!({ "photo": photo }))));
    }

    #[test]
    fn hidden_text_link() {
        assert!(message_has_link(&message(serde_json::json!({
            "text": "click here",
            "entities": [{
                "type": "text_link", "offset": 0, "length": 10, "url": "https://example.com/"
            }],
        }))));
    }

    #[test]
    fn bare_domain_marked_by_telegram() {
        // No scheme, no t.me, only the entity says it's a link.
        assert!(!text_has_link("visit example.com"));
        assert!(message_has_link(&message(serde_json::json!({
            "text": "visit example.com",
            "entities": [{ "type": "url", "offset": 6, "length": 11 }],
        }))));
        assert!(!message_has_link(&message(serde_json::json!({
            "text": "visit example.com",
            "entities": [{ "type": "bold", "offset": 0, "length": 5 }],
        }))));
    }

    #[test]
    fn link_entities() {
        assert!(entity_is_link(&MessageEntityKind::Url));
        assert!(entity_is_link(&MessageEntityKind::TextLink {
            url: url::Url::parse("https://example.com/").unwrap()
        }));

        assert!(!entity_is_link(&MessageEntityKind::Bold));
        assert!(!entity_is_link(&MessageEntityKind::Mention));
        assert!(!entity_is_link(&MessageEntityKind::Hashtag));
        assert!(!entity_is_link(&MessageEntityKind::Email));
    }
}
