use std::future::Future;

use teloxide::{
    payloads::SendMessageSetters,
    requests::Requester,
    sugar::request::{RequestLinkPreviewExt, RequestReplyExt},
    types::{Message, MessageEntityRef, MessageId, ParseMode, Recipient},
    Bot, RequestError,
};

use crate::teloxide_retry;

pub trait MessageStuff {
    /// Text of the message, or its caption if it's a media message.
    fn text_full(&self) -> Option<&str>;
    /// Entities of the text of the message, or of its caption if it's a media message.
    fn parse_entities_full(&self) -> Option<Vec<MessageEntityRef<'_>>>;
    /// `true` if this is a "user joined" or "user left" service message.
    fn is_join_or_leave(&self) -> bool;
}

impl MessageStuff for Message {
    fn text_full(&self) -> Option<&str> {
        self.text().or_else(|| self.caption())
    }
    fn parse_entities_full(&self) -> Option<Vec<MessageEntityRef<'_>>> {
        self.parse_entities()
            .or_else(|| self.parse_caption_entities())
    }
    fn is_join_or_leave(&self) -> bool {
        self.new_chat_members().is_some() || self.left_chat_member().is_some()
    }
}

pub trait BotArchSendMsg {
    /// Opinionated method to send a message, with HTML markup, no link previews,
    /// and retries due to flood waiting or network issues.
    fn archsendmsg_no_link_preview<'a>(
        &'a self,
        to_where: impl Into<Recipient> + Send,
        text: impl Into<&'a str> + Send,
        reply_to: impl Into<Option<MessageId>> + Send,
    ) -> impl Future<Output = Result<Message, RequestError>> + Send;
}

impl BotArchSendMsg for Bot {
    async fn archsendmsg_no_link_preview<'a>(
        &'a self,
        to_where: impl Into<Recipient> + Send,
        text: impl Into<&'a str> + Send,
        reply_to: impl Into<Option<MessageId>> + Send,
    ) -> Result<Message, RequestError> {
        let to_where: Recipient = to_where.into();
        let text = text.into();
        let reply_to = reply_to.into();

        teloxide_retry!({
            let mut request = self
                .send_message(to_where.clone(), text)
                .parse_mode(ParseMode::Html)
                .disable_link_preview(true);
            if let Some(reply_to) = reply_to {
                request = request.reply_to(reply_to);
            }
            request.await
        })
    }
}
