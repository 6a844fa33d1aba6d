//! Inbound events reduced to the four shapes the bot reacts to.

use teloxide::types::{CallbackQuery, Message, MessageEntityKind, UpdateKind};

/// A user that just joined a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedUser {
    pub id: u64,
    pub first_name: String,
    pub username: Option<String>,
}

impl JoinedUser {
    /// `@handle` when the user has one, otherwise their first name.
    pub fn mention(&self) -> String {
        match self.username.as_deref() {
            Some(handle) if !handle.is_empty() => format!("@{}", handle),
            _ => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    MemberJoined {
        chat_id: i64,
        new_users: Vec<JoinedUser>,
    },
    Command {
        chat_id: i64,
        name: String,
        args: String,
        sender_username: Option<String>,
    },
    PlainMessage {
        chat_id: i64,
    },
    Callback {
        id: String,
        data: String,
        /// Missing when the button's message is no longer accessible.
        chat_id: Option<i64>,
    },
}

impl Update {
    /// Map a wire update. Kinds the bot does not handle yield `None`.
    pub fn from_telegram(update: &teloxide::types::Update) -> Option<Self> {
        match &update.kind {
            UpdateKind::Message(message) => Some(Self::from_message(message)),
            UpdateKind::CallbackQuery(query) => Some(Self::from_callback(query)),
            _ => None,
        }
    }

    fn from_message(message: &Message) -> Self {
        let chat_id = message.chat.id.0;

        if let Some(members) = message.new_chat_members() {
            if !members.is_empty() {
                return Update::MemberJoined {
                    chat_id,
                    new_users: members
                        .iter()
                        .map(|u| JoinedUser {
                            id: u.id.0,
                            first_name: u.first_name.clone(),
                            username: u.username.clone(),
                        })
                        .collect(),
                };
            }
        }

        let starts_with_command = message.entities().map_or(false, |entities| {
            entities
                .first()
                .map_or(false, |e| e.offset == 0 && e.kind == MessageEntityKind::BotCommand)
        });
        if starts_with_command {
            if let Some((name, args)) = message.text().and_then(parse_command) {
                return Update::Command {
                    chat_id,
                    name,
                    args,
                    sender_username: message.from.as_ref().and_then(|u| u.username.clone()),
                };
            }
        }

        Update::PlainMessage { chat_id }
    }

    fn from_callback(query: &CallbackQuery) -> Self {
        Update::Callback {
            id: query.id.0.clone(),
            data: query.data.clone().unwrap_or_default(),
            chat_id: query.message.as_ref().map(|m| m.chat().id.0),
        }
    }
}

/// Split `/name@bot rest of line` into `("name", "rest of line")`.
///
/// The name keeps its case; the `@bot` suffix used in groups is dropped.
pub fn parse_command(text: &str) -> Option<(String, String)> {
    let rest = text.strip_prefix('/')?;
    let (head, args) = match rest.find(char::is_whitespace) {
        Some(idx) => (&rest[..idx], rest[idx..].trim()),
        None => (rest, ""),
    };
    let name = head.split('@').next().unwrap_or_default();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), args.to_string()))
}
