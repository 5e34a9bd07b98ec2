use crate::content::Content;
use crate::model::User;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Chatbox channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    #[default]
    General,
    EnglishOnly,
}

impl Channel {
    pub fn id(self) -> u8 {
        match self {
            Channel::General => 0,
            Channel::EnglishOnly => 1,
        }
    }
}

/// A chatbox message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shout {
    pub id: u64,
    pub author: Option<User>,
    pub posted_at: Option<NaiveDateTime>,
    pub content: Content,
}
