use crate::content::Content;
use crate::model::User;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Private message folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageFolder {
    Received,
    Sent,
    Custom(i64),
}

impl MessageFolder {
    /// vBulletin folder id
    pub fn id(self) -> i64 {
        match self {
            MessageFolder::Received => 0,
            MessageFolder::Sent => -1,
            MessageFolder::Custom(id) => id,
        }
    }

    pub fn from_id(id: i64) -> Self {
        match id {
            0 => MessageFolder::Received,
            -1 => MessageFolder::Sent,
            id => MessageFolder::Custom(id),
        }
    }
}

/// A private message; listings leave `content` empty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrivateMessage {
    pub id: u64,
    pub sender: Option<User>,
    pub recipients: Vec<User>,
    pub sent_at: Option<NaiveDateTime>,
    pub title: String,
    pub content: Content,
    pub unread: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageFolderPage {
    pub folder: MessageFolder,
    pub page: u32,
    pub page_count: u32,
    pub messages: Vec<PrivateMessage>,
}
