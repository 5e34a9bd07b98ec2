use crate::content::Content;
use crate::model::User;
use chrono::NaiveDateTime;
use serde::Serialize;

/// A post inside a thread
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: u64,
    /// None for posts of deleted or unregistered users
    pub author: Option<User>,
    pub author_title: Option<String>,
    pub posted_at: Option<NaiveDateTime>,
    pub title: Option<String>,
    pub content: Content,
    /// Members who thanked the post
    pub thanks: Vec<User>,
}
