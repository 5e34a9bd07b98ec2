//! Chatbox

use super::EpvpClient;
use crate::content::Content;
use crate::error::{EpvpError, Result};
use crate::model::{Channel, Shout};
use crate::parser;

const CHATBOX_AJAX: &str = "forum/mgc_cb_evo_ajax.php";

impl EpvpClient {
    /// Current shouts of a channel, newest first
    pub fn shouts(&self, channel: Channel) -> Result<Vec<Shout>> {
        let (_, token) = self.require_login()?;
        let channel_id = channel.id().to_string();
        let form = [
            ("do", "ajax_refresh_chat"),
            ("status", "open"),
            ("channel_id", channel_id.as_str()),
            ("location", "inc"),
            ("first_load", "1"),
            ("s", ""),
            ("securitytoken", token.as_str()),
        ];
        let page = self.post_form(CHATBOX_AJAX, &form)?;
        parser::parse_shouts(&page.html, Self::today())
    }

    /// Post a message to a channel
    pub fn shout(&self, channel: Channel, content: &Content) -> Result<()> {
        let (_, token) = self.require_login()?;
        if content.is_empty() {
            return Err(EpvpError::InvalidArgument("shout is empty".to_string()));
        }

        let channel_id = channel.id().to_string();
        let chat = content.to_bbcode();
        let form = [
            ("do", "ajax_chat"),
            ("channel_id", channel_id.as_str()),
            ("chat", chat.as_str()),
            ("s", ""),
            ("securitytoken", token.as_str()),
        ];
        self.post_form(CHATBOX_AJAX, &form)?;
        log::debug!("shouted in channel {}", channel_id);
        Ok(())
    }

    /// One page of a channel's archive, newest first
    pub fn shout_history(&self, channel: Channel, page: u32) -> Result<Vec<Shout>> {
        self.require_login()?;
        let response = self.get(&format!(
            "forum/mgc_cb_evo.php?do=view_archives&page={}&channel_id={}",
            page.max(1),
            channel.id()
        ))?;
        parser::parse_shouts(&response.html, Self::today())
    }
}
