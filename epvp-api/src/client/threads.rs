//! Thread pages and thread actions

use super::{EpvpClient, Page};
use crate::content::Content;
use crate::error::{EpvpError, Result};
use crate::model::{Post, Section, SectionThread, ThreadPage};
use crate::{parser, urls};

impl EpvpClient {
    /// Fetch one page of a thread
    pub fn thread_page(&self, thread_id: u64, page: u32) -> Result<ThreadPage> {
        let page = page.max(1);
        let response = self.get(&format!(
            "forum/showthread.php?t={}&page={}",
            thread_id, page
        ))?;
        parser::parse_thread_page(&response.html, thread_id, page, Self::today())
    }

    /// Posts of the first `pages` pages of a thread, fetched one after another
    ///
    /// Stops early at the thread's last page.
    pub fn thread_posts(&self, thread_id: u64, pages: u32) -> Result<Vec<Post>> {
        let mut posts = Vec::new();
        let mut page = 1;
        loop {
            let current = self.thread_page(thread_id, page)?;
            let last = page >= pages || !current.has_next();
            posts.extend(current.posts);
            if last {
                return Ok(posts);
            }
            page += 1;
        }
    }

    /// Open a new thread in `section`
    ///
    /// The id of the new thread is taken from the page the forum redirects
    /// to after posting.
    pub fn create_thread(
        &self,
        section: &Section,
        title: &str,
        content: &Content,
    ) -> Result<SectionThread> {
        let (user, token) = self.require_login()?;
        if title.trim().is_empty() {
            return Err(EpvpError::InvalidArgument("thread title is empty".to_string()));
        }
        if content.is_empty() {
            return Err(EpvpError::InvalidArgument("thread content is empty".to_string()));
        }

        let section_id = section.id.to_string();
        let user_id = user.id.to_string();
        let message = content.to_bbcode();
        let form = [
            ("subject", title),
            ("message", message.as_str()),
            ("wysiwyg", "0"),
            ("iconid", "0"),
            ("taglist", ""),
            ("s", ""),
            ("securitytoken", token.as_str()),
            ("f", section_id.as_str()),
            ("do", "postthread"),
            ("posthash", ""),
            ("poststarttime", ""),
            ("loggedinuser", user_id.as_str()),
            ("sbutton", "Submit New Thread"),
            ("signature", "1"),
            ("parseurl", "1"),
        ];
        let page = self.post_form(
            &format!("forum/newthread.php?do=postthread&f={}", section.id),
            &form,
        )?;

        let id = self
            .redirect_target(&page, urls::thread_id_from_link)?
            .ok_or(EpvpError::HtmlParse("new thread link"))?;
        log::debug!("created thread {} in {}", id, section.url_name);

        let mut thread = SectionThread::new(id, title.trim());
        thread.section = Some(section.clone());
        thread.creator = Some(user);
        Ok(thread)
    }

    /// Reply to a thread, returning the new post's id when the forum reveals it
    pub fn reply(&self, thread_id: u64, content: &Content) -> Result<Option<u64>> {
        let (user, token) = self.require_login()?;
        if content.is_empty() {
            return Err(EpvpError::InvalidArgument("reply is empty".to_string()));
        }

        let thread = thread_id.to_string();
        let user_id = user.id.to_string();
        let message = content.to_bbcode();
        let form = [
            ("title", ""),
            ("message", message.as_str()),
            ("wysiwyg", "0"),
            ("iconid", "0"),
            ("s", ""),
            ("securitytoken", token.as_str()),
            ("do", "postreply"),
            ("t", thread.as_str()),
            ("p", ""),
            ("specifiedpost", "0"),
            ("posthash", ""),
            ("poststarttime", ""),
            ("loggedinuser", user_id.as_str()),
            ("multiquoteempty", ""),
            ("sbutton", "Submit Reply"),
            ("signature", "1"),
            ("parseurl", "1"),
        ];
        let page = self.post_form(
            &format!("forum/newreply.php?do=postreply&t={}", thread_id),
            &form,
        )?;

        let post_id = self.redirect_target(&page, urls::post_id_from_link)?;
        log::debug!("replied to thread {} with post {:?}", thread_id, post_id);
        Ok(post_id)
    }

    /// Open a closed thread or close an open one (moderators and thread owners)
    pub fn toggle_closed(&self, thread_id: u64) -> Result<()> {
        let (_, token) = self.require_login()?;
        let thread = thread_id.to_string();
        let form = [
            ("s", ""),
            ("securitytoken", token.as_str()),
            ("t", thread.as_str()),
            ("do", "openclosethread"),
        ];
        self.post_form(
            &format!("forum/postings.php?do=openclosethread&t={}", thread_id),
            &form,
        )?;
        Ok(())
    }

    /// Vote on a thread, 1 (terrible) to 5 (excellent)
    pub fn rate_thread(&self, thread_id: u64, rating: u8) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(EpvpError::InvalidArgument(format!(
                "thread rating must be between 1 and 5, got {}",
                rating
            )));
        }
        let (_, token) = self.require_login()?;

        let thread = thread_id.to_string();
        let vote = rating.to_string();
        let form = [
            ("vote", vote.as_str()),
            ("s", ""),
            ("securitytoken", token.as_str()),
            ("t", thread.as_str()),
            ("pp", "10"),
            ("page", "1"),
        ];
        self.post_form("forum/threadrate.php", &form)?;
        Ok(())
    }

    /// Thank the author of a post
    pub fn thank_post(&self, post_id: u64) -> Result<()> {
        let (_, token) = self.require_login()?;

        let mut url = self.url("forum/post_thanks.php")?;
        url.query_pairs_mut()
            .append_pair("do", "post_thanks_add")
            .append_pair("p", &post_id.to_string())
            .append_pair("securitytoken", &token);
        let page = self.send(self.client.get(url))?;

        if let Some(message) = parser::error_message(&scraper::Html::parse_document(&page.html)) {
            return Err(EpvpError::Forum(message));
        }
        Ok(())
    }

    /// Resolve an id from where a form submission landed
    ///
    /// Tries the final URL first, then the target of an intermediate
    /// "thank you for posting" page, following it once if the target itself
    /// does not carry the id.
    fn redirect_target(&self, page: &Page, extract: fn(&str) -> Option<u64>) -> Result<Option<u64>> {
        if let Some(id) = extract(page.url.as_str()) {
            return Ok(Some(id));
        }

        let Some(target) = refresh_target(&page.html) else {
            return Ok(None);
        };
        if let Some(id) = extract(&target) {
            return Ok(Some(id));
        }

        let url = page
            .url
            .join(&target)
            .map_err(|e| EpvpError::ClientInit(e.to_string()))?;
        let followed = self.send(self.client.get(url))?;
        Ok(extract(followed.url.as_str()))
    }
}

/// Target of a `<meta http-equiv="Refresh">` redirect page
fn refresh_target(html: &str) -> Option<String> {
    let captures = regex!(r#"(?i)<meta\s+http-equiv="refresh"\s+content="\d+;\s*url=([^"]+)""#)
        .captures(html)?;
    Some(captures.get(1)?.as_str().replace("&amp;", "&"))
}
