//! Private messages

use super::EpvpClient;
use crate::content::Content;
use crate::error::{EpvpError, Result};
use crate::model::{MessageFolder, MessageFolderPage, PrivateMessage};
use crate::parser;
use itertools::Itertools;

/// Messages per folder page requested from the forum
const MESSAGES_PER_PAGE: u32 = 100;

impl EpvpClient {
    /// List one page of a message folder
    ///
    /// In the sent folder the logged-in member is filled in as sender.
    pub fn messages(&self, folder: MessageFolder, page: u32) -> Result<MessageFolderPage> {
        let (user, _) = self.require_login()?;
        let page = page.max(1);
        let response = self.get(&format!(
            "forum/private.php?folderid={}&pp={}&page={}",
            folder.id(),
            MESSAGES_PER_PAGE,
            page
        ))?;

        let mut listing =
            parser::parse_message_folder(&response.html, folder, page, Self::today())?;
        if folder == MessageFolder::Sent {
            for message in &mut listing.messages {
                message.sender = Some(user.clone());
            }
        }
        Ok(listing)
    }

    /// Open a message; the forum marks it as read
    pub fn message(&self, message_id: u64) -> Result<PrivateMessage> {
        self.require_login()?;
        let response = self.get(&format!("forum/private.php?do=showpm&pmid={}", message_id))?;
        parser::parse_message(&response.html, message_id, Self::today())
    }

    /// Send a message to one or more members, keeping a copy in the sent folder
    pub fn send_message<S: AsRef<str>>(
        &self,
        recipients: &[S],
        title: &str,
        content: &Content,
    ) -> Result<()> {
        let (_, token) = self.require_login()?;

        let recipients = recipients
            .iter()
            .map(|r| r.as_ref().trim())
            .filter(|r| !r.is_empty())
            .join(";");
        if recipients.is_empty() {
            return Err(EpvpError::InvalidArgument("no recipients".to_string()));
        }
        if title.trim().is_empty() {
            return Err(EpvpError::InvalidArgument("message title is empty".to_string()));
        }
        if content.is_empty() {
            return Err(EpvpError::InvalidArgument("message is empty".to_string()));
        }

        let message = content.to_bbcode();
        let form = [
            ("recipients", recipients.as_str()),
            ("bccrecipients", ""),
            ("title", title),
            ("message", message.as_str()),
            ("wysiwyg", "0"),
            ("iconid", "0"),
            ("s", ""),
            ("securitytoken", token.as_str()),
            ("do", "insertpm"),
            ("pmid", ""),
            ("forward", ""),
            ("sbutton", "Submit Message"),
            ("savecopy", "1"),
            ("signature", "1"),
            ("parseurl", "1"),
        ];
        self.post_form("forum/private.php?do=insertpm&pmid=", &form)?;
        log::debug!("sent message {:?} to {}", title, recipients);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{logged_in_client, test_client};
    use crate::model::User;
    use mockito::Matcher;

    const SENT_FOLDER: &str = r#"<html><body>
<table><tbody><tr>
  <td class="alt1">
    <div><span class="time">03-01-2015, 10:00</span>
      <a href="private.php?do=showpm&amp;pmid=77">Offer</a></div>
    <div class="smallfont"><span onclick="window.open('https://www.elitepvpers.com/forum/members/2-friend.html', '_self')">friend</span></div>
  </td>
  <td><input type="checkbox" name="pm[77]" value="0_older" /></td>
</tr></tbody></table>
</body></html>"#;

    #[test]
    fn test_sent_folder() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/forum/private.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("folderid".into(), "-1".into()),
                Matcher::UrlEncoded("pp".into(), "100".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(SENT_FOLDER)
            .expect(1)
            .create();

        let client = logged_in_client(&server);
        let folder = client.messages(MessageFolder::Sent, 0).unwrap();

        assert_eq!(folder.page, 1);
        assert_eq!(folder.messages.len(), 1);
        assert_eq!(folder.messages[0].sender, Some(User::new(4759, "Mostey")));
        assert_eq!(folder.messages[0].recipients, vec![User::new(2, "friend")]);
        mock.assert();

        assert!(matches!(
            test_client(&server).messages(MessageFolder::Received, 1),
            Err(EpvpError::NotLoggedIn)
        ));
    }

    #[test]
    fn test_send_message() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/forum/private.php")
            .match_query(Matcher::UrlEncoded("do".into(), "insertpm".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("recipients".into(), "friend;newbie".into()),
                Matcher::UrlEncoded("title".into(), "Hi".into()),
                Matcher::UrlEncoded("message".into(), "[U]hello[/U]".into()),
                Matcher::UrlEncoded("savecopy".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body("<html>Your message has been sent.</html>")
            .expect(1)
            .create();

        let client = logged_in_client(&server);
        client
            .send_message(&["friend", " newbie "], "Hi", &Content::from_bbcode("[U]hello[/U]"))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_send_message_validation() {
        let server = mockito::Server::new();
        let client = logged_in_client(&server);
        let empty: [&str; 0] = [];
        assert!(matches!(
            client.send_message(&empty, "Hi", &Content::text("x")),
            Err(EpvpError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.send_message(&["friend"], "", &Content::text("x")),
            Err(EpvpError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unknown_recipient() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/forum/private.php")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"<div id="posterrors"><ol><li>The following users were not found: nobody</li></ol></div>"#)
            .create();

        let client = logged_in_client(&server);
        assert!(matches!(
            client.send_message(&["nobody"], "Hi", &Content::text("x")),
            Err(EpvpError::Forum(_))
        ));
    }
}
