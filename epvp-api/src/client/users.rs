//! Member profiles, member search and signatures

use super::EpvpClient;
use crate::content::Content;
use crate::error::Result;
use crate::model::{Profile, User};
use crate::parser;
use scraper::Html;

impl EpvpClient {
    /// Fetch a member's profile page
    ///
    /// Works as guest. `member.php` redirects to the SEO profile URL.
    pub fn profile(&self, user_id: u64) -> Result<Profile> {
        let page = self.get(&format!("forum/member.php?u={}", user_id))?;
        parser::parse_profile(&page.html, user_id, Self::today())
    }

    /// Members whose name starts with `name_prefix`
    pub fn search_users(&self, name_prefix: &str) -> Result<Vec<User>> {
        let token = self.security_token();
        let form = [
            ("do", "usersearch"),
            ("fragment", name_prefix),
            ("securitytoken", token.as_str()),
        ];
        let page = self.post_form("forum/ajax.php?do=usersearch", &form)?;

        let document = Html::parse_fragment(&page.html);
        Ok(document
            .select(selector!("user[userid]"))
            .filter_map(|user| {
                let id = user.value().attr("userid")?.parse().ok()?;
                let name = parser::non_empty_text(user)?;
                Some(User::new(id, name))
            })
            .collect())
    }

    /// Replace the logged-in member's signature
    pub fn update_signature(&self, signature: &Content) -> Result<()> {
        let (user, token) = self.require_login()?;
        let message = signature.to_bbcode();
        let form = [
            ("message", message.as_str()),
            ("wysiwyg", "0"),
            ("s", ""),
            ("securitytoken", token.as_str()),
            ("do", "updatesignature"),
        ];
        self.post_form("forum/profile.php?do=updatesignature", &form)?;
        log::debug!("updated signature of {}", user.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{logged_in_client, test_client};
    use crate::error::EpvpError;
    use mockito::Matcher;

    #[test]
    fn test_profile() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/forum/member.php")
            .match_query(Matcher::UrlEncoded("u".into(), "4759".into()))
            .with_status(200)
            .with_body(
                r#"<div id="username_box"><h1>Mostey</h1><h2>Coder</h2></div>
                <div id="collapseobj_stats"><ul><li><span class="shade">Total Posts:</span> 12</li></ul></div>"#,
            )
            .expect(1)
            .create();

        let profile = test_client(&server).profile(4759).unwrap();

        assert_eq!(profile.user, User::new(4759, "Mostey"));
        assert_eq!(profile.title.as_deref(), Some("Coder"));
        assert_eq!(profile.statistics.posts, Some(12));
        mock.assert();
    }

    #[test]
    fn test_search_users() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/forum/ajax.php")
            .match_query(Matcher::Any)
            .match_body(Matcher::UrlEncoded("fragment".into(), "Mos".into()))
            .with_status(200)
            .with_header("content-type", "text/xml")
            .with_body(
                r#"<?xml version="1.0" encoding="windows-1252"?>
<users>
  <user userid="4759">Mostey</user>
  <user userid="123">Moskito &amp; Co</user>
</users>"#,
            )
            .expect(1)
            .create();

        let users = test_client(&server).search_users("Mos").unwrap();

        assert_eq!(
            users,
            vec![User::new(4759, "Mostey"), User::new(123, "Moskito & Co")]
        );
        mock.assert();
    }

    #[test]
    fn test_update_signature() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/forum/profile.php")
            .match_query(Matcher::UrlEncoded("do".into(), "updatesignature".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("message".into(), "[B]sig[/B]".into()),
                Matcher::UrlEncoded("securitytoken".into(), "1426339200-abcdef".into()),
            ]))
            .with_status(200)
            .with_body("<html>saved</html>")
            .expect(1)
            .create();

        let client = logged_in_client(&server);
        client
            .update_signature(&Content::from_bbcode("[B]sig[/B]"))
            .unwrap();
        mock.assert();

        assert!(matches!(
            test_client(&server).update_signature(&Content::text("x")),
            Err(EpvpError::NotLoggedIn)
        ));
    }
}
