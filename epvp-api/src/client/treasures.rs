//! The Black Market treasures

use super::EpvpClient;
use crate::error::{EpvpError, Result};
use crate::model::{Treasure, TreasureListing, TreasurePage};
use crate::parser;

impl EpvpClient {
    /// One page of the logged-in member's treasures
    pub fn treasures(&self, listing: TreasureListing, page: u32) -> Result<TreasurePage> {
        let (user, _) = self.require_login()?;
        let page = page.max(1);
        let response = self.get(&format!(
            "theblackmarket/treasures/{}/{}",
            listing.path_segment(),
            page
        ))?;

        let mut treasures =
            parser::parse_treasure_page(&response.html, listing, page, Self::today())?;
        // the listing only names the other party
        for treasure in &mut treasures.treasures {
            match listing {
                TreasureListing::Bought => treasure.buyer = Some(user.clone()),
                TreasureListing::Listed | TreasureListing::Sold => {
                    treasure.seller = Some(user.clone())
                }
            }
        }
        Ok(treasures)
    }

    /// Details of a treasure; the content is only shown to seller and buyer
    pub fn treasure(&self, treasure_id: u64) -> Result<Treasure> {
        self.require_login()?;
        let response = self.get(&format!("theblackmarket/treasure/{}", treasure_id))?;
        parser::parse_treasure(&response.html, treasure_id, Self::today())
    }

    /// List a new treasure for `cost` elite*gold
    ///
    /// Returns the id of the new treasure when the market redirects to it.
    pub fn create_treasure(&self, title: &str, content: &str, cost: u64) -> Result<Option<u64>> {
        let (_, token) = self.require_login()?;
        if cost < 1 {
            return Err(EpvpError::InvalidArgument(
                "treasure cost must be at least 1 elite*gold".to_string(),
            ));
        }
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(EpvpError::InvalidArgument(
                "treasure needs a title and content".to_string(),
            ));
        }

        let cost = cost.to_string();
        let form = [
            ("title", title),
            ("content", content),
            ("cost", cost.as_str()),
            ("securitytoken", token.as_str()),
            ("submit", "Submit"),
        ];
        let page = self.post_form("theblackmarket/treasures/", &form)?;

        let id = regex!(r"/treasure/(\d+)")
            .captures(page.url.path())
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok());
        log::debug!("listed treasure {:?}", id);
        Ok(id)
    }

    /// Buy a listed treasure
    pub fn buy_treasure(&self, treasure_id: u64) -> Result<Treasure> {
        let (_, token) = self.require_login()?;
        let form = [("buy", "1"), ("securitytoken", token.as_str())];
        let page = self.post_form(&format!("theblackmarket/treasure/{}", treasure_id), &form)?;
        parser::parse_treasure(&page.html, treasure_id, Self::today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{logged_in_client, test_client};
    use crate::model::User;
    use mockito::Matcher;

    const DETAIL: &str = r#"<table class="treasure_details">
  <tr><td>Title:</td><td>Steam key</td></tr>
  <tr><td>Cost:</td><td>50</td></tr>
  <tr><td>Seller:</td><td><a href="https://www.elitepvpers.com/forum/members/77-newbie.html">newbie</a></td></tr>
  <tr><td>Buyer:</td><td><a href="https://www.elitepvpers.com/forum/members/4759-mostey.html">Mostey</a></td></tr>
</table>
<div class="treasure_content">KEY-123</div>"#;

    #[test]
    fn test_listed_treasures() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/theblackmarket/treasures/listed/2")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"<table id="treasures"><tbody><tr>
  <td><a href="/theblackmarket/treasure/5">Key</a></td><td>10</td><td></td><td>03-01-2015, 12:00</td>
</tr></tbody></table>"#,
            )
            .expect(1)
            .create();

        let page = logged_in_client(&server)
            .treasures(TreasureListing::Listed, 2)
            .unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.treasures.len(), 1);
        assert_eq!(page.treasures[0].seller, Some(User::new(4759, "Mostey")));
        assert_eq!(page.treasures[0].buyer, None);
        mock.assert();
    }

    #[test]
    fn test_buy_treasure() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/theblackmarket/treasure/5")
            .match_query(Matcher::Any)
            .match_body(Matcher::UrlEncoded("buy".into(), "1".into()))
            .with_status(200)
            .with_body(DETAIL)
            .expect(1)
            .create();

        let treasure = logged_in_client(&server).buy_treasure(5).unwrap();

        assert_eq!(treasure.id, 5);
        assert_eq!(treasure.buyer, Some(User::new(4759, "Mostey")));
        assert_eq!(treasure.content.as_deref(), Some("KEY-123"));
        mock.assert();
    }

    #[test]
    fn test_create_treasure() {
        let mut server = mockito::Server::new();
        let post = server
            .mock("POST", "/theblackmarket/treasures/")
            .match_query(Matcher::Any)
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("title".into(), "Key".into()),
                Matcher::UrlEncoded("cost".into(), "25".into()),
            ]))
            .with_status(303)
            .with_header("location", "/theblackmarket/treasure/42")
            .expect(1)
            .create();
        let landing = server
            .mock("GET", "/theblackmarket/treasure/42")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(DETAIL)
            .expect(1)
            .create();

        let client = logged_in_client(&server);
        assert_eq!(client.create_treasure("Key", "KEY-123", 25).unwrap(), Some(42));
        assert!(matches!(
            client.create_treasure("Key", "KEY-123", 0),
            Err(EpvpError::InvalidArgument(_))
        ));
        post.assert();
        landing.assert();

        assert!(matches!(
            test_client(&server).treasure(42),
            Err(EpvpError::NotLoggedIn)
        ));
    }
}
