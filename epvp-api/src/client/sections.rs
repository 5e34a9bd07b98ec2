//! Section thread listings

use super::EpvpClient;
use crate::error::Result;
use crate::model::{Section, SectionPage};
use crate::parser;

impl EpvpClient {
    /// Fetch one page of a section's thread listing
    ///
    /// Works as guest. The returned section carries the numeric id found on
    /// the page, so a `Section` built from the slug alone can be used to open
    /// threads afterwards.
    pub fn section_threads(&self, section: &Section, page: u32) -> Result<SectionPage> {
        let page = page.max(1);
        let response = self.get(&section.listing_path(page))?;
        parser::parse_section_page(&response.html, section, page)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_client;
    use crate::error::EpvpError;
    use crate::model::Section;
    use mockito::Matcher;

    #[test]
    fn test_section_threads() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/forum/trading/index3.html")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"<input type="hidden" name="f" value="12" />
<div class="pagenav"><table><tr><td class="vbmenu_control">Page 3 of 9</td></tr></table></div>
<table><tbody id="threadbits_forum_12"><tr>
  <td id="td_threadtitle_77"><a id="thread_title_77" href="https://www.elitepvpers.com/forum/trading/77-wts.html">WTS</a></td>
</tr></tbody></table>"#,
            )
            .expect(1)
            .create();

        let page = test_client(&server)
            .section_threads(&Section::new(0, "trading"), 3)
            .unwrap();

        assert_eq!(page.section, Section::new(12, "trading"));
        assert_eq!(page.page, 3);
        assert!(page.has_next());
        assert_eq!(page.threads.len(), 1);
        assert_eq!(page.threads[0].title, "WTS");
        mock.assert();
    }

    #[test]
    fn test_missing_section() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/forum/nope/index.html")
            .match_query(Matcher::Any)
            .with_status(404)
            .create();

        assert!(matches!(
            test_client(&server).section_threads(&Section::new(0, "nope"), 1),
            Err(EpvpError::InvalidStatus { .. })
        ));
    }
}
