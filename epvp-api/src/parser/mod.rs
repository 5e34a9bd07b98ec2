//! HTML page parsers
//!
//! One submodule per page type. Every parser takes the raw HTML and returns
//! domain values; the helpers below hold what the page types share.

mod date;
mod message;
mod profile;
mod section;
mod shoutbox;
mod thread;
mod treasure;

pub(crate) use date::{parse_date, parse_datetime};
pub(crate) use message::{parse_message, parse_message_folder};
pub(crate) use profile::parse_profile;
pub(crate) use section::parse_section_page;
pub(crate) use shoutbox::parse_shouts;
pub(crate) use thread::{parse_posts, parse_thread_page};
pub(crate) use treasure::{parse_treasure, parse_treasure_page};

use crate::model::User;
use crate::urls;
use scraper::{ElementRef, Html};

/// Security token embedded in every forum page's inline script
pub(crate) fn security_token(html: &str) -> Option<String> {
    regex!(r#"var SECURITYTOKEN = "([^"]+)";"#)
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Collapse every whitespace run into a single space and trim
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized text content of an element
pub(crate) fn text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Non-empty normalized text content
pub(crate) fn non_empty_text(element: ElementRef<'_>) -> Option<String> {
    Some(text(element)).filter(|t| !t.is_empty())
}

/// First integer in a text, ignoring thousands separators: `"1,234 Posts"` → 1234
pub(crate) fn parse_count(text: &str) -> Option<u64> {
    regex!(r"\d[\d,.]*")
        .find(text)?
        .as_str()
        .trim_end_matches(['.', ','])
        .replace([',', '.'], "")
        .parse()
        .ok()
}

/// Signed variant of [`parse_count`]
pub(crate) fn parse_signed(text: &str) -> Option<i64> {
    let captures = regex!(r"(-?)\s*(\d[\d,.]*)").captures(text)?;
    let value = i64::try_from(parse_count(captures.get(2)?.as_str())?).ok()?;
    if captures.get(1).is_some_and(|m| !m.as_str().is_empty()) {
        Some(-value)
    } else {
        Some(value)
    }
}

/// First decimal number in a text: `"0.56"` → 0.56
pub(crate) fn parse_decimal(text: &str) -> Option<f64> {
    regex!(r"\d+(?:\.\d+)?")
        .find(&text.replace(',', ""))?
        .as_str()
        .parse()
        .ok()
}

/// Member referenced by a profile link
pub(crate) fn user_from_link(link: ElementRef<'_>) -> Option<User> {
    let id = urls::user_id_from_link(link.value().attr("href")?)?;
    let name = non_empty_text(link)?;
    Some(User::new(id, name))
}

/// Member referenced by a `window.open('...members/N-name.html')` handler
pub(crate) fn user_from_onclick(element: ElementRef<'_>) -> Option<User> {
    let id = urls::user_id_from_link(element.value().attr("onclick")?)?;
    let name = non_empty_text(element)?;
    Some(User::new(id, name))
}

/// Page count from the page navigator (`Page 2 of 14`); 1 when absent
pub(crate) fn page_count(document: &Html) -> u32 {
    document
        .select(selector!(".pagenav td.vbmenu_control"))
        .filter_map(|cell| {
            let cell_text = text(cell);
            let captures = regex!(r"Page \d+ of (\d+)").captures(&cell_text)?;
            captures.get(1)?.as_str().parse().ok()
        })
        .next()
        .unwrap_or(1)
}

/// Message of a vBulletin error page or form error list, if the page is one
pub(crate) fn error_message(document: &Html) -> Option<String> {
    if let Some(error) = document.select(selector!("div.standard_error")).next() {
        let message = error
            .select(selector!(".blockrow, .panel"))
            .next()
            .map(text)
            .unwrap_or_else(|| text(error));
        return Some(message);
    }

    let errors: Vec<String> = document
        .select(selector!("#posterrors li"))
        .filter_map(non_empty_text)
        .collect();
    if errors.is_empty() {
        None
    } else {
        Some(errors.join("; "))
    }
}

/// Logged-in member shown in the user bar, None for guests
pub(crate) fn logged_in_user(document: &Html) -> Option<User> {
    document
        .select(selector!("#userbaruser a[href*='members/']"))
        .find_map(user_from_link)
}
