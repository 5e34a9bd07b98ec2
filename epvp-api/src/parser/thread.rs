//! Thread pages (`forum/showthread.php?t={id}&page={n}`)
//!
//! Private messages use the same post table layout, so [`parse_posts`] is
//! shared with the message parser.

use super::{error_message, non_empty_text, page_count, parse_datetime, user_from_link};
use crate::content::Content;
use crate::error::{EpvpError, Result};
use crate::model::{Post, ThreadPage, User};
use crate::urls;
use chrono::NaiveDate;
use scraper::{ElementRef, Html};

pub(crate) fn parse_thread_page(
    html: &str,
    thread_id: u64,
    page: u32,
    today: NaiveDate,
) -> Result<ThreadPage> {
    let document = Html::parse_document(html);

    let Some(title) = document
        .select(selector!("td.navbar strong"))
        .next()
        .and_then(non_empty_text)
    else {
        return Err(match error_message(&document) {
            Some(message) => EpvpError::Forum(message),
            None => EpvpError::HtmlParse("td.navbar strong"),
        });
    };

    let section = document
        .select(selector!("span.navbar a[href]"))
        .filter_map(|a| a.value().attr("href"))
        .filter_map(urls::section_from_link)
        .last();

    let closed = document
        .select(selector!("img[alt='Closed Thread']"))
        .next()
        .is_some();

    Ok(ThreadPage {
        thread_id,
        title,
        section,
        closed,
        page: page.max(1),
        page_count: page_count(&document),
        posts: parse_posts(&document, today),
    })
}

/// All posts laid out as `table#post{id}` on a page
pub(crate) fn parse_posts(document: &Html, today: NaiveDate) -> Vec<Post> {
    document
        .select(selector!("table[id^='post']"))
        .filter_map(|table| {
            let post = parse_post(table, today);
            if post.is_none() {
                log::warn!(
                    "skipping unparsable post table {:?}",
                    table.value().attr("id")
                );
            }
            post
        })
        .collect()
}

fn parse_post(table: ElementRef<'_>, today: NaiveDate) -> Option<Post> {
    let id: u64 = table.value().attr("id")?.strip_prefix("post")?.parse().ok()?;

    let body = table.select(selector!("div[id^='post_message_']")).next()?;

    let posted_at = table
        .select(selector!("td.thead"))
        .next()
        .and_then(|head| {
            head.text()
                .map(super::normalize_whitespace)
                .find_map(|chunk| parse_datetime(&chunk, today))
        });

    let author = table
        .select(selector!("a.bigusername"))
        .next()
        .and_then(user_from_link);

    let author_title = table
        .select(selector!("td.alt2 > div.smallfont"))
        .find_map(non_empty_text);

    let title = table
        .select(selector!("td[id^='td_post_'] > div.smallfont > strong"))
        .next()
        .and_then(non_empty_text);

    let thanks = thanks(table);

    Some(Post {
        id,
        author,
        author_title,
        posted_at,
        title,
        content: Content::from_html(body),
        thanks,
    })
}

fn thanks(table: ElementRef<'_>) -> Vec<User> {
    let mut users: Vec<User> = Vec::new();
    for user in table
        .select(selector!("div[id^='post_thanks_box_'] a[href*='members/']"))
        .filter_map(user_from_link)
    {
        if !users.iter().any(|u| u.id == user.id) {
            users.push(user);
        }
    }
    users
}
