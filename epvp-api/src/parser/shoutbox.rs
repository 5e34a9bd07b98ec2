//! Chatbox rows, from the AJAX refresh response and the archive pages

use super::{error_message, parse_datetime, text, user_from_link};
use crate::content::Content;
use crate::error::{EpvpError, Result};
use crate::model::Shout;
use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use std::borrow::Cow;

/// Shouts in the order the page lists them, newest first
pub(crate) fn parse_shouts(html: &str, today: NaiveDate) -> Result<Vec<Shout>> {
    // the refresh response is a bare run of rows, which the parser drops
    // outside of a table
    let html = if html.contains("<table") {
        Cow::Borrowed(html)
    } else {
        Cow::Owned(format!("<table>{html}</table>"))
    };
    let document = Html::parse_document(&html);

    let rows: Vec<ElementRef<'_>> = document.select(selector!("tr[id^='chat_']")).collect();
    if rows.is_empty()
        && let Some(message) = error_message(&document)
    {
        return Err(EpvpError::Forum(message));
    }

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let shout = parse_row(row, today);
            if shout.is_none() {
                log::warn!("skipping unparsable chat row {:?}", row.value().attr("id"));
            }
            shout
        })
        .collect())
}

fn parse_row(row: ElementRef<'_>, today: NaiveDate) -> Option<Shout> {
    let id = row.value().attr("id")?.strip_prefix("chat_")?.parse().ok()?;

    let posted_at = row
        .select(selector!("td:nth-of-type(1)"))
        .next()
        .and_then(|cell| {
            let stamp = text(cell);
            parse_datetime(stamp.trim_matches(['[', ']', ' ']), today)
        });

    let author = row
        .select(selector!("td:nth-of-type(2) a[href*='members/']"))
        .next()
        .and_then(user_from_link);

    let content = row
        .select(selector!("td:nth-of-type(3)"))
        .next()
        .map(Content::from_html)?;

    Some(Shout {
        id,
        author,
        posted_at,
        content,
    })
}
