//! The Black Market treasures (`theblackmarket/treasures/...`)

use super::{
    error_message, non_empty_text, page_count, parse_count, parse_datetime, text, user_from_link,
};
use crate::error::{EpvpError, Result};
use crate::model::{Treasure, TreasureListing, TreasurePage};
use chrono::NaiveDate;
use scraper::{ElementRef, Html};

/// Parse one page of the account's treasures
///
/// The member column is the other party of the trade: the buyer of a sold
/// treasure, the seller of a bought one. The account's own side is left
/// empty.
pub(crate) fn parse_treasure_page(
    html: &str,
    listing: TreasureListing,
    page: u32,
    today: NaiveDate,
) -> Result<TreasurePage> {
    let document = Html::parse_document(html);

    let Some(table) = document.select(selector!("table#treasures")).next() else {
        return Err(match error_message(&document) {
            Some(message) => EpvpError::Forum(message),
            None => EpvpError::HtmlParse("table#treasures"),
        });
    };

    let treasures = table
        .select(selector!("tbody tr"))
        .filter(|row| row.select(selector!("td")).next().is_some())
        .filter_map(|row| {
            let treasure = parse_row(row, listing, today);
            if treasure.is_none() {
                log::warn!("skipping unparsable treasure row");
            }
            treasure
        })
        .collect();

    Ok(TreasurePage {
        listing,
        page: page.max(1),
        page_count: pagination(&document),
        treasures,
    })
}

fn parse_row(row: ElementRef<'_>, listing: TreasureListing, today: NaiveDate) -> Option<Treasure> {
    let link = row
        .select(selector!("td:nth-of-type(1) a[href*='treasure/']"))
        .next()?;
    let id = treasure_id(link.value().attr("href")?)?;
    let title = non_empty_text(link)?;

    let cost = row
        .select(selector!("td:nth-of-type(2)"))
        .next()
        .and_then(|cell| parse_count(&text(cell)))
        .unwrap_or_default();

    let partner = row
        .select(selector!("td:nth-of-type(3) a[href*='members/']"))
        .next()
        .and_then(user_from_link);

    let listed_at = row
        .select(selector!("td:nth-of-type(4)"))
        .next()
        .and_then(|cell| parse_datetime(&text(cell), today));

    let (seller, buyer) = match listing {
        TreasureListing::Bought => (partner, None),
        TreasureListing::Listed | TreasureListing::Sold => (None, partner),
    };

    Some(Treasure {
        id,
        title,
        content: None,
        cost,
        seller,
        buyer,
        listed_at,
    })
}

pub(crate) fn parse_treasure(html: &str, id: u64, today: NaiveDate) -> Result<Treasure> {
    let document = Html::parse_document(html);

    let Some(details) = document.select(selector!("table.treasure_details")).next() else {
        return Err(match error_message(&document) {
            Some(message) => EpvpError::Forum(message),
            None => EpvpError::HtmlParse("table.treasure_details"),
        });
    };

    let mut treasure = Treasure {
        id,
        title: String::new(),
        content: None,
        cost: 0,
        seller: None,
        buyer: None,
        listed_at: None,
    };

    for row in details.select(selector!("tr")) {
        let mut cells = row.select(selector!("td, th"));
        let (Some(label), Some(value)) = (cells.next(), cells.next()) else {
            continue;
        };
        let label = text(label).trim_end_matches(':').to_ascii_lowercase();
        let user = || {
            value
                .select(selector!("a[href*='members/']"))
                .next()
                .and_then(user_from_link)
        };

        match label.as_str() {
            "title" => treasure.title = text(value),
            "cost" => treasure.cost = parse_count(&text(value)).unwrap_or_default(),
            "seller" => treasure.seller = user(),
            "buyer" => treasure.buyer = user(),
            "listed" => treasure.listed_at = parse_datetime(&text(value), today),
            other => log::debug!("ignoring treasure detail {:?}", other),
        }
    }

    treasure.content = document
        .select(selector!("div.treasure_content"))
        .next()
        .map(|content| content.text().collect::<String>().trim().to_string())
        .filter(|content| !content.is_empty());

    Ok(treasure)
}

fn treasure_id(link: &str) -> Option<u64> {
    regex!(r"treasure/(\d+)")
        .captures(link)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// The market pages have their own paginator; forum style navigators are
/// still honoured
fn pagination(document: &Html) -> u32 {
    document
        .select(selector!(".pagination a, .pagination span"))
        .filter_map(|item| text(item).parse::<u32>().ok())
        .max()
        .unwrap_or_else(|| page_count(document))
}
