//! Section thread listings (`forum/{section}/index{page}.html`)

use super::{error_message, non_empty_text, page_count, parse_count, user_from_onclick};
use crate::error::{EpvpError, Result};
use crate::model::{Section, SectionPage, SectionThread, ThreadRating};
use scraper::{ElementRef, Html};

pub(crate) fn parse_section_page(html: &str, section: &Section, page: u32) -> Result<SectionPage> {
    let document = Html::parse_document(html);

    let rows: Vec<ElementRef<'_>> = document
        .select(selector!("tbody[id^='threadbits_forum_'] > tr"))
        .collect();
    if rows.is_empty()
        && let Some(message) = error_message(&document)
    {
        return Err(EpvpError::Forum(message));
    }

    let section = Section::new(
        section_id(&document).unwrap_or(section.id),
        section.url_name.clone(),
    );

    let threads = rows
        .into_iter()
        .filter_map(|row| {
            let thread = parse_row(row, &section);
            if thread.is_none() {
                log::warn!("skipping unparsable thread row in section {}", section.url_name);
            }
            thread
        })
        .collect();

    Ok(SectionPage {
        section,
        page: page.max(1),
        page_count: page_count(&document),
        threads,
    })
}

fn section_id(document: &Html) -> Option<u64> {
    if let Some(id) = document
        .select(selector!("input[name='f']"))
        .find_map(|input| input.value().attr("value")?.parse().ok())
    {
        return Some(id);
    }
    if let Some(id) = document
        .select(selector!("a[href*='newthread.php']"))
        .filter_map(|a| a.value().attr("href"))
        .find_map(|href| regex!(r"[?&;]f=(\d+)").captures(href)?.get(1)?.as_str().parse().ok())
    {
        return Some(id);
    }
    document
        .select(selector!("tbody[id^='threadbits_forum_']"))
        .find_map(|body| {
            body.value()
                .attr("id")?
                .strip_prefix("threadbits_forum_")?
                .parse()
                .ok()
        })
}

fn parse_row(row: ElementRef<'_>, section: &Section) -> Option<SectionThread> {
    let title_link = row.select(selector!("a[id^='thread_title_']")).next()?;
    let id: u64 = title_link
        .value()
        .attr("id")?
        .strip_prefix("thread_title_")?
        .parse()
        .ok()?;
    let title = non_empty_text(title_link)?;

    let mut thread = SectionThread::new(id, title);
    thread.section = Some(section.clone());

    thread.creator = row
        .select(selector!("td[id^='td_threadtitle_'] .smallfont span[onclick]"))
        .find_map(user_from_onclick);

    thread.sticky = row
        .select(selector!("img[alt='Sticky Thread']"))
        .next()
        .is_some();

    thread.closed = row
        .select(selector!("td[id^='td_threadstatusicon_'] img[src]"))
        .filter_map(|img| img.value().attr("src"))
        .any(|src| src.contains("lock") || src.contains("closed"));

    if let Some(counts) = row
        .select(selector!("td[title^='Replies']"))
        .find_map(|cell| cell.value().attr("title"))
        .and_then(|title| regex!(r"Replies: ([\d,.]+), Views: ([\d,.]+)").captures(title))
    {
        thread.replies = counts
            .get(1)
            .and_then(|m| parse_count(m.as_str()))
            .unwrap_or_default();
        thread.views = counts
            .get(2)
            .and_then(|m| parse_count(m.as_str()))
            .unwrap_or_default();
    }

    thread.rating = row
        .select(selector!("img[alt^='Thread Rating']"))
        .find_map(|img| img.value().attr("alt"))
        .and_then(parse_rating);

    Some(thread)
}

fn parse_rating(alt: &str) -> Option<ThreadRating> {
    let captures = regex!(r"([\d,]+) votes?, ([\d.]+) average").captures(alt)?;
    Some(ThreadRating {
        votes: u32::try_from(parse_count(captures.get(1)?.as_str())?).ok()?,
        average: captures.get(2)?.as_str().parse().ok()?,
    })
}
