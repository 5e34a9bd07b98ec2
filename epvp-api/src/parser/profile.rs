//! Member profile page (`forum/members/{id}-{name}.html`)

use super::{
    error_message, non_empty_text, parse_count, parse_date, parse_datetime, parse_decimal,
    parse_signed, text, user_from_link,
};
use crate::error::{EpvpError, Result};
use crate::model::{AboutMe, Profile, ProfileStatistics, Rank, TbmRating, User};
use chrono::NaiveDate;
use scraper::{ElementRef, Html};

pub(crate) fn parse_profile(html: &str, user_id: u64, today: NaiveDate) -> Result<Profile> {
    let document = Html::parse_document(html);

    let Some(heading) = document.select(selector!("#username_box h1")).next() else {
        return Err(match error_message(&document) {
            Some(message) => EpvpError::Forum(message),
            None => EpvpError::HtmlParse("#username_box h1"),
        });
    };
    let name = non_empty_text(heading).ok_or(EpvpError::HtmlParse("profile name"))?;

    let namecolor = heading
        .select(selector!("span[style]"))
        .find_map(|span| {
            let style = span.value().attr("style")?;
            let captures = regex!(r"(?i)(?:^|;)\s*color\s*:\s*([^;]+)").captures(style)?;
            Some(captures.get(1)?.as_str().trim().to_string())
        });

    let title = document
        .select(selector!("#username_box h2"))
        .next()
        .and_then(non_empty_text);

    let online = document
        .select(selector!("#username_box img[src*='user_online']"))
        .next()
        .is_some();

    let avatar_url = document
        .select(selector!("img#user_avatar"))
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string);

    let ranks = document
        .select(selector!("#rank img[title]"))
        .filter_map(|img| img.value().attr("title"))
        .filter(|title| !title.trim().is_empty())
        .map(Rank::from_title)
        .collect();

    let mut friends: Vec<User> = Vec::new();
    for friend in document
        .select(selector!("#friends_list a[href*='members/']"))
        .filter_map(user_from_link)
    {
        if !friends.iter().any(|f| f.id == friend.id) {
            friends.push(friend);
        }
    }

    Ok(Profile {
        user: User::new(user_id, name),
        title,
        namecolor,
        avatar_url,
        online,
        ranks,
        statistics: statistics(&document, today),
        about: about_me(&document),
        tbm: tbm_rating(&document),
        friends,
    })
}

fn statistics(document: &Html, today: NaiveDate) -> ProfileStatistics {
    let mut stats = ProfileStatistics::default();

    for item in document.select(selector!("#collapseobj_stats li")) {
        let Some(label) = item.select(selector!("span.shade")).next().map(text) else {
            continue;
        };
        let full = text(item);
        let value = full.strip_prefix(label.as_str()).unwrap_or(&full).trim();
        let label = label.trim_end_matches(':').trim().to_ascii_lowercase();

        match label.as_str() {
            "total posts" => stats.posts = parse_count(value),
            "posts per day" => stats.posts_per_day = parse_decimal(value),
            "thanks given" => stats.thanks_given = parse_count(value),
            "thanks received" => stats.thanks_received = parse_count(value),
            "recommendations" => stats.recommendations = parse_count(value),
            "elite*gold" => stats.elite_gold = parse_signed(value),
            "join date" => stats.join_date = parse_date(value),
            "last activity" => stats.last_activity = parse_datetime(value, today),
            other => log::debug!("ignoring profile statistic {:?}", other),
        }
    }

    stats
}

fn about_me(document: &Html) -> AboutMe {
    let mut about = AboutMe::default();

    for list in document.select(selector!("#collapseobj_aboutme dl")) {
        let mut label: Option<String> = None;
        for child in list.child_elements() {
            match child.value().name() {
                "dt" => label = Some(text(child).trim_end_matches(':').to_ascii_lowercase()),
                "dd" => {
                    let value = non_empty_text(child);
                    match label.take().as_deref() {
                        Some("biography") => about.biography = value,
                        Some("location") => about.location = value,
                        Some("interests") => about.interests = value,
                        Some("occupation") => about.occupation = value,
                        _ => {}
                    }
                }
                _ => {}
            }
        }
    }

    about
}

fn tbm_rating(document: &Html) -> TbmRating {
    let count = |cell: Option<ElementRef<'_>>| {
        cell.and_then(|c| parse_count(&text(c)))
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or_default()
    };
    TbmRating {
        positive: count(document.select(selector!("#tbm_ratings .positive")).next()),
        neutral: count(document.select(selector!("#tbm_ratings .neutral")).next()),
        negative: count(document.select(selector!("#tbm_ratings .negative")).next()),
    }
}
