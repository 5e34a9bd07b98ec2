//! Output formatting for forum objects

use crate::error::CliError;
use chrono::NaiveDateTime;
use epvp_api::{
    MessageFolderPage, Post, PrivateMessage, Profile, SectionPage, Shout, ThreadPage, Transaction,
    TreasurePage, User,
};
use itertools::Itertools;
use serde::Serialize;

/// Prints results either as text or as JSON
pub struct OutputFormatter {
    json: bool,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }

    /// Print a value; `text` renders it for humans
    pub fn print<T: Serialize + ?Sized>(
        &self,
        value: &T,
        text: impl FnOnce(&T) -> String,
    ) -> Result<(), CliError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text(value));
        }
        Ok(())
    }

    /// Print a status line; silent in quiet and JSON mode
    pub fn status(&self, message: &str) {
        if !self.quiet && !self.json {
            println!("{}", message);
        }
    }
}

fn date(value: Option<NaiveDateTime>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn user(value: Option<&User>) -> String {
    value
        .map(|u| format!("{} (#{})", u.name, u.id))
        .unwrap_or_else(|| "guest".to_string())
}

fn count<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn format_profile(profile: &Profile) -> String {
    let stats = &profile.statistics;
    let mut lines = vec![format!(
        "{} (#{}){}",
        profile.user.name,
        profile.user.id,
        if profile.online { " [online]" } else { "" }
    )];
    if let Some(title) = &profile.title {
        lines.push(format!("  Title: {}", title));
    }
    if !profile.ranks.is_empty() {
        lines.push(format!(
            "  Ranks: {}",
            profile.ranks.iter().map(|r| r.title()).join(", ")
        ));
    }
    lines.push(format!(
        "  Posts: {} ({} per day), thanks: {} given / {} received",
        count(stats.posts),
        count(stats.posts_per_day),
        count(stats.thanks_given),
        count(stats.thanks_received)
    ));
    if let Some(joined) = stats.join_date {
        lines.push(format!("  Joined: {}", joined.format("%Y-%m-%d")));
    }
    if stats.last_activity.is_some() {
        lines.push(format!("  Last activity: {}", date(stats.last_activity)));
    }
    lines.push(format!(
        "  TBM: +{} / ~{} / -{}",
        profile.tbm.positive, profile.tbm.neutral, profile.tbm.negative
    ));
    lines.join("\n")
}

fn format_post(post: &Post) -> String {
    let header = format!(
        "#{} {} at {}{}",
        post.id,
        user(post.author.as_ref()),
        date(post.posted_at),
        post.title
            .as_ref()
            .map(|t| format!(" - {}", t))
            .unwrap_or_default()
    );
    let body = post
        .content
        .plain_text()
        .lines()
        .map(|line| format!("  {}", line))
        .join("\n");
    let thanks = if post.thanks.is_empty() {
        String::new()
    } else {
        format!(
            "\n  Thanked by {}",
            post.thanks.iter().map(|u| u.name.as_str()).join(", ")
        )
    };
    format!("{}\n{}{}", header, body, thanks)
}

pub fn format_thread_pages(pages: &[ThreadPage]) -> String {
    let Some(first) = pages.first() else {
        return String::new();
    };
    let mut out = format!(
        "{}{} (page {}/{})",
        first.title,
        if first.closed { " [closed]" } else { "" },
        first.page,
        first.page_count
    );
    for post in pages.iter().flat_map(|p| &p.posts) {
        out.push_str("\n\n");
        out.push_str(&format_post(post));
    }
    out
}

pub fn format_section_page(page: &SectionPage) -> String {
    let header = format!(
        "{} (page {}/{})",
        page.section.url_name, page.page, page.page_count
    );
    let rows = page.threads.iter().map(|thread| {
        let flags = [
            thread.sticky.then_some("sticky"),
            thread.closed.then_some("closed"),
        ]
        .into_iter()
        .flatten()
        .join(", ");
        format!(
            "{:>9}  {}{}  by {}  ({} replies, {} views)",
            thread.id,
            thread.title,
            if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags)
            },
            user(thread.creator.as_ref()),
            thread.replies,
            thread.views
        )
    });
    std::iter::once(header).chain(rows).join("\n")
}

pub fn format_message_folder(page: &MessageFolderPage) -> String {
    let header = format!("Folder {} (page {}/{})", page.folder.id(), page.page, page.page_count);
    let rows = page.messages.iter().map(|message| {
        let partner = match (&message.sender, message.recipients.first()) {
            (_, Some(recipient)) => format!("to {}", recipient.name),
            (Some(sender), None) => format!("from {}", sender.name),
            (None, None) => String::new(),
        };
        format!(
            "{}{:>10}  {}  {}  {}",
            if message.unread { "*" } else { " " },
            message.id,
            date(message.sent_at),
            partner,
            message.title
        )
    });
    std::iter::once(header).chain(rows).join("\n")
}

pub fn format_message(message: &PrivateMessage) -> String {
    format!(
        "{}\nFrom: {}\nTo: {}\nDate: {}\n\n{}",
        message.title,
        user(message.sender.as_ref()),
        message.recipients.iter().map(|u| u.name.as_str()).join(", "),
        date(message.sent_at),
        message.content.plain_text()
    )
}

pub fn format_shouts(shouts: &[Shout]) -> String {
    shouts
        .iter()
        .map(|shout| {
            format!(
                "[{}] {}: {}",
                date(shout.posted_at),
                shout
                    .author
                    .as_ref()
                    .map(|u| u.name.as_str())
                    .unwrap_or("?"),
                shout.content.plain_text().replace('\n', " ")
            )
        })
        .join("\n")
}

pub fn format_treasures(page: &TreasurePage) -> String {
    let rows = page.treasures.iter().map(|treasure| {
        let partner = treasure
            .buyer
            .as_ref()
            .or(treasure.seller.as_ref())
            .map(|u| u.name.as_str())
            .unwrap_or("-");
        format!(
            "{:>8}  {:>6} e*g  {}  {}  {}",
            treasure.id,
            treasure.cost,
            date(treasure.listed_at),
            partner,
            treasure.title
        )
    });
    std::iter::once(format!("Treasures (page {}/{})", page.page, page.page_count))
        .chain(rows)
        .join("\n")
}

/// Transactions with a running balance from the member's point of view
pub fn format_transactions(transactions: &[Transaction], me: &User) -> String {
    let mut balance: i64 = 0;
    let rows = transactions
        .iter()
        .map(|transaction| {
            let signed = i64::try_from(transaction.amount).unwrap_or(i64::MAX);
            let (sign, other) = if transaction.received_by(me.id) {
                balance = balance.saturating_add(signed);
                ("+", &transaction.sender)
            } else {
                balance = balance.saturating_sub(signed);
                ("-", &transaction.receiver)
            };
            format!(
                "{}  {}{:<6}  {}  {}",
                transaction.created_at.format("%Y-%m-%d %H:%M"),
                sign,
                transaction.amount,
                other.name,
                transaction.note
            )
        })
        .collect::<Vec<_>>();
    rows.into_iter()
        .chain(std::iter::once(format!("Net: {:+} e*g", balance)))
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate};
    use epvp_api::{Content, MessageFolder, Section, SectionThread};

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, 3, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_section_rows() {
        let mut sticky = SectionThread::new(3311, "Rules");
        sticky.sticky = true;
        sticky.closed = true;
        sticky.creator = Some(User::new(1, "admin"));
        sticky.replies = 2;
        sticky.views = 30;
        let page = SectionPage {
            section: Section::new(206, "main"),
            page: 1,
            page_count: 4,
            threads: vec![sticky, SectionThread::new(4000, "Question")],
        };

        let text = format_section_page(&page);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "main (page 1/4)");
        assert_eq!(
            lines[1],
            "     3311  Rules [sticky, closed]  by admin (#1)  (2 replies, 30 views)"
        );
        assert!(lines[2].contains("Question  by guest"));
    }

    #[test]
    fn test_message_folder_rows() {
        let page = MessageFolderPage {
            folder: MessageFolder::Received,
            page: 1,
            page_count: 1,
            messages: vec![PrivateMessage {
                id: 9001,
                sender: Some(User::new(4759, "Mostey")),
                recipients: Vec::new(),
                sent_at: Some(at(14, 17)),
                title: "Trade offer".to_string(),
                content: Content::default(),
                unread: true,
            }],
        };
        assert_eq!(
            format_message_folder(&page),
            "Folder 0 (page 1/1)\n*      9001  2015-03-14 17:00  from Mostey  Trade offer"
        );
    }

    #[test]
    fn test_shout_lines() {
        let shouts = vec![Shout {
            id: 1,
            author: Some(User::new(4759, "Mostey")),
            posted_at: Some(at(14, 9)),
            content: Content::from_bbcode("hi\n[B]all[/B]"),
        }];
        assert_eq!(format_shouts(&shouts), "[2015-03-14 09:00] Mostey: hi all");
    }

    #[test]
    fn test_transaction_balance() {
        let me = User::new(4759, "Mostey");
        let other = User::new(77, "newbie");
        let transactions = vec![
            Transaction {
                id: 1,
                sender: other.clone(),
                receiver: me.clone(),
                amount: 150,
                note: "key".to_string(),
                created_at: DateTime::from_timestamp(1426339200, 0).unwrap(),
            },
            Transaction {
                id: 2,
                sender: me.clone(),
                receiver: other,
                amount: 50,
                note: "refund".to_string(),
                created_at: DateTime::from_timestamp(1426339260, 0).unwrap(),
            },
        ];

        let text = format_transactions(&transactions, &me);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("+150"));
        assert!(lines[1].contains("-50"));
        assert_eq!(lines[2], "Net: +100 e*g");
    }

    #[test]
    fn test_json_and_text_modes() {
        let formatter = OutputFormatter::new(true, false);
        formatter
            .print(&User::new(1, "admin"), |u| u.name.clone())
            .unwrap();
        let formatter = OutputFormatter::new(false, true);
        formatter
            .print(&User::new(1, "admin"), |u| u.name.clone())
            .unwrap();
        formatter.status("not shown");
    }
}
