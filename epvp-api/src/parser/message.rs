//! Private message folders (`private.php?folderid=`) and single messages
//! (`private.php?do=showpm&pmid=`)

use super::{
    error_message, non_empty_text, page_count, parse_datetime, parse_posts, text,
    user_from_link, user_from_onclick,
};
use crate::content::Content;
use crate::error::{EpvpError, Result};
use crate::model::{MessageFolder, MessageFolderPage, PrivateMessage, User};
use chrono::{NaiveDate, NaiveDateTime};
use scraper::{ElementRef, Html};

/// Parse one page of a folder
///
/// The member shown next to each message is the other party: the sender in
/// received folders, the recipient in the sent folder. Messages listed in the
/// sent folder have no `sender`; the caller knows who it is.
pub(crate) fn parse_message_folder(
    html: &str,
    folder: MessageFolder,
    page: u32,
    today: NaiveDate,
) -> Result<MessageFolderPage> {
    let document = Html::parse_document(html);

    // each message row carries a `pm[{id}]` checkbox for the folder actions
    let rows: Vec<ElementRef<'_>> = document
        .select(selector!("input[name^='pm[']"))
        .filter_map(|checkbox| {
            checkbox
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name() == "tr")
        })
        .collect();
    if rows.is_empty()
        && let Some(message) = error_message(&document)
    {
        return Err(EpvpError::Forum(message));
    }

    let messages = rows
        .into_iter()
        .filter_map(|row| {
            let message = parse_row(row, folder, today);
            if message.is_none() {
                log::warn!("skipping unparsable message row in folder {}", folder.id());
            }
            message
        })
        .collect();

    Ok(MessageFolderPage {
        folder,
        page: page.max(1),
        page_count: page_count(&document),
        messages,
    })
}

fn parse_row(row: ElementRef<'_>, folder: MessageFolder, today: NaiveDate) -> Option<PrivateMessage> {
    let link = row.select(selector!("a[href*='do=showpm']")).next()?;
    let id = regex!(r"pmid=(\d+)")
        .captures(link.value().attr("href")?)?
        .get(1)?
        .as_str()
        .parse()
        .ok()?;
    let title = text(link);

    let unread = link.select(selector!("strong")).next().is_some()
        || row.select(selector!("img[src*='pm_new']")).next().is_some();

    let partner = row
        .select(selector!("span[onclick*='members/']"))
        .find_map(user_from_onclick);

    let sent_at = row
        .select(selector!(".time"))
        .next()
        .and_then(|time| listing_date(time, today));

    let (sender, recipients) = match folder {
        MessageFolder::Sent => (None, partner.into_iter().collect()),
        _ => (partner, Vec::new()),
    };

    Some(PrivateMessage {
        id,
        sender,
        recipients,
        sent_at,
        title,
        content: Content::default(),
        unread,
    })
}

/// The day of older messages precedes `.time` inside the same `.smallfont`
fn listing_date(time: ElementRef<'_>, today: NaiveDate) -> Option<NaiveDateTime> {
    time.parent()
        .and_then(ElementRef::wrap)
        .filter(|parent| parent.value().classes().any(|class| class == "smallfont"))
        .and_then(|stamp| parse_datetime(&text(stamp), today))
        .or_else(|| parse_datetime(&text(time), today))
}

pub(crate) fn parse_message(html: &str, id: u64, today: NaiveDate) -> Result<PrivateMessage> {
    let document = Html::parse_document(html);

    let Some(post) = parse_posts(&document, today).into_iter().next() else {
        return Err(match error_message(&document) {
            Some(message) => EpvpError::Forum(message),
            None => EpvpError::HtmlParse("private message post table"),
        });
    };

    let mut recipients: Vec<User> = Vec::new();
    for user in document
        .select(selector!("fieldset.recipients a[href*='members/']"))
        .filter_map(user_from_link)
    {
        if !recipients.iter().any(|r| r.id == user.id) {
            recipients.push(user);
        }
    }

    let title = post
        .title
        .or_else(|| {
            document
                .select(selector!("td.navbar strong"))
                .next()
                .and_then(non_empty_text)
        })
        .unwrap_or_default();

    Ok(PrivateMessage {
        id,
        sender: post.author,
        recipients,
        sent_at: post.posted_at,
        title,
        content: post.content,
        unread: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOLDER: &str = r#"
<html><body>
<div class="pagenav"><table><tr><td class="vbmenu_control">Page 1 of 4</td></tr></table></div>
<form action="private.php?do=managepm&amp;folderid=0" method="post">
<table class="tborder">
<tbody id="collapseobj_pmf0_today">
<tr>
  <td class="alt1Active" id="m9001"><img src="images/statusicon/pm_new.gif" alt="Unread Message" /></td>
  <td class="alt1Active">
    <div><span style="float:right" class="time">Today, 17:43</span>
      <a href="private.php?do=showpm&amp;pmid=9001" rel="nofollow"><strong>Trade offer</strong></a></div>
    <div class="smallfont"><span style="cursor:pointer" onclick="window.open('https://www.elitepvpers.com/forum/members/4759-mostey.html', '_self')">Mostey</span></div>
  </td>
  <td class="alt1"><input type="checkbox" name="pm[9001]" value="0_today" /></td>
</tr>
<tr>
  <td class="alt1" id="m8000"><img src="images/statusicon/pm_old.gif" alt="Old Message" /></td>
  <td class="alt1">
    <div><span class="smallfont" style="float:right">02-11-2015 <span class="time">09:12</span></span>
      <a href="private.php?do=showpm&amp;pmid=8000" rel="nofollow">Re: Question</a></div>
    <div class="smallfont"><span onclick="window.open('https://www.elitepvpers.com/forum/members/1-admin.html', '_self')">admin</span></div>
  </td>
  <td class="alt1"><input type="checkbox" name="pm[8000]" value="0_older" /></td>
</tr>
</tbody>
</table>
</form>
</body></html>"#;

    const MESSAGE: &str = r#"
<html><body>
<table><tr><td class="navbar"><strong>Trade offer</strong></td></tr></table>
<table id="post9001" class="tborder">
<tr><td class="thead"><div class="normal">03-13-2015, 17:43</div></td></tr>
<tr>
  <td class="alt2"><a class="bigusername" href="https://www.elitepvpers.com/forum/members/4759-mostey.html">Mostey</a></td>
  <td class="alt1" id="td_post_9001">
    <div id="post_message_9001">Want to buy <b>your</b> account?</div>
    <fieldset class="recipients"><legend>Recipients</legend>
      <a href="https://www.elitepvpers.com/forum/members/77-newbie.html">newbie</a>;
      <a href="https://www.elitepvpers.com/forum/members/2-friend.html">friend</a>
    </fieldset>
  </td>
</tr>
</table>
</body></html>"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 3, 14).unwrap()
    }

    #[test]
    fn test_received_folder() {
        let page = parse_message_folder(FOLDER, MessageFolder::Received, 1, today()).unwrap();

        assert_eq!(page.folder, MessageFolder::Received);
        assert_eq!(page.page_count, 4);
        assert_eq!(page.messages.len(), 2);

        let unread = &page.messages[0];
        assert_eq!(unread.id, 9001);
        assert_eq!(unread.title, "Trade offer");
        assert!(unread.unread);
        assert_eq!(unread.sender, Some(User::new(4759, "Mostey")));
        assert!(unread.recipients.is_empty());
        assert_eq!(
            unread.sent_at,
            NaiveDate::from_ymd_opt(2015, 3, 14).unwrap().and_hms_opt(17, 43, 0)
        );
        assert!(unread.content.is_empty());

        let read = &page.messages[1];
        assert_eq!(read.id, 8000);
        assert_eq!(read.title, "Re: Question");
        assert!(!read.unread);
        assert_eq!(
            read.sent_at,
            NaiveDate::from_ymd_opt(2015, 2, 11).unwrap().and_hms_opt(9, 12, 0)
        );
    }

    #[test]
    fn test_day_before_time() {
        let html = r#"<table><tr><td>
<div><span class="smallfont" style="float:right">03-13-2015 <span class="time">17:43</span></span>
  <a href="private.php?do=showpm&amp;pmid=9100">Yesterday's offer</a></div>
<input type="checkbox" name="pm[9100]" value="0_yesterday" />
</td></tr></table>"#;
        let page = parse_message_folder(html, MessageFolder::Received, 1, today()).unwrap();

        assert_eq!(
            page.messages[0].sent_at,
            NaiveDate::from_ymd_opt(2015, 3, 13).unwrap().and_hms_opt(17, 43, 0)
        );
    }

    #[test]
    fn test_sent_folder_lists_recipients() {
        let page = parse_message_folder(FOLDER, MessageFolder::Sent, 1, today()).unwrap();
        let message = &page.messages[0];
        assert_eq!(message.sender, None);
        assert_eq!(message.recipients, vec![User::new(4759, "Mostey")]);
    }

    #[test]
    fn test_single_message() {
        let message = parse_message(MESSAGE, 9001, today()).unwrap();

        assert_eq!(message.id, 9001);
        assert_eq!(message.title, "Trade offer");
        assert_eq!(message.sender, Some(User::new(4759, "Mostey")));
        assert_eq!(
            message.recipients,
            vec![User::new(77, "newbie"), User::new(2, "friend")]
        );
        assert_eq!(
            message.sent_at,
            NaiveDate::from_ymd_opt(2015, 3, 13).unwrap().and_hms_opt(17, 43, 0)
        );
        assert_eq!(message.content.plain_text(), "Want to buy your account?");
        assert!(!message.unread);
    }

    #[test]
    fn test_invalid_message() {
        let html = r#"<div class="standard_error"><div class="blockrow">Invalid Message specified.</div></div>"#;
        assert!(matches!(
            parse_message(html, 1, today()),
            Err(EpvpError::Forum(_))
        ));
    }
}
