//! Forum date formats
//!
//! Dates are shown in the forum's time zone as `MM-DD-YYYY, HH:MM`, or
//! relative to the current day (`Today, 17:43`). Shoutbox rows of the current
//! day only carry the time.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Parse a date with time; relative days resolve against `today`
pub(crate) fn parse_datetime(text: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    let text = super::normalize_whitespace(text);
    let captures = regex!(
        r"(?i)^(?:(today|yesterday)|(\d{1,2})[-/](\d{1,2})[-/](\d{4}))?,?\s*(\d{1,2}):(\d{2})(?:\s*(am|pm))?$"
    )
    .captures(&text)?;

    let date = match (captures.get(1), captures.get(4)) {
        (Some(relative), _) if relative.as_str().eq_ignore_ascii_case("yesterday") => {
            today.checked_sub_days(Days::new(1))?
        }
        (Some(_), _) => today,
        (None, Some(year)) => NaiveDate::from_ymd_opt(
            year.as_str().parse().ok()?,
            captures.get(2)?.as_str().parse().ok()?,
            captures.get(3)?.as_str().parse().ok()?,
        )?,
        (None, None) => today,
    };

    let mut hour: u32 = captures.get(5)?.as_str().parse().ok()?;
    let minute: u32 = captures.get(6)?.as_str().parse().ok()?;
    if let Some(meridiem) = captures.get(7) {
        if hour == 0 || hour > 12 {
            return None;
        }
        hour %= 12;
        if meridiem.as_str().eq_ignore_ascii_case("pm") {
            hour += 12;
        }
    }

    Some(date.and_time(NaiveTime::from_hms_opt(hour, minute, 0)?))
}

/// Parse a date without time, e.g. a join date
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    let captures = regex!(r"(\d{1,2})[-/](\d{1,2})[-/](\d{4})").captures(text)?;
    NaiveDate::from_ymd_opt(
        captures.get(3)?.as_str().parse().ok()?,
        captures.get(1)?.as_str().parse().ok()?,
        captures.get(2)?.as_str().parse().ok()?,
    )
}
