//! Date helper functions
//!
//! Display dates are always Brazilian Portuguese, matching the site's copy.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, TimeZone, Timelike, Utc};

/// Abbreviated month names, `pt-BR`
const MONTHS_PT_BR: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Parse an API timestamp
///
/// Accepts RFC 3339 as well as the colon-less offset the API emits
/// (`2021-03-25T19:25:28+0000`).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Abbreviated `pt-BR` month name for a 1-based month
pub fn month_abbrev(month: u32) -> &'static str {
    MONTHS_PT_BR[((month.clamp(1, 12)) - 1) as usize]
}

/// Format as `dd MMM yyyy`, e.g. `15 mar 2021`
pub fn format_post_date<Tz: TimeZone>(date: &DateTime<Utc>, tz: &Tz) -> String {
    let local = date.with_timezone(tz);
    format!(
        "{:02} {} {}",
        local.day(),
        month_abbrev(local.month()),
        local.year()
    )
}

/// Format the edit note, e.g. `* editado em 19 mar 2021, às 15:9`
///
/// Hours and minutes are not zero padded.
pub fn format_edited_note<Tz: TimeZone>(date: &DateTime<Utc>, tz: &Tz) -> String {
    let local = date.with_timezone(tz);
    format!(
        "* editado em {}, às {}:{}",
        format_post_date(date, tz),
        local.hour(),
        local.minute()
    )
}

/// Format in ISO 8601 for `datetime` attributes
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.with_timezone(tz)
        .format("%Y-%m-%dT%H:%M:%S%:z")
        .to_string()
}
