use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use super::window_after;

static LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:due|last|closing|submission)\s+date\b").expect("due date label pattern")
});

/// DD/MM/YYYY (also `-` and `.`), "DD Month YYYY", "DD-Mon-YYYY" (also
/// `/`), "Month DD, YYYY".
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?P<nd>\d{1,2})[/.\-](?P<nm>\d{1,2})[/.\-](?P<ny>\d{4}|\d{2})\b",
        r"|\b(?P<dd>\d{1,2})(?:st|nd|rd|th)?(?:\s+(?:of\s+)?|[/\-])(?P<dm>[a-z]{3,})\.?,?(?:\s+|[/\-])(?P<dy>\d{4})\b",
        r"|\b(?P<mm>[a-z]{3,})\.?\s+(?P<md>\d{1,2})(?:st|nd|rd|th)?,?\s+(?P<my>\d{4})\b",
    ))
    .expect("date pattern")
});

/// Find the due date: the first date token within `window` characters after
/// a "due date" / "last date" / "closing date" / "submission date" label.
///
/// The first label whose window holds a date token decides the result. A
/// token that is not a real calendar date ("31st Febraury 2024") yields
/// `None`; no later label is consulted.
pub fn detect_due_date(text: &str, window: usize) -> Option<NaiveDate> {
    let caps = LABEL
        .find_iter(text)
        .find_map(|label| DATE.captures(window_after(text, label.end(), window)))?;
    parse_date(&caps)
}

fn parse_date(caps: &Captures<'_>) -> Option<NaiveDate> {
    let (day, month, year) = if let Some(d) = caps.name("nd") {
        (d.as_str(), caps["nm"].parse::<u32>().ok()?, &caps["ny"])
    } else if let Some(d) = caps.name("dd") {
        (d.as_str(), month_from_name(&caps["dm"])?, &caps["dy"])
    } else {
        (&caps["md"], month_from_name(&caps["mm"])?, &caps["my"])
    };

    let day: u32 = day.parse().ok()?;
    let mut year: i32 = year.parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}
