//! Loose résumé date parsing and experience-duration arithmetic.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::round_to;
use crate::models::lenient::is_present_marker;
use crate::models::resume::Experience;

static ISO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})(?:-(\d{1,2}))?\b").expect("valid regex"));
static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})[/.-](\d{1,2})[/.-](\d{4})\b").expect("valid regex")
});
static MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[/.-](\d{4})\b").expect("valid regex"));
static NAMED_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([a-z]{3,9})\.?,?\s*(\d{4})\b").expect("valid regex"));
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").expect("valid regex"));

const MONTH_NAMES: &[(&str, u32)] = &[
    ("jan", 1),
    ("january", 1),
    ("feb", 2),
    ("february", 2),
    ("mar", 3),
    ("march", 3),
    ("apr", 4),
    ("april", 4),
    ("may", 5),
    ("jun", 6),
    ("june", 6),
    ("jul", 7),
    ("july", 7),
    ("aug", 8),
    ("august", 8),
    ("sep", 9),
    ("sept", 9),
    ("september", 9),
    ("oct", 10),
    ("october", 10),
    ("nov", 11),
    ("november", 11),
    ("dec", 12),
    ("december", 12),
];

fn month_from_name(word: &str) -> Option<u32> {
    let word = word.to_lowercase();
    MONTH_NAMES
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, month)| *month)
}

fn build_date(year: &str, month: u32, day: u32) -> Option<NaiveDate> {
    let year: i32 = year.parse().ok()?;
    if !(1900..=2100).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day).or_else(|| NaiveDate::from_ymd_opt(year, month, 1))
}

/// Parses the date formats résumés commonly use. Missing month → January,
/// missing day → the 1st. "Present"-style markers are not dates.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() || is_present_marker(raw) {
        return None;
    }

    if let Some(c) = ISO.captures(raw) {
        let month = c[2].parse().ok()?;
        let day = c.get(3).and_then(|d| d.as_str().parse().ok()).unwrap_or(1);
        return build_date(&c[1], month, day);
    }
    if let Some(c) = MONTH_DAY_YEAR.captures(raw) {
        let month = c[1].parse().ok()?;
        let day = c[2].parse().ok()?;
        return build_date(&c[3], month, day);
    }
    if let Some(c) = MONTH_YEAR.captures(raw) {
        let month = c[1].parse().ok()?;
        return build_date(&c[2], month, 1);
    }
    for c in NAMED_MONTH_YEAR.captures_iter(raw) {
        if let Some(month) = month_from_name(&c[1]) {
            return build_date(&c[2], month, 1);
        }
    }
    YEAR.captures(raw).and_then(|c| build_date(&c[1], 1, 1))
}

fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let years = (end.year() - start.year()) as i64;
    let months = end.month() as i64 - start.month() as i64;
    years * 12 + months
}

/// Total professional experience in years, rounded to one decimal.
///
/// Entries without a parseable start, or with an end that is neither a
/// present marker nor parseable, are skipped. Negative spans count as zero.
pub fn calculate_experience_years(experience: &[Experience], as_of: NaiveDate) -> f64 {
    let total_months: i64 = experience
        .iter()
        .filter_map(|exp| {
            let start = parse_date(exp.start_date.as_deref()?)?;
            let end = if exp.is_current() {
                as_of
            } else {
                parse_date(exp.end_date.as_deref()?)?
            };
            Some(months_between(start, end).max(0))
        })
        .sum();

    round_to(total_months as f64 / 12.0, 1)
}
