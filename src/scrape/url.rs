// src/scrape/url.rs

pub const CALENDAR_HOST: &str = "https://www.forexfactory.com";

/// Three-letter month abbreviations, January first.
pub static MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Month number (1..=12) to its three-letter abbreviation.
/// Out-of-range month numbers fall back to "Jan".
pub fn month_abbrev(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_ABBREV.get(i as usize))
        .copied()
        .unwrap_or("Jan")
}

/// Inverse lookup: "Jan" -> 1 through "Dec" -> 12. Exact-case match only.
pub fn month_number(abbrev: &str) -> Option<u32> {
    MONTH_ABBREV
        .iter()
        .position(|&m| m == abbrev)
        .map(|i| i as u32 + 1)
}

/// Build the calendar query URL for one day, e.g.
/// `https://www.forexfactory.com/calendar?day=Jan3.2020`.
/// The day is not zero-padded.
pub fn build_url(day: u32, month: u32, year: i32, timeline: &str) -> String {
    format!(
        "{}/calendar?{}={}{}.{}",
        CALENDAR_HOST,
        timeline,
        month_abbrev(month),
        day,
        year
    )
}
