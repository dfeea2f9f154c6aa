// src/scrape/time.rs

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Fixed hour offset added to every parsed clock time to correct the page's
/// display timezone.
pub const HOUR_OFFSET: i64 = 7;

/// Resolve a row's time label into an absolute timestamp.
///
/// Labels containing "day" (any case, e.g. "All Day") resolve to midnight of
/// the anchor date. "h:mm am"/"h:mm pm" labels resolve to the anchor date at
/// that clock time plus [`HOUR_OFFSET`]. Anything else, including labels that
/// fail to parse, returns `last` unchanged so that continuation rows inherit
/// the previous row's timestamp.
pub fn resolve(day: u32, month: u32, year: i32, label: &str, last: NaiveDateTime) -> NaiveDateTime {
    if label.to_lowercase().contains("day") {
        return match NaiveDate::from_ymd_opt(year, month, day) {
            Some(d) => d.and_hms_opt(0, 0, 0).unwrap_or(last),
            None => last,
        };
    }

    let (hour, minute) = if label.contains("pm") {
        match parse_clock(&label.replace("pm", "")) {
            Some((h, m)) => ((h + 12) % 24, m),
            None => return last,
        }
    } else if label.contains("am") {
        match parse_clock(&label.replace("am", "")) {
            Some(hm) => hm,
            None => return last,
        }
    } else {
        return last;
    };

    match NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(hour, minute, 0)) {
        Some(dt) => dt + Duration::hours(HOUR_OFFSET),
        None => last,
    }
}

fn parse_clock(s: &str) -> Option<(u32, u32)> {
    let (h, m) = s.trim().split_once(':')?;
    Some((h.trim().parse().ok()?, m.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_am_gets_offset() {
        let last = dt(1999, 1, 1, 0, 0);
        assert_eq!(resolve(1, 1, 2020, "8:30am", last), dt(2020, 1, 1, 15, 30));
    }

    #[test]
    fn test_pm_adds_twelve_then_offset() {
        let last = dt(1999, 1, 1, 0, 0);
        assert_eq!(resolve(1, 1, 2020, "2:15pm", last), dt(2020, 1, 1, 21, 15));
    }

    #[test]
    fn test_noon_wraps_to_zero() {
        // 12:00pm -> hour (12 + 12) % 24 = 0, plus the offset.
        let last = dt(1999, 1, 1, 0, 0);
        assert_eq!(resolve(1, 1, 2020, "12:00pm", last), dt(2020, 1, 1, 7, 0));
    }

    #[test]
    fn test_late_pm_rolls_into_next_day() {
        let last = dt(1999, 1, 1, 0, 0);
        assert_eq!(
            resolve(3, 1, 2020, "11:45pm", last),
            dt(2020, 1, 4, 6, 45)
        );
    }

    #[test]
    fn test_all_day_is_midnight_ignoring_last() {
        let last = dt(2020, 1, 1, 18, 0);
        assert_eq!(resolve(1, 1, 2020, "All Day", last), dt(2020, 1, 1, 0, 0));
        assert_eq!(resolve(1, 1, 2020, "all day", last), dt(2020, 1, 1, 0, 0));
    }

    #[test]
    fn test_unrecognized_label_returns_last() {
        let last = dt(2020, 1, 1, 15, 30);
        assert_eq!(resolve(1, 1, 2020, "garbage", last), last);
        assert_eq!(resolve(1, 1, 2020, "", last), last);
    }

    #[test]
    fn test_malformed_clock_returns_last() {
        let last = dt(2020, 1, 1, 15, 30);
        // no separator
        assert_eq!(resolve(1, 1, 2020, "830am", last), last);
        // non-numeric pieces
        assert_eq!(resolve(1, 1, 2020, "x:yam", last), last);
        // out-of-range minute
        assert_eq!(resolve(1, 1, 2020, "8:61am", last), last);
    }
}
