// src/scrape/extract.rs

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::time;
use super::url::month_number;
use super::ScrapeError;

static CALENDAR_TABLE: Lazy<Selector> = Lazy::new(|| selector("table.calendar__table"));
static TIME_CELL: Lazy<Selector> = Lazy::new(|| selector("td.calendar__time"));
static NEW_DAY_ROW: Lazy<Selector> = Lazy::new(|| selector("tr.calendar__row--new-day"));
static DATE_LABEL: Lazy<Selector> = Lazy::new(|| selector("span.date"));
static SPAN: Lazy<Selector> = Lazy::new(|| selector("span"));

/// `<weekday> <month> <day>`, e.g. "Fri Jan 03".
static ANCHOR_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-zA-Z]{3}) ([a-zA-Z]{3}) ([0-9]{1,2})").unwrap());

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("CSS selector should be valid")
}

/// Placeholder for missing or too-short field text.
pub const UNKNOWN: &str = "unknown";

const TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// One scheduled event scraped from the calendar table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CalendarEvent {
    pub time: String,
    pub currency: String,
    pub event: String,
    pub forecast: String,
    pub actual: String,
    pub previous: String,
}

/// Extract all event records from a calendar page.
///
/// The page only carries month and day in its date labels, so the year comes
/// from the caller. Rows without a currency are dropped; a malformed row is
/// skipped with a warning rather than failing the whole page.
#[instrument(level = "debug", skip(html))]
pub fn extract(html: &str, anchor_year: i32) -> Result<Vec<CalendarEvent>, ScrapeError> {
    let doc = Html::parse_document(html);

    let table = doc
        .select(&CALENDAR_TABLE)
        .next()
        .ok_or_else(|| ScrapeError::Parse("table not found".to_string()))?;

    let time_cells: Vec<ElementRef> = table.select(&TIME_CELL).collect();
    if time_cells.is_empty() {
        debug!("calendar table has no time cells");
        return Ok(Vec::new());
    }

    let (anchor_day, anchor_month) = anchor_date(table)?;
    debug!(anchor_day, anchor_month, anchor_year, "resolved anchor date");

    let mut records = Vec::with_capacity(time_cells.len());
    // Fallback start value in case the very first label fails to parse.
    let mut last = Local::now().naive_local();

    for cell in time_cells {
        let label = cell_text(cell);
        last = time::resolve(anchor_day, anchor_month, anchor_year, label.trim(), last);

        let currency_cell = match sibling_cell(cell, "calendar__currency") {
            Some(c) => c,
            None => {
                warn!(label = %label.trim(), "time cell without currency sibling; row skipped");
                continue;
            }
        };
        let currency = squash_whitespace(&cell_text(currency_cell));
        if currency.is_empty() {
            // Day-break and continuation rows carry no currency.
            continue;
        }

        let event = sibling_cell(cell, "calendar__event")
            .and_then(|c| c.select(&SPAN).next())
            .map(|s| cell_text(s).trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        records.push(CalendarEvent {
            time: last.format(TIME_FORMAT).to_string(),
            currency,
            event,
            forecast: detail_field(cell, "calendar__forecast"),
            actual: detail_field(cell, "calendar__actual"),
            previous: detail_field(cell, "calendar__previous"),
        });
    }

    Ok(records)
}

/// Locate the first new-day row inside the table and parse month and day
/// from its date label.
fn anchor_date(table: ElementRef) -> Result<(u32, u32), ScrapeError> {
    let row = table
        .select(&NEW_DAY_ROW)
        .next()
        .ok_or_else(|| ScrapeError::Parse("new-day row not found".to_string()))?;
    let label = row
        .select(&DATE_LABEL)
        .next()
        .ok_or_else(|| ScrapeError::Parse("date label not found".to_string()))?;

    let text = cell_text(label);
    let caps = ANCHOR_DATE
        .captures(&text)
        .ok_or_else(|| ScrapeError::Parse(format!("unrecognized date label: {:?}", text.trim())))?;
    let month = month_number(&caps[2])
        .ok_or_else(|| ScrapeError::Parse(format!("unknown month abbreviation: {}", &caps[2])))?;
    let day = caps[3]
        .parse::<u32>()
        .map_err(|_| ScrapeError::Parse(format!("invalid day in date label: {}", &caps[3])))?;

    Ok((day, month))
}

/// Next sibling `td` of `el` carrying the given class.
fn sibling_cell<'a>(el: ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| has_class(e, class))
}

fn has_class(el: &ElementRef, class: &str) -> bool {
    el.value()
        .attr("class")
        .map(|attr| attr.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

fn cell_text(el: ElementRef) -> String {
    el.text().collect::<String>()
}

/// Forecast/actual/previous cells: strip all whitespace, substitute the
/// sentinel when at most one character remains. A missing cell counts as
/// empty text.
fn detail_field(cell: ElementRef, class: &str) -> String {
    let raw = sibling_cell(cell, class)
        .map(cell_text)
        .unwrap_or_default();
    let stripped = squash_whitespace(&raw);
    // Character count, not byte length: a lone multibyte symbol is still
    // a one-character value.
    if stripped.chars().count() <= 1 {
        UNKNOWN.to_string()
    } else {
        stripped
    }
}

fn squash_whitespace(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}
