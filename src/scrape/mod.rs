pub mod extract;
pub mod time;
pub mod url;

pub use extract::{extract, CalendarEvent, UNKNOWN};
pub use url::build_url;

use thiserror::Error;

/// Failures that abort a whole scrape request. Single bad rows never surface
/// here; they are skipped inside the extractor.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] ::url::ParseError),
    #[error("parse failed: {0}")]
    Parse(String),
}
