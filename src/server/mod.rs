// src/server/mod.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, instrument};

use crate::fetch::PageFetcher;
use crate::scrape::{self, CalendarEvent, ScrapeError};

/// Raw query parameters for the daily endpoint. Values stay as strings so
/// that missing and malformed parameters produce distinct 400 bodies.
#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    day: Option<String>,
    month: Option<String>,
    year: Option<String>,
    limit: Option<String>,
    offset: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
struct DailyParams {
    day: u32,
    month: u32,
    year: i32,
    limit: Option<usize>,
    offset: usize,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health))
        .route("/api/forex/daily", web::get().to(daily));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[instrument(level = "info", skip(fetcher, query))]
async fn daily(fetcher: web::Data<PageFetcher>, query: web::Query<DailyQuery>) -> HttpResponse {
    let params = match validate(&query) {
        Ok(p) => p,
        Err(message) => return HttpResponse::BadRequest().json(json!({ "error": message })),
    };

    let url = scrape::build_url(params.day, params.month, params.year, "day");
    info!(%url, "fetching calendar page");

    match fetch_records(&fetcher, &url, params.year).await {
        Ok(records) => {
            info!(count = records.len(), "extracted records");
            HttpResponse::Ok().json(paginate(records, params.offset, params.limit))
        }
        Err(e) => {
            error!(error = %e, "failed to fetch records");
            HttpResponse::BadGateway().json(json!({
                "error": "Failed to fetch records",
                "detail": e.to_string(),
            }))
        }
    }
}

async fn fetch_records(
    fetcher: &PageFetcher,
    url: &str,
    anchor_year: i32,
) -> Result<Vec<CalendarEvent>, ScrapeError> {
    let html = fetcher.fetch_page(url).await?;
    scrape::extract(&html, anchor_year)
}

fn validate(query: &DailyQuery) -> Result<DailyParams, String> {
    let (day, month, year) = match (&query.day, &query.month, &query.year) {
        (Some(d), Some(m), Some(y)) => (d, m, y),
        _ => return Err("Missing one or more required parameters: day, month, year".to_string()),
    };

    let (day, month, year) = match (
        day.trim().parse::<i64>(),
        month.trim().parse::<i64>(),
        year.trim().parse::<i64>(),
    ) {
        (Ok(d), Ok(m), Ok(y)) => (d, m, y),
        _ => return Err("Parameters day, month and year must be integers".to_string()),
    };

    if !(1..=31).contains(&day) || !(1..=12).contains(&month) || !(1900..=2100).contains(&year) {
        return Err("Parameters out of reasonable range".to_string());
    }

    let limit = parse_count(&query.limit, "limit")?;
    let offset = parse_count(&query.offset, "offset")?.unwrap_or(0);

    Ok(DailyParams {
        day: day as u32,
        month: month as u32,
        year: year as i32,
        limit,
        offset,
    })
}

fn parse_count(raw: &Option<String>, name: &str) -> Result<Option<usize>, String> {
    match raw {
        None => Ok(None),
        Some(s) => s
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| format!("Parameter {} must be a non-negative integer", name)),
    }
}

/// Slice `records` by `offset` then `limit`. An offset past the end yields
/// an empty page.
fn paginate<T>(records: Vec<T>, offset: usize, limit: Option<usize>) -> Vec<T> {
    records
        .into_iter()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}
