//! Blocking HTTP retrieval of daily maps

use chrono::{Datelike, NaiveDate};
use reqwest::blocking::Client;
use std::time::Duration;

use crate::core::error::Result;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// URL of the map published for `date` under `base`
pub fn map_url(base: &str, date: NaiveDate) -> String {
    format!(
        "{}/{:04}/{:02}/{:02}/powergrabmap.geojson",
        base.trim_end_matches('/'),
        date.year(),
        date.month(),
        date.day()
    )
}

/// Download a map document
pub fn fetch_map(url: &str) -> Result<String> {
    let client = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(READ_TIMEOUT)
        .build()?;

    tracing::info!(url, "Fetching map");

    let body = client.get(url).send()?.error_for_status()?.text()?;

    tracing::debug!(bytes = body.len(), "Map downloaded");
    Ok(body)
}
