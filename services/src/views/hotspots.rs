use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use snafu::ResultExt;
use std::collections::BTreeMap;
use urbanview_datatypes::collections::{DataTable, PointCollection};

use crate::config;
use crate::error::{self, Result};

/// Column carrying the observation time of a hotspot row
pub const UPDATED_AT_COLUMN: &str = "updated_at";

/// Windowing and bucketing parameters for the hotspot animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotspotParams {
    pub bucket_minutes: i64,
    pub window_hours: i64,
}

impl Default for HotspotParams {
    fn default() -> Self {
        Self {
            bucket_minutes: 5,
            window_hours: 24,
        }
    }
}

impl From<config::Hotspots> for HotspotParams {
    fn from(section: config::Hotspots) -> Self {
        Self {
            bucket_minutes: section.bucket_minutes,
            window_hours: section.window_hours,
        }
    }
}

/// One animation frame: the hotspot positions observed in one time bucket
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotBucket {
    pub start: NaiveDateTime,
    pub points: PointCollection,
}

/// Buckets the rows observed within `params.window_hours` from the start of
/// `date` into `params.bucket_minutes`-sized frames, ascending in time.
/// Rows with missing or unparseable timestamps fall outside every window and
/// are dropped, like rows with null coordinates. An empty result means
/// "nothing to draw", not an error.
pub fn hotspot_buckets(
    table: &DataTable,
    date: NaiveDate,
    params: &HotspotParams,
) -> Result<Vec<HotspotBucket>> {
    let timestamps = parse_timestamp_column(table, UPDATED_AT_COLUMN)?;

    let window_start = date.and_time(NaiveTime::MIN);
    let window_end = window_start + Duration::hours(params.window_hours);

    let mut row_buckets: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (row, timestamp) in timestamps.iter().enumerate() {
        let Some(timestamp) = timestamp else {
            continue;
        };
        if *timestamp < window_start || *timestamp >= window_end {
            continue;
        }

        let bucket = (*timestamp - window_start).num_minutes() / params.bucket_minutes;
        row_buckets.entry(bucket).or_default().push(row);
    }

    let mut buckets = Vec::with_capacity(row_buckets.len());
    for (bucket, rows) in row_buckets {
        let mut mask = vec![false; table.len()];
        for row in rows {
            mask[row] = true;
        }

        let bucket_table = table
            .filter(&mask)
            .map_err(|source| error::Error::DataType {
                source: source.into(),
            })?;
        let points = PointCollection::from_data_table(&bucket_table).context(error::DataType)?;

        if points.is_empty() {
            continue;
        }

        buckets.push(HotspotBucket {
            start: window_start + Duration::minutes(bucket * params.bucket_minutes),
            points,
        });
    }

    Ok(buckets)
}

/// The distinct dates observed in a timestamp column, ascending. Drives the
/// date selection of the hosting UI.
pub fn available_dates(table: &DataTable, column: &str) -> Result<Vec<NaiveDate>> {
    let timestamps = parse_timestamp_column(table, column)?;

    let mut dates: Vec<NaiveDate> = timestamps
        .into_iter()
        .flatten()
        .map(|timestamp| timestamp.date())
        .collect();
    dates.sort_unstable();
    dates.dedup();

    Ok(dates)
}

fn parse_timestamp_column(table: &DataTable, column: &str) -> Result<Vec<Option<NaiveDateTime>>> {
    let texts = table
        .text_column(column)
        .map_err(|source| error::Error::DataType {
            source: source.into(),
        })?;

    Ok(texts
        .into_iter()
        .map(|text| text.as_deref().and_then(parse_timestamp))
        .collect())
}

/// Accepts RFC 3339 as well as the plain `YYYY-MM-DD HH:MM:SS[.fff]` layout
/// of the exports
fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    if let Ok(timestamp) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.naive_utc());
    }

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}
