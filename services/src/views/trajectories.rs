use serde_json::Value;
use snafu::ResultExt;
use urbanview_datatypes::collections::{DataTable, PathCollection};
use urbanview_datatypes::primitives::{Coordinate2D, Path};

use crate::error::{self, Result};

/// Column holding the recorded positions in the trajectory export: a JSON
/// array of `{"lat": .., "lon": ..}` records per row
pub const TRAJECTORY_COLUMN: &str = "trajectory";

/// Assembles one path per row from the nested trajectory records. Records
/// without usable coordinates are skipped, rows without any remaining
/// positions are dropped.
pub fn trajectory_layer(table: &DataTable) -> Result<PathCollection> {
    let trajectories = table
        .json_column(TRAJECTORY_COLUMN)
        .map_err(|source| error::Error::DataType {
            source: source.into(),
        })?;

    let mut mask = Vec::with_capacity(table.len());
    let mut geometries = Vec::new();

    for trajectory in &trajectories {
        let coordinates: Vec<Coordinate2D> = trajectory
            .as_ref()
            .and_then(Value::as_array)
            .map(|records| {
                records
                    .iter()
                    .filter_map(record_coordinate)
                    .collect()
            })
            .unwrap_or_default();

        match Path::new(coordinates) {
            Ok(path) => {
                mask.push(true);
                geometries.push(path);
            }
            Err(_empty) => mask.push(false),
        }
    }

    let rows = table
        .filter(&mask)
        .map_err(|source| error::Error::DataType {
            source: source.into(),
        })?;

    PathCollection::new(geometries, rows).context(error::DataType)
}

/// Reads one `{"lat": .., "lon": ..}` record; numbers may arrive as strings
fn record_coordinate(record: &Value) -> Option<Coordinate2D> {
    let component = |key: &str| -> Option<f64> {
        match record.get(key)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.parse().ok(),
            _ => None,
        }
    };

    let lat = component("lat")?;
    let lon = component("lon")?;
    Some((lon, lat).into())
}
