use itertools::Itertools;
use serde_json::{Map, Value};
use urbanview_datatypes::collections::{DataTable, PointCollection};
use urbanview_datatypes::primitives::{Path, Point};

use crate::error::{self, Result};

/// Column of the `lines` export carrying the nested line descriptor
pub const CONTENT_COLUMN: &str = "content";

const TRANSPORT_MODE_COLUMN: &str = "transport_mode";

/// Flattens the nested `content` descriptor of the `lines` export into a
/// plain table. Nested objects become dotted columns (`contractor.name`),
/// arrays stay as JSON cells; null descriptors become all-null rows.
pub fn flatten_lines_content(table: &DataTable) -> Result<DataTable> {
    let descriptors = table
        .json_column(CONTENT_COLUMN)
        .map_err(|source| error::Error::DataType {
            source: source.into(),
        })?;

    let records: Vec<Value> = descriptors
        .into_iter()
        .map(|descriptor| {
            let mut flat = Map::new();
            if let Some(descriptor) = descriptor {
                flatten_into("", &descriptor, &mut flat);
            }
            Value::Object(flat)
        })
        .collect();

    DataTable::from_json_records(&records).map_err(|source| error::Error::DataType {
        source: source.into(),
    })
}

fn flatten_into(prefix: &str, value: &Value, out: &mut Map<String, Value>) {
    match value {
        Value::Object(object) => {
            for (key, nested) in object {
                let column = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(&column, nested, out);
            }
        }
        _ if prefix.is_empty() => {} // a non-object descriptor has no columns
        _ => {
            out.insert(prefix.to_string(), value.clone());
        }
    }
}

/// The distinct transport modes of a flattened lines table, sorted
pub fn transport_modes(table: &DataTable) -> Result<Vec<String>> {
    let modes = table
        .text_column(TRANSPORT_MODE_COLUMN)
        .map_err(|source| error::Error::DataType {
            source: source.into(),
        })?;

    Ok(modes.into_iter().flatten().sorted().dedup().collect())
}

/// Keeps the rows of a flattened lines table with the given transport mode
pub fn filter_by_transport_mode(table: &DataTable, mode: &str) -> Result<DataTable> {
    let modes = table
        .text_column(TRANSPORT_MODE_COLUMN)
        .map_err(|source| error::Error::DataType {
            source: source.into(),
        })?;

    let mask: Vec<bool> = modes
        .iter()
        .map(|row| row.as_deref() == Some(mode))
        .collect();

    table.filter(&mask).map_err(|source| error::Error::DataType {
        source: source.into(),
    })
}

/// For every pattern position, the straight connector to its
/// euclidean-nearest stop. Empty when either side is empty.
pub fn nearest_stop_connectors(
    patterns: &PointCollection,
    stops: &PointCollection,
) -> Result<Vec<Path>> {
    if stops.is_empty() {
        return Ok(Vec::new());
    }

    patterns
        .geometries()
        .iter()
        .map(|pattern| {
            let pattern = pattern.coordinate();
            let nearest = stops
                .geometries()
                .iter()
                .map(Point::coordinate)
                .min_by(|a, b| {
                    pattern
                        .euclidean_distance(a)
                        .total_cmp(&pattern.euclidean_distance(b))
                })
                .expect("stops are non-empty");

            Path::new(vec![pattern, nearest])
                .map_err(|source| error::Error::DataType { source })
        })
        .collect()
}
