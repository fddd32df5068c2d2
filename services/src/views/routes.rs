use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use strum::Display;
use urbanview_datatypes::collections::{DataTable, PathCollection};

use crate::cache::CachingPathDecoder;
use crate::datasets::{Dataset, DatasetStore};
use crate::error::{self, Result};
use crate::views::patterns::ClientFilter;
use crate::views::trajectories;

/// Column holding hex-encoded WKB route geometries in the route exports
pub const PATH_COLUMN: &str = "path";

/// Where a displayed path came from. Rendering colors by this, the core only
/// tags it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RouteKind {
    Astar,
    Mapf,
    Trajectory,
}

/// Builds the path layer of a route table: every row's `path` blob is
/// decoded through `decoder`, rows that do not decode are dropped.
pub fn path_layer(table: &DataTable, decoder: &CachingPathDecoder) -> Result<PathCollection> {
    PathCollection::from_wkb_hex_column_with(table, PATH_COLUMN, |blob| decoder.decode(blob))
        .context(error::DataType)
}

/// The planned and observed movements of one client selection, side by side
#[derive(Debug, Clone, PartialEq)]
pub struct RouteComparison {
    pub astar: PathCollection,
    pub mapf: PathCollection,
    pub trajectories: PathCollection,
}

impl RouteComparison {
    /// Assembles A* routes, MAPF routes and observed trajectories, each
    /// restricted to the clients allowed by `filter`.
    pub fn assemble(
        store: &DatasetStore,
        filter: Option<&ClientFilter>,
        decoder: &CachingPathDecoder,
    ) -> Result<Self> {
        let restrict = |dataset: Dataset| -> Result<DataTable> {
            let table = store.table(dataset);
            match filter {
                Some(filter) => filter.apply(table),
                None => Ok(table.clone()),
            }
        };

        Ok(Self {
            astar: path_layer(&restrict(Dataset::AstarRoutes)?, decoder)?,
            mapf: path_layer(&restrict(Dataset::MapfRoutes)?, decoder)?,
            trajectories: trajectories::trajectory_layer(&restrict(
                Dataset::ViewLatestClientTrajectories,
            )?)?,
        })
    }

    /// The non-empty layers, tagged by kind
    pub fn layers(&self) -> impl Iterator<Item = (RouteKind, &PathCollection)> {
        [
            (RouteKind::Astar, &self.astar),
            (RouteKind::Mapf, &self.mapf),
            (RouteKind::Trajectory, &self.trajectories),
        ]
        .into_iter()
        .filter(|(_, collection)| !collection.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line_string_hex(coordinates: &[(f64, f64)]) -> String {
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&(coordinates.len() as u32).to_le_bytes());
        for &(x, y) in coordinates {
            bytes.extend_from_slice(&x.to_le_bytes());
            bytes.extend_from_slice(&y.to_le_bytes());
        }
        hex::encode(bytes)
    }

    #[test]
    fn path_layer_drops_undecodable_rows() {
        let table = DataTable::from_json_records(&[
            json!({"client_id": "c1", "path": line_string_hex(&[(18.0, 59.3), (18.1, 59.4)])}),
            json!({"client_id": "c2", "path": "broken"}),
        ])
        .unwrap();

        let decoder = CachingPathDecoder::new();
        let layer = path_layer(&table, &decoder).unwrap();

        assert_eq!(layer.len(), 1);
        assert_eq!(decoder.misses(), 2);
    }

    #[test]
    fn path_layer_without_path_column_fails() {
        let table = DataTable::from_json_records(&[json!({"client_id": "c1"})]).unwrap();
        let decoder = CachingPathDecoder::new();

        assert!(path_layer(&table, &decoder).is_err());
    }

    #[test]
    fn layers_skip_empty_collections() {
        let comparison = RouteComparison {
            astar: PathCollection::empty(),
            mapf: PathCollection::empty(),
            trajectories: PathCollection::empty(),
        };

        assert_eq!(comparison.layers().count(), 0);
    }
}
