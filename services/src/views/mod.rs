//! Assembly of per-dataset geometry layers. Everything here produces plain
//! geometry collections; styling, clustering, and drawing belong to the
//! rendering layer consuming them.

mod hotspots;
mod infrastructure;
mod patterns;
mod routes;
mod trajectories;

use snafu::ResultExt;
use urbanview_datatypes::collections::{DataTable, PointCollection};

use crate::error::{self, Result};

pub use hotspots::{available_dates, hotspot_buckets, HotspotBucket, HotspotParams};
pub use infrastructure::{
    filter_by_transport_mode, flatten_lines_content, nearest_stop_connectors, transport_modes,
    CONTENT_COLUMN,
};
pub use patterns::{ClientFilter, PatternGroups};
pub use routes::{path_layer, RouteComparison, RouteKind, PATH_COLUMN};
pub use trajectories::{trajectory_layer, TRAJECTORY_COLUMN};

/// The normalized point frame of any point-valued dataset (patterns, stop
/// points, predicted POIs, sites). Schema failures escalate; they are the one
/// condition the hosting UI must show to the user.
pub fn point_layer(table: &DataTable) -> Result<PointCollection> {
    PointCollection::from_data_table(table).context(error::DataType)
}
