use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{self, Result};

/// The result exports this viewer knows about. The name doubles as the file
/// stem of the serialized table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    AstarRoutes,
    MapfRoutes,
    UserPatterns,
    Hotspots,
    ViewLatestClientTrajectories,
    PredictedPoisSequence,
    Lines,
    StopPoints,
    ViewSitesWithStopAreas,
    ViewTopDailyPoi,
}

impl Dataset {
    pub fn all() -> impl Iterator<Item = Dataset> {
        Dataset::iter()
    }

    pub fn file_name(self) -> String {
        format!("{self}.json")
    }

    pub fn file_path(self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }

    /// Resolves a dataset from its export name
    ///
    /// # Errors
    ///
    /// Fails if `name` is not a known dataset
    ///
    pub fn resolve(name: &str) -> Result<Self> {
        Dataset::from_str(name).map_err(|_error| error::Error::UnknownDataset {
            name: name.to_string(),
        })
    }

    /// Datasets whose rows belong to individual clients and therefore honor
    /// the client filter
    pub fn is_client_scoped(self) -> bool {
        matches!(
            self,
            Dataset::AstarRoutes
                | Dataset::MapfRoutes
                | Dataset::ViewLatestClientTrajectories
                | Dataset::PredictedPoisSequence
        )
    }
}
