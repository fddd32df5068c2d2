use snafu::Snafu;

use crate::error::Error;
use crate::primitives::{FeatureDataType, PrimitivesError};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))]
pub enum FeatureCollectionError {
    CannotAccessReservedColumn {
        name: String,
    },

    ColumnDoesNotExist {
        name: String,
    },

    ColumnAlreadyExists {
        name: String,
    },

    Primitives {
        source: PrimitivesError,
    },

    UnmatchedLength {
        a: usize,
        b: usize,
    },

    #[snafu(display("Column \"{}\" holds {:?} data, expected {:?}", name, found, expected))]
    WrongDataType {
        name: String,
        found: FeatureDataType,
        expected: FeatureDataType,
    },

    #[snafu(display(
        "Table has no recognized coordinate representation \
         (lat/lon, predicted_lat/predicted_lon, or a geometry column); columns: {:?}",
        columns
    ))]
    NoCoordinateColumns {
        columns: Vec<String>,
    },

    #[snafu(display("Record {} is not a JSON object", index))]
    RecordNotAnObject {
        index: usize,
    },
}

impl From<FeatureCollectionError> for Error {
    fn from(error: FeatureCollectionError) -> Self {
        Error::FeatureCollection { source: error }
    }
}

impl From<PrimitivesError> for FeatureCollectionError {
    fn from(source: PrimitivesError) -> Self {
        FeatureCollectionError::Primitives { source }
    }
}
