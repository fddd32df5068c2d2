use snafu::prelude::*;

use crate::error::Error;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))] // disables default `Snafu` suffix
pub enum PrimitivesError {
    UnallowedEmpty,

    InvalidConversion,

    #[snafu(display("Not a WKT point: \"{}\"", wkt))]
    InvalidWktPoint {
        wkt: String,
    },
}

impl From<PrimitivesError> for Error {
    fn from(error: PrimitivesError) -> Self {
        Error::Primitives { source: error }
    }
}
