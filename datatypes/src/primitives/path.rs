use std::convert::TryFrom;

use float_cmp::{ApproxEq, F64Margin};
use serde::{Deserialize, Serialize};
use snafu::ensure;
use wkt::{ToWkt, Wkt};

use crate::collections::VectorDataType;
use crate::error::Error;
use crate::primitives::error;
use crate::primitives::{
    BoundingBox2D, Coordinate2D, Geometry, PrimitivesError, SpatialBounded, TypedGeometry,
};
use crate::util::Result;

/// A trait that allows a common access to the coordinates of a path
pub trait PathAccess {
    fn coordinates(&self) -> &[Coordinate2D];

    /// Number of coordinates, at least one by construction
    fn point_count(&self) -> usize {
        self.coordinates().len()
    }
}

/// An ordered, non-empty coordinate sequence. Order defines the traversal
/// direction; consecutive duplicates are preserved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    coordinates: Vec<Coordinate2D>,
}

impl Path {
    pub fn new(coordinates: Vec<Coordinate2D>) -> Result<Self> {
        ensure!(!coordinates.is_empty(), error::UnallowedEmpty);

        Ok(Self::new_unchecked(coordinates))
    }

    pub(crate) fn new_unchecked(coordinates: Vec<Coordinate2D>) -> Self {
        Self { coordinates }
    }

    pub fn start(&self) -> Coordinate2D {
        self.coordinates[0]
    }

    pub fn end(&self) -> Coordinate2D {
        self.coordinates[self.coordinates.len() - 1]
    }
}

impl PathAccess for Path {
    fn coordinates(&self) -> &[Coordinate2D] {
        &self.coordinates
    }
}

impl Geometry for Path {
    const DATA_TYPE: VectorDataType = VectorDataType::Path;
}

impl TryFrom<TypedGeometry> for Path {
    type Error = Error;

    fn try_from(value: TypedGeometry) -> Result<Self, Self::Error> {
        if let TypedGeometry::Path(geometry) = value {
            Ok(geometry)
        } else {
            Err(PrimitivesError::InvalidConversion.into())
        }
    }
}

impl AsRef<[Coordinate2D]> for Path {
    fn as_ref(&self) -> &[Coordinate2D] {
        &self.coordinates
    }
}

impl TryFrom<Vec<(f64, f64)>> for Path {
    type Error = Error;

    fn try_from(coordinates: Vec<(f64, f64)>) -> Result<Self, Self::Error> {
        Path::new(coordinates.into_iter().map(Into::into).collect())
    }
}

impl From<&Path> for geo::LineString<f64> {
    fn from(path: &Path) -> geo::LineString<f64> {
        geo::LineString(path.coordinates.iter().map(Into::into).collect())
    }
}

impl ToWkt<f64> for Path {
    fn to_wkt(&self) -> Wkt<f64> {
        let mut line_string = wkt::types::LineString(Vec::with_capacity(self.coordinates.len()));

        for coordinate in &self.coordinates {
            line_string.0.push(coordinate.into());
        }

        Wkt::LineString(line_string)
    }
}

impl From<&Path> for geojson::Geometry {
    fn from(path: &Path) -> geojson::Geometry {
        let positions = path.coordinates.iter().map(|c| vec![c.x, c.y]).collect();
        geojson::Geometry::new(geojson::Value::LineString(positions))
    }
}

impl SpatialBounded for Path {
    fn spatial_bounds(&self) -> BoundingBox2D {
        let mut bounds = BoundingBox2D::new_unchecked(self.start(), self.start());
        for &coordinate in &self.coordinates {
            bounds.extend_with_coord(coordinate);
        }
        bounds
    }
}

impl<'p> ApproxEq for &'p Path {
    type Margin = F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        let m = margin.into();
        self.coordinates.len() == other.coordinates.len()
            && self
                .coordinates
                .iter()
                .zip(other.coordinates.iter())
                .all(|(&a, &b)| a.approx_eq(b, m))
    }
}
