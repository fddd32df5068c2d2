use std::convert::TryFrom;
use std::str::FromStr;

use float_cmp::{ApproxEq, F64Margin};
use serde::{Deserialize, Serialize};
use wkt::{ToWkt, Wkt};

use crate::collections::VectorDataType;
use crate::error::Error;
use crate::primitives::{
    BoundingBox2D, Coordinate2D, Geometry, PrimitivesError, SpatialBounded, TypedGeometry,
};
use crate::util::Result;

/// A single coordinate tagged as a point geometry
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    coordinate: Coordinate2D,
}

impl Point {
    pub fn new(coordinate: Coordinate2D) -> Self {
        Self { coordinate }
    }

    pub fn coordinate(&self) -> Coordinate2D {
        self.coordinate
    }

    pub fn x(&self) -> f64 {
        self.coordinate.x
    }

    pub fn y(&self) -> f64 {
        self.coordinate.y
    }

    /// Parses a well-known-text point, e.g. `POINT (18.0 59.3)`.
    ///
    /// # Errors
    ///
    /// Fails if the string is not valid WKT or encodes anything other than a
    /// non-empty point.
    ///
    pub fn from_wkt(wkt_string: &str) -> Result<Self> {
        let parsed: Wkt<f64> = Wkt::from_str(wkt_string).map_err(|_error| {
            PrimitivesError::InvalidWktPoint {
                wkt: wkt_string.to_string(),
            }
        })?;

        if let Wkt::Point(wkt::types::Point(Some(coord))) = parsed {
            return Ok(Point::new((coord.x, coord.y).into()));
        }

        Err(PrimitivesError::InvalidWktPoint {
            wkt: wkt_string.to_string(),
        }
        .into())
    }
}

impl Geometry for Point {
    const DATA_TYPE: VectorDataType = VectorDataType::Point;
}

impl TryFrom<TypedGeometry> for Point {
    type Error = Error;

    fn try_from(value: TypedGeometry) -> Result<Self, Self::Error> {
        if let TypedGeometry::Point(geometry) = value {
            Ok(geometry)
        } else {
            Err(PrimitivesError::InvalidConversion.into())
        }
    }
}

impl From<Coordinate2D> for Point {
    fn from(coordinate: Coordinate2D) -> Self {
        Self::new(coordinate)
    }
}

impl From<(f64, f64)> for Point {
    fn from(coordinates: (f64, f64)) -> Self {
        Self::new(coordinates.into())
    }
}

impl From<Point> for Coordinate2D {
    fn from(point: Point) -> Self {
        point.coordinate
    }
}

impl From<Point> for geo::Point<f64> {
    fn from(point: Point) -> geo::Point<f64> {
        point.coordinate.into()
    }
}

impl From<geo::Point<f64>> for Point {
    fn from(point: geo::Point<f64>) -> Point {
        Point::new(point.into())
    }
}

impl ToWkt<f64> for Point {
    fn to_wkt(&self) -> Wkt<f64> {
        Wkt::Point(wkt::types::Point(Some((&self.coordinate).into())))
    }
}

impl From<&Point> for geojson::Geometry {
    fn from(point: &Point) -> geojson::Geometry {
        let floats: [f64; 2] = point.coordinate.into();
        geojson::Geometry::new(geojson::Value::Point(floats.to_vec()))
    }
}

impl SpatialBounded for Point {
    fn spatial_bounds(&self) -> BoundingBox2D {
        BoundingBox2D::new_unchecked(self.coordinate, self.coordinate)
    }
}

impl ApproxEq for Point {
    type Margin = F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        self.coordinate.approx_eq(other.coordinate, margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_wkt() {
        let point = Point::from_wkt("POINT (18.0 59.3)").unwrap();

        assert_eq!(point.x(), 18.0);
        assert_eq!(point.y(), 59.3);
    }

    #[test]
    fn from_wkt_without_space() {
        let point = Point::from_wkt("POINT(18 59.3)").unwrap();

        assert_eq!(point.coordinate(), (18.0, 59.3).into());
    }

    #[test]
    fn from_wkt_rejects_garbage() {
        assert!(Point::from_wkt("not a point").is_err());
        assert!(Point::from_wkt("").is_err());
    }

    #[test]
    fn from_wkt_rejects_other_geometries() {
        assert!(Point::from_wkt("LINESTRING(0 0,1 1)").is_err());
        assert!(Point::from_wkt("POINT EMPTY").is_err());
    }

    #[test]
    fn test_to_wkt() {
        let point = Point::from((18.0, 59.3));

        assert_eq!(point.wkt_string(), "POINT(18 59.3)");
    }

    #[test]
    fn spatial_bounds() {
        let point = Point::from((18.0, 59.3));
        let bounds = point.spatial_bounds();

        assert_eq!(bounds.lower_left(), point.coordinate());
        assert_eq!(bounds.upper_right(), point.coordinate());
    }
}
