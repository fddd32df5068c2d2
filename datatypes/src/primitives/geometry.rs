use std::convert::TryFrom;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::collections::VectorDataType;
use crate::error::Error;
use crate::primitives::{Path, Point};

/// Marker trait for geometry types
pub trait Geometry:
    Clone + Debug + PartialEq + Send + Sync + TryFrom<TypedGeometry, Error = Error>
{
    const DATA_TYPE: VectorDataType;
}

/// A geometry of one of the supported types
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TypedGeometry {
    Point(Point),
    Path(Path),
}

impl TypedGeometry {
    pub fn vector_data_type(&self) -> VectorDataType {
        match self {
            TypedGeometry::Point(_) => VectorDataType::Point,
            TypedGeometry::Path(_) => VectorDataType::Path,
        }
    }
}

impl From<Point> for TypedGeometry {
    fn from(geometry: Point) -> Self {
        TypedGeometry::Point(geometry)
    }
}

impl From<Path> for TypedGeometry {
    fn from(geometry: Path) -> Self {
        TypedGeometry::Path(geometry)
    }
}
