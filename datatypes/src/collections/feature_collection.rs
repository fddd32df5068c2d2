use snafu::ensure;

use crate::collections::error;
use crate::collections::DataTable;
use crate::primitives::{
    BoundingBox2D, Coordinate2D, FeatureData, Path, PathAccess, Point, SpatialBounded,
};
use crate::spatial_reference::SpatialReference;
use crate::util::Result;

/// This collection contains point geometries and miscellaneous data.
pub type PointCollection = FeatureCollection<Point>;

/// This collection contains path geometries and miscellaneous data.
pub type PathCollection = FeatureCollection<Path>;

/// A table where every row carries exactly one geometry. All geometries stem
/// from the same coordinate-resolution rule and share one coordinate
/// reference system.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureCollection<G> {
    geometries: Vec<G>,
    table: DataTable,
    spatial_reference: SpatialReference,
}

impl<G> FeatureCollection<G> {
    /// Reserved name for geometry column
    pub const GEOMETRY_COLUMN_NAME: &'static str = "__geometry";

    /// Checks for name conflicts with reserved names
    pub fn is_reserved_name(name: &str) -> bool {
        name == Self::GEOMETRY_COLUMN_NAME
    }

    /// Creates a collection from geometries and their attribute rows.
    /// All data is referenced to WGS 84 (EPSG:4326).
    ///
    /// # Errors
    ///
    /// Fails if the number of geometries does not match the number of rows
    ///
    pub fn new(geometries: Vec<G>, table: DataTable) -> Result<Self> {
        ensure!(
            geometries.len() == table.len(),
            error::UnmatchedLength {
                a: geometries.len(),
                b: table.len()
            }
        );

        Ok(Self {
            geometries,
            table,
            spatial_reference: SpatialReference::epsg_4326(),
        })
    }

    pub fn empty() -> Self {
        Self {
            geometries: Vec::new(),
            table: DataTable::empty(),
            spatial_reference: SpatialReference::epsg_4326(),
        }
    }

    /// Returns the number of features
    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    /// Returns whether the collection contains no features
    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    pub fn geometries(&self) -> &[G] {
        &self.geometries
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    pub fn spatial_reference(&self) -> SpatialReference {
        self.spatial_reference
    }

    /// Retrieve column data
    ///
    /// # Errors
    ///
    /// This method fails if there is no `column` with that name
    ///
    pub fn data(&self, column: &str) -> Result<&FeatureData> {
        ensure!(
            !Self::is_reserved_name(column),
            error::CannotAccessReservedColumn {
                name: column.to_string()
            }
        );

        Ok(self.table.data(column)?)
    }

    /// Creates a copy of the collection with an additional column
    ///
    /// # Errors
    ///
    /// Adding a column fails if the column does already exist, is reserved,
    /// or the length does not match the length of the collection
    ///
    pub fn add_column(&self, new_column: &str, data: FeatureData) -> Result<Self>
    where
        G: Clone,
    {
        ensure!(
            !Self::is_reserved_name(new_column),
            error::CannotAccessReservedColumn {
                name: new_column.to_string()
            }
        );

        Ok(Self {
            geometries: self.geometries.clone(),
            table: self.table.add_column(new_column, data)?,
            spatial_reference: self.spatial_reference,
        })
    }

    /// Filters the collection by copying the data into a new collection
    ///
    /// # Errors
    ///
    /// This method fails if the `mask`'s length does not equal the length of the collection
    ///
    pub fn filter(&self, mask: &[bool]) -> Result<Self>
    where
        G: Clone,
    {
        ensure!(
            mask.len() == self.geometries.len(),
            error::UnmatchedLength {
                a: self.geometries.len(),
                b: mask.len()
            }
        );

        let geometries = self
            .geometries
            .iter()
            .zip(mask)
            .filter(|(_, &keep)| keep)
            .map(|(geometry, _)| geometry.clone())
            .collect();

        Ok(Self {
            geometries,
            table: self.table.filter(mask)?,
            spatial_reference: self.spatial_reference,
        })
    }

    /// The common bounding box of all geometries, `None` for an empty collection
    pub fn bounding_box(&self) -> Option<BoundingBox2D>
    where
        G: SpatialBounded,
    {
        self.geometries
            .iter()
            .map(SpatialBounded::spatial_bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Serialize the collection to a GeoJSON feature-collection string
    pub fn to_geo_json(&self) -> String
    where
        for<'g> &'g G: Into<geojson::Geometry>,
    {
        let features = self
            .geometries
            .iter()
            .enumerate()
            .map(|(row, geometry)| {
                let mut properties = geojson::JsonObject::new();
                for name in self.table.column_names() {
                    if let Ok(data) = self.table.value(name, row) {
                        properties.insert(name.to_string(), data.into());
                    }
                }

                geojson::Feature {
                    bbox: None,
                    geometry: Some(geometry.into()),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        geojson::GeoJson::FeatureCollection(geojson::FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
        .to_string()
    }
}

impl FeatureCollection<Point> {
    /// The arithmetic mean of all point coordinates, used for framing a map
    /// view. `None` for an empty collection.
    pub fn mean_center(&self) -> Option<Coordinate2D> {
        if self.geometries.is_empty() {
            return None;
        }

        let sum = self
            .geometries
            .iter()
            .fold(Coordinate2D::default(), |acc, point| {
                acc + point.coordinate()
            });

        Some(sum / self.geometries.len() as f64)
    }
}

impl FeatureCollection<Path> {
    /// The arithmetic mean of the bounding-box centers of all paths.
    /// `None` for an empty collection.
    pub fn mean_center(&self) -> Option<Coordinate2D> {
        if self.geometries.is_empty() {
            return None;
        }

        let sum = self
            .geometries
            .iter()
            .fold(Coordinate2D::default(), |acc, path| {
                acc + path.spatial_bounds().center()
            });

        Some(sum / self.geometries.len() as f64)
    }

    /// Total number of coordinates over all paths
    pub fn total_point_count(&self) -> usize {
        self.geometries.iter().map(PathAccess::point_count).sum()
    }
}
