use crate::collections::{DataTable, FeatureCollectionError, PointCollection};
use crate::primitives::Point;
use crate::util::Result;

/// How a table expresses per-row locations. Detection follows a strict
/// first-match priority; downstream consumers rely on which convention wins,
/// so the order must not change.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoordinateConvention {
    /// Observed positions in `lat`/`lon` columns
    LatLon,
    /// Positions produced by a predictive process, in
    /// `predicted_lat`/`predicted_lon` columns
    PredictedLatLon,
    /// A free-form `geometry` column holding WKT point text
    GeometryWkt,
}

impl CoordinateConvention {
    pub const LAT: &'static str = "lat";
    pub const LON: &'static str = "lon";
    pub const PREDICTED_LAT: &'static str = "predicted_lat";
    pub const PREDICTED_LON: &'static str = "predicted_lon";
    pub const GEOMETRY: &'static str = "geometry";

    /// Determines which convention a table uses.
    ///
    /// # Errors
    ///
    /// Fails with [`FeatureCollectionError::NoCoordinateColumns`] if none
    /// matches; callers must surface this instead of guessing.
    ///
    pub fn detect(table: &DataTable) -> Result<Self, FeatureCollectionError> {
        if table.has_column(Self::LAT) && table.has_column(Self::LON) {
            Ok(CoordinateConvention::LatLon)
        } else if table.has_column(Self::PREDICTED_LAT) && table.has_column(Self::PREDICTED_LON) {
            Ok(CoordinateConvention::PredictedLatLon)
        } else if table.has_column(Self::GEOMETRY) {
            Ok(CoordinateConvention::GeometryWkt)
        } else {
            Err(FeatureCollectionError::NoCoordinateColumns {
                columns: table.column_names().map(str::to_string).collect(),
            })
        }
    }

    /// The latitude/longitude column pair, if this convention uses one
    pub fn coordinate_columns(self) -> Option<(&'static str, &'static str)> {
        match self {
            CoordinateConvention::LatLon => Some((Self::LAT, Self::LON)),
            CoordinateConvention::PredictedLatLon => Some((Self::PREDICTED_LAT, Self::PREDICTED_LON)),
            CoordinateConvention::GeometryWkt => None,
        }
    }
}

impl PointCollection {
    /// Normalizes a point-valued table: resolves the coordinate convention,
    /// drops rows without a usable location, and attaches one point geometry
    /// per surviving row. The input table is left untouched.
    ///
    /// # Errors
    ///
    /// Fails if the table offers no recognized coordinate representation, or
    /// if a coordinate column holds non-numeric data
    ///
    pub fn from_data_table(table: &DataTable) -> Result<Self> {
        let convention = CoordinateConvention::detect(table)?;

        match convention.coordinate_columns() {
            Some((lat_column, lon_column)) => {
                Self::from_coordinate_pair(table, lat_column, lon_column)
            }
            None => Self::from_wkt_column(table),
        }
    }

    fn from_coordinate_pair(table: &DataTable, lat_column: &str, lon_column: &str) -> Result<Self> {
        let lats = table.float_column(lat_column)?;
        let lons = table.float_column(lon_column)?;

        let mut mask = Vec::with_capacity(table.len());
        let mut geometries = Vec::new();

        for (lat, lon) in lats.into_iter().zip(lons) {
            match (lat, lon) {
                (Some(lat), Some(lon)) => {
                    mask.push(true);
                    geometries.push(Point::from((lon, lat)));
                }
                _ => mask.push(false),
            }
        }

        Self::new(geometries, table.filter(&mask)?)
    }

    fn from_wkt_column(table: &DataTable) -> Result<Self> {
        let wkts = table.text_column(CoordinateConvention::GEOMETRY)?;

        let mut mask = Vec::with_capacity(table.len());
        let mut geometries = Vec::new();

        // unparseable rows are dropped like rows with null coordinates
        for wkt in &wkts {
            match wkt.as_deref().and_then(|text| Point::from_wkt(text).ok()) {
                Some(point) => {
                    mask.push(true);
                    geometries.push(point);
                }
                None => mask.push(false),
            }
        }

        Self::new(geometries, table.filter(&mask)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn lat_lon_with_null_dropped() {
        let table = DataTable::from_json_records(&[
            json!({"lat": 59.3, "lon": 18.0}),
            json!({"lat": null, "lon": 18.1}),
        ])
        .unwrap();

        let collection = PointCollection::from_data_table(&table).unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.geometries()[0], (18.0, 59.3).into());
        assert_eq!(
            collection.spatial_reference(),
            crate::spatial_reference::SpatialReference::epsg_4326()
        );
        // the source table is untouched
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn predicted_columns_win_when_lat_lon_is_absent() {
        let table = DataTable::from_json_records(&[
            json!({"predicted_lat": 59.5, "predicted_lon": 17.9, "client_id": "c1"}),
        ])
        .unwrap();

        assert_eq!(
            CoordinateConvention::detect(&table).unwrap(),
            CoordinateConvention::PredictedLatLon
        );

        let collection = PointCollection::from_data_table(&table).unwrap();
        assert_eq!(collection.geometries()[0], (17.9, 59.5).into());
    }

    #[test]
    fn lat_lon_shadows_predicted_columns() {
        let table = DataTable::from_json_records(&[json!({
            "lat": 1.0, "lon": 2.0, "predicted_lat": 3.0, "predicted_lon": 4.0
        })])
        .unwrap();

        assert_eq!(
            CoordinateConvention::detect(&table).unwrap(),
            CoordinateConvention::LatLon
        );

        let collection = PointCollection::from_data_table(&table).unwrap();
        assert_eq!(collection.geometries()[0], (2.0, 1.0).into());
    }

    #[test]
    fn wkt_geometry_fallback() {
        let table = DataTable::from_json_records(&[
            json!({"geometry": "POINT (18.0 59.3)", "name": "s1"}),
            json!({"geometry": "not wkt", "name": "s2"}),
            json!({"geometry": null, "name": "s3"}),
        ])
        .unwrap();

        let collection = PointCollection::from_data_table(&table).unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.geometries()[0], (18.0, 59.3).into());
        assert_eq!(
            collection.table().text_column("name").unwrap(),
            vec![Some("s1".to_string())]
        );
    }

    #[test]
    fn missing_conventions_fail() {
        let table = DataTable::from_json_records(&[json!({"client_id": "c1"})]).unwrap();

        let result = PointCollection::from_data_table(&table);

        assert!(matches!(
            result,
            Err(Error::FeatureCollection {
                source: FeatureCollectionError::NoCoordinateColumns { .. }
            })
        ));
    }

    #[test]
    fn incomplete_pair_does_not_match() {
        // `lat` alone is not a convention; the WKT column wins instead
        let table = DataTable::from_json_records(&[
            json!({"lat": 59.3, "geometry": "POINT (1 2)"}),
        ])
        .unwrap();

        assert_eq!(
            CoordinateConvention::detect(&table).unwrap(),
            CoordinateConvention::GeometryWkt
        );
    }

    #[test]
    fn empty_table_yields_empty_collection() {
        let table = DataTable::from_json_records(&[
            json!({"lat": null, "lon": null}),
        ])
        .unwrap();

        let collection = PointCollection::from_data_table(&table).unwrap();
        assert!(collection.is_empty());
    }
}
