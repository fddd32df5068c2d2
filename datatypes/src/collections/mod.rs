mod data_table;
mod data_types;
mod error;
mod feature_collection;
mod path_collection;
mod point_collection;

pub use data_table::DataTable;
pub use data_types::VectorDataType;
pub use error::FeatureCollectionError;
pub use feature_collection::{FeatureCollection, PathCollection, PointCollection};
pub use point_collection::CoordinateConvention;
