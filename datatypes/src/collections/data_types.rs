use serde::{Deserialize, Serialize};
use strum::Display;

/// An enum that contains all possible vector data types
#[derive(
    Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, Serialize, Copy, Clone, Display,
)]
pub enum VectorDataType {
    Point,
    Path,
}
