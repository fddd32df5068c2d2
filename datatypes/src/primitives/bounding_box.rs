use serde::{Deserialize, Serialize};
use snafu::ensure;

use super::Coordinate2D;
use crate::error;
use crate::util::Result;

/// The bounding box of a geometry.
/// Note: may degenerate to a point!
#[derive(Copy, Clone, Serialize, Deserialize, PartialEq, Debug)]
#[repr(C)]
pub struct BoundingBox2D {
    lower_left_coordinate: Coordinate2D,
    upper_right_coordinate: Coordinate2D,
}

impl BoundingBox2D {
    /// Creates a new bounding box
    ///
    /// # Errors
    ///
    /// This constructor fails if the coordinate's values are not in order
    ///
    pub fn new(
        lower_left_coordinate: Coordinate2D,
        upper_right_coordinate: Coordinate2D,
    ) -> Result<Self> {
        ensure!(
            lower_left_coordinate.x <= upper_right_coordinate.x
                && lower_left_coordinate.y <= upper_right_coordinate.y,
            error::InvalidBoundingBox {
                lower_left_coordinate,
                upper_right_coordinate
            }
        );
        Ok(Self {
            lower_left_coordinate,
            upper_right_coordinate,
        })
    }

    pub fn new_unchecked(
        lower_left_coordinate: Coordinate2D,
        upper_right_coordinate: Coordinate2D,
    ) -> Self {
        Self {
            lower_left_coordinate,
            upper_right_coordinate,
        }
    }

    pub fn lower_left(&self) -> Coordinate2D {
        self.lower_left_coordinate
    }

    pub fn upper_right(&self) -> Coordinate2D {
        self.upper_right_coordinate
    }

    pub fn size_x(&self) -> f64 {
        self.upper_right_coordinate.x - self.lower_left_coordinate.x
    }

    pub fn size_y(&self) -> f64 {
        self.upper_right_coordinate.y - self.lower_left_coordinate.y
    }

    /// The midpoint of the box, used for framing a map view
    pub fn center(&self) -> Coordinate2D {
        (self.lower_left_coordinate + self.upper_right_coordinate) / 2.
    }

    pub fn contains_coordinate(&self, coordinate: &Coordinate2D) -> bool {
        coordinate.x >= self.lower_left_coordinate.x
            && coordinate.x <= self.upper_right_coordinate.x
            && coordinate.y >= self.lower_left_coordinate.y
            && coordinate.y <= self.upper_right_coordinate.y
    }

    /// Grows the box to include `coord`
    pub fn extend_with_coord(&mut self, coord: Coordinate2D) {
        self.lower_left_coordinate = self.lower_left_coordinate.min_elements(coord);
        self.upper_right_coordinate = self.upper_right_coordinate.max_elements(coord);
    }

    /// Computes the bounding box of all coordinates in `iter`, `None` for an
    /// empty iterator
    pub fn from_coord_iter<I: IntoIterator<Item = Coordinate2D>>(iter: I) -> Option<Self> {
        let mut iterator = iter.into_iter();

        let first = iterator.next()?;
        let mut bounds = BoundingBox2D::new_unchecked(first, first);

        for coordinate in iterator {
            bounds.extend_with_coord(coordinate);
        }

        Some(bounds)
    }

    /// Extends this box with another one
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        BoundingBox2D::new_unchecked(
            self.lower_left_coordinate
                .min_elements(other.lower_left_coordinate),
            self.upper_right_coordinate
                .max_elements(other.upper_right_coordinate),
        )
    }
}
