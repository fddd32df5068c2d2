use float_cmp::ApproxEq;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::{Add, Div, Mul, Sub},
};

/// A longitude/latitude pair in degrees (WGS 84). `x` is longitude, `y` is latitude.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, PartialOrd, Serialize, Default)]
#[repr(C)]
pub struct Coordinate2D {
    pub x: f64,
    pub y: f64,
}

impl Coordinate2D {
    /// Creates a new coordinate
    ///
    /// # Examples
    ///
    /// ```
    /// use urbanview_datatypes::primitives::Coordinate2D;
    ///
    /// let c = Coordinate2D::new(1.0, 0.0);
    ///
    /// assert_eq!(c.x, 1.0);
    /// assert_eq!(c.y, 0.0);
    /// ```
    ///
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn min_elements(&self, other: Self) -> Self {
        Coordinate2D {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
        }
    }

    #[must_use]
    pub fn max_elements(&self, other: Self) -> Self {
        Coordinate2D {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
        }
    }

    pub fn euclidean_distance(&self, other: &Self) -> f64 {
        let x_diff = self.x - other.x;
        let y_diff = self.y - other.y;
        let sq_sum = x_diff * x_diff + y_diff * y_diff;
        sq_sum.sqrt()
    }
}

impl fmt::Display for Coordinate2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Coordinate2D {
    /// # Examples
    ///
    /// ```
    /// use urbanview_datatypes::primitives::Coordinate2D;
    ///
    /// let c = Coordinate2D::from((5.0, 4.2));
    ///
    /// assert_eq!(c.x, 5.0);
    /// assert_eq!(c.y, 4.2);
    /// ```
    ///
    fn from(tuple: (f64, f64)) -> Self {
        let (x, y) = tuple;
        Self { x, y }
    }
}

impl From<[f64; 2]> for Coordinate2D {
    fn from(array: [f64; 2]) -> Self {
        let [x, y] = array;
        Self { x, y }
    }
}

impl From<Coordinate2D> for (f64, f64) {
    fn from(coordinate: Coordinate2D) -> (f64, f64) {
        (coordinate.x, coordinate.y)
    }
}

impl From<Coordinate2D> for [f64; 2] {
    fn from(coordinate: Coordinate2D) -> [f64; 2] {
        [coordinate.x, coordinate.y]
    }
}

impl From<Coordinate2D> for geo::Coord<f64> {
    fn from(coordinate: Coordinate2D) -> geo::Coord<f64> {
        Self::from(&coordinate)
    }
}

impl From<&Coordinate2D> for geo::Coord<f64> {
    fn from(coordinate: &Coordinate2D) -> geo::Coord<f64> {
        geo::Coord {
            x: coordinate.x,
            y: coordinate.y,
        }
    }
}

impl From<geo::Coord<f64>> for Coordinate2D {
    fn from(coordinate: geo::Coord<f64>) -> Coordinate2D {
        Coordinate2D {
            x: coordinate.x,
            y: coordinate.y,
        }
    }
}

impl From<geo::Point<f64>> for Coordinate2D {
    fn from(point: geo::Point<f64>) -> Coordinate2D {
        Coordinate2D {
            x: point.0.x,
            y: point.0.y,
        }
    }
}

impl From<Coordinate2D> for geo::Point<f64> {
    fn from(coordinate: Coordinate2D) -> geo::Point<f64> {
        geo::Point::new(coordinate.x, coordinate.y)
    }
}

impl From<&Coordinate2D> for wkt::types::Coord<f64> {
    fn from(coordinate: &Coordinate2D) -> wkt::types::Coord<f64> {
        wkt::types::Coord {
            x: coordinate.x,
            y: coordinate.y,
            z: None,
            m: None,
        }
    }
}

impl Add for Coordinate2D {
    type Output = Coordinate2D;

    fn add(self, rhs: Self) -> Self::Output {
        Coordinate2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Add<f64> for Coordinate2D {
    type Output = Coordinate2D;

    fn add(self, rhs: f64) -> Self::Output {
        Coordinate2D::new(self.x + rhs, self.y + rhs)
    }
}

impl Sub for Coordinate2D {
    type Output = Coordinate2D;

    fn sub(self, rhs: Self) -> Self::Output {
        Coordinate2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub<f64> for Coordinate2D {
    type Output = Coordinate2D;

    fn sub(self, rhs: f64) -> Self::Output {
        Coordinate2D::new(self.x - rhs, self.y - rhs)
    }
}

impl Mul<f64> for Coordinate2D {
    type Output = Coordinate2D;

    fn mul(self, rhs: f64) -> Self::Output {
        Coordinate2D::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Coordinate2D {
    type Output = Coordinate2D;

    fn div(self, rhs: f64) -> Self::Output {
        Coordinate2D::new(self.x / rhs, self.y / rhs)
    }
}

impl ApproxEq for Coordinate2D {
    type Margin = float_cmp::F64Margin;

    fn approx_eq<M>(self, other: Self, margin: M) -> bool
    where
        M: Into<Self::Margin>,
    {
        let m = margin.into();
        self.x.approx_eq(other.x, m) && self.y.approx_eq(other.y, m)
    }
}
