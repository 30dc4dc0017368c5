use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Distance, GPSBounds, LonLat};

/// This represents world-space in meters. `y` grows southward, matching screen drawing order
/// rather than a Cartesian grid; that choice fixes which side of a line counts as `Side::Near`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pt2D {
    x: f64,
    y: f64,
}

impl Pt2D {
    pub fn new(x: f64, y: f64) -> Pt2D {
        Pt2D { x, y }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn dist_to(self, to: Pt2D) -> Distance {
        Distance::meters(((self.x - to.x).powi(2) + (self.y - to.y).powi(2)).sqrt())
    }

    pub fn approx_eq(self, other: Pt2D, threshold: Distance) -> bool {
        self.dist_to(other) <= threshold
    }

    pub fn offset(self, dx: f64, dy: f64) -> Pt2D {
        Pt2D::new(self.x + dx, self.y + dy)
    }

    pub fn to_gps(self, gps_bounds: &GPSBounds) -> LonLat {
        gps_bounds.convert_back_pt(self)
    }

    pub(crate) fn to_geo(self) -> geo::Point<f64> {
        geo::Point::new(self.x, self.y)
    }
}

impl fmt::Display for Pt2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pt2D({0}, {1})", self.x, self.y)
    }
}
