//! Planar geometry for curb resolution. Everything here works in a world-space measured in meters;
//! `GPSBounds` converts to and from longitude/latitude.

mod bounds;
mod distance;
mod error;
mod find_closest;
mod gps;
mod line;
mod polyline;
mod pt;
mod side;

pub use crate::bounds::Bounds;
pub use crate::distance::Distance;
pub use crate::error::DegenerateGeometry;
pub use crate::find_closest::FindClosest;
pub use crate::gps::{GPSBounds, LonLat, METERS_PER_DEGREE_LATITUDE};
pub use crate::line::{line_intersection, Line};
pub use crate::polyline::{PolyLine, TANGENT_DELTA};
pub use crate::pt::Pt2D;
pub use crate::side::Side;

/// Two points closer than this are considered the same.
pub const EPSILON_DIST: Distance = Distance::const_meters(0.0001);
