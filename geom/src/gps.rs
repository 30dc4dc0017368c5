use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Pt2D;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// How many meters one degree of latitude spans, on a spherical earth.
pub const METERS_PER_DEGREE_LATITUDE: f64 = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;

// longitude is x, latitude is y
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat {
            longitude: lon,
            latitude: lat,
        }
    }

    pub fn x(self) -> f64 {
        self.longitude
    }

    pub fn y(self) -> f64 {
        self.latitude
    }

    pub fn to_pt(self, gps_bounds: &GPSBounds) -> Pt2D {
        gps_bounds.convert_pt(self)
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude, self.latitude)
    }
}

/// The GPS extent of some input, and the projection between GPS and world-space.
///
/// The projection is equirectangular around the middle latitude: fine for a city, wrong for a
/// continent. The origin is the northwest corner, so `y` grows to the south. Points outside the
/// bounds still convert, to negative or oversized coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GPSBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GPSBounds {
    pub fn new() -> GPSBounds {
        GPSBounds {
            min_lon: f64::MAX,
            min_lat: f64::MAX,
            max_lon: f64::MIN,
            max_lat: f64::MIN,
        }
    }

    pub fn from(pts: &[LonLat]) -> GPSBounds {
        let mut b = GPSBounds::new();
        for pt in pts {
            b.update(*pt);
        }
        b
    }

    pub fn update(&mut self, pt: LonLat) {
        self.min_lon = self.min_lon.min(pt.longitude);
        self.max_lon = self.max_lon.max(pt.longitude);
        self.min_lat = self.min_lat.min(pt.latitude);
        self.max_lat = self.max_lat.max(pt.latitude);
    }

    pub fn is_empty(&self) -> bool {
        self.min_lon > self.max_lon || self.min_lat > self.max_lat
    }

    fn origin(&self) -> LonLat {
        if self.is_empty() {
            LonLat::new(0.0, 0.0)
        } else {
            LonLat::new(self.min_lon, self.max_lat)
        }
    }

    fn meters_per_degree_longitude(&self) -> f64 {
        let mid_lat = if self.is_empty() {
            0.0
        } else {
            (self.min_lat + self.max_lat) / 2.0
        };
        METERS_PER_DEGREE_LATITUDE * mid_lat.to_radians().cos()
    }

    pub fn convert_pt(&self, pt: LonLat) -> Pt2D {
        let origin = self.origin();
        Pt2D::new(
            (pt.longitude - origin.longitude) * self.meters_per_degree_longitude(),
            (origin.latitude - pt.latitude) * METERS_PER_DEGREE_LATITUDE,
        )
    }

    pub fn convert_back_pt(&self, pt: Pt2D) -> LonLat {
        let origin = self.origin();
        LonLat::new(
            origin.longitude + pt.x() / self.meters_per_degree_longitude(),
            origin.latitude - pt.y() / METERS_PER_DEGREE_LATITUDE,
        )
    }

    pub fn convert(&self, pts: &[LonLat]) -> Vec<Pt2D> {
        pts.iter().map(|pt| self.convert_pt(*pt)).collect()
    }

    pub fn convert_back(&self, pts: &[Pt2D]) -> Vec<LonLat> {
        pts.iter().map(|pt| self.convert_back_pt(*pt)).collect()
    }
}

impl Default for GPSBounds {
    fn default() -> Self {
        GPSBounds::new()
    }
}
