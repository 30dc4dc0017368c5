use std::fmt;

use geo::prelude::EuclideanDistance;
use serde::{Deserialize, Serialize};

use crate::{
    line_intersection, Bounds, DegenerateGeometry, Distance, GPSBounds, Line, Pt2D, Side,
    EPSILON_DIST,
};

/// When estimating a tangent, sample this far on either side of the point, as a fraction of the
/// polyline's length.
pub const TANGENT_DELTA: f64 = 0.001;

// A miter join further than this many shift widths from the corner is a spike; bevel instead.
const MITER_LIMIT: f64 = 4.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolyLine {
    pts: Vec<Pt2D>,
    length: Distance,
}

enum Joint {
    Miter(Pt2D),
    Bevel,
}

impl PolyLine {
    /// Adjacent duplicate points are squished down first. Fails if fewer than two distinct points
    /// remain.
    pub fn new(mut pts: Vec<Pt2D>) -> Result<PolyLine, DegenerateGeometry> {
        pts.dedup_by(|a, b| a.approx_eq(*b, EPSILON_DIST));
        if pts.len() < 2 {
            return Err(DegenerateGeometry::new(format!(
                "a polyline needs at least 2 distinct points, got {}",
                pts.len()
            )));
        }
        let length = pts.windows(2).fold(Distance::ZERO, |so_far, pair| {
            so_far + pair[0].dist_to(pair[1])
        });
        Ok(PolyLine { pts, length })
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    pub fn length(&self) -> Distance {
        self.length
    }

    pub fn first_pt(&self) -> Pt2D {
        self.pts[0]
    }

    pub fn last_pt(&self) -> Pt2D {
        self.pts[self.pts.len() - 1]
    }

    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.pts
            .windows(2)
            .map(|pair| Line::unchecked(pair[0], pair[1]))
    }

    pub fn reversed(&self) -> PolyLine {
        let mut pts = self.pts.clone();
        pts.reverse();
        PolyLine {
            pts,
            length: self.length,
        }
    }

    /// The point this far along the polyline, clamped to the ends.
    pub fn dist_along(&self, dist: Distance) -> Pt2D {
        let mut dist_left = dist.max(Distance::ZERO);
        for l in self.lines() {
            let len = l.length();
            if dist_left <= len {
                return l.dist_along(dist_left);
            }
            dist_left = dist_left - len;
        }
        self.last_pt()
    }

    /// The point at some fraction of the arc length, clamped to [0, 1].
    pub fn sample(&self, fraction: f64) -> Pt2D {
        self.dist_along(self.length * fraction.max(0.0).min(1.0))
    }

    pub fn middle(&self) -> Pt2D {
        self.sample(0.5)
    }

    /// Finds the closest point on the polyline to `pt`. Returns how far along it is as a fraction
    /// of the arc length, and the point itself. Ties go to the earliest line.
    pub fn project(&self, pt: Pt2D) -> (f64, Pt2D) {
        let mut best: Option<(Distance, Distance, Pt2D)> = None;
        let mut dist_so_far = Distance::ZERO;
        for l in self.lines() {
            let (t, projected) = l.project_pt(pt);
            let dist = projected.dist_to(pt);
            if best.as_ref().map(|(d, _, _)| dist < *d).unwrap_or(true) {
                best = Some((dist, dist_so_far + l.length() * t, projected));
            }
            dist_so_far += l.length();
        }
        match best {
            Some((_, along, projected)) => (along / self.length, projected),
            None => (0.0, self.first_pt()),
        }
    }

    /// Estimates the direction of travel at a fraction of the arc length, using a forward
    /// difference over `TANGENT_DELTA` on either side.
    pub fn tangent_at(&self, t: f64) -> Result<(f64, f64), DegenerateGeometry> {
        let before = self.sample(t - TANGENT_DELTA);
        let after = self.sample(t + TANGENT_DELTA);
        let (dx, dy) = (after.x() - before.x(), after.y() - before.y());
        if dx == 0.0 && dy == 0.0 {
            return Err(DegenerateGeometry::new(format!(
                "zero-length tangent at {} along {}",
                t, self
            )));
        }
        Ok((dx, dy))
    }

    /// Which side of this polyline is `pt` on? None if it can't be told: the tangent vanishes, or
    /// the point sits exactly on the line.
    pub fn side_of(&self, pt: Pt2D) -> Option<Side> {
        let (t, projected) = self.project(pt);
        let (tx, ty) = self.tangent_at(t).ok()?;
        let (vx, vy) = (pt.x() - projected.x(), pt.y() - projected.y());
        let cross = tx * vy - ty * vx;
        if cross > 0.0 {
            Some(Side::Near)
        } else if cross < 0.0 {
            Some(Side::Far)
        } else {
            None
        }
    }

    /// Produces a parallel line `dist` away on the given side.
    ///
    /// Things to remember about shifting polylines:
    /// - the length before and after probably don't match up
    /// - tight bends collapse. Pieces that flip direction relative to their source line are cut
    ///   out, and only the longest remaining contiguous part is returned.
    /// - the result starts at whichever end is closer to this polyline's start
    pub fn offset(&self, side: Side, dist: Distance) -> Option<PolyLine> {
        let width = match side {
            Side::Near => dist,
            Side::Far => -dist,
        };
        let originals: Vec<Line> = self.lines().collect();
        let shifted: Vec<Line> = originals
            .iter()
            .map(|l| l.shift_either_direction(width))
            .collect();

        let joints: Vec<Joint> = shifted
            .windows(2)
            .map(|pair| match line_intersection(&pair[0], &pair[1]) {
                Some(pt) if pt.dist_to(pair[0].pt2()) <= width.abs() * MITER_LIMIT => {
                    Joint::Miter(pt)
                }
                _ => Joint::Bevel,
            })
            .collect();

        // Each piece remembers the original line it came from. Bevel connectors don't have one.
        let mut pieces: Vec<(Pt2D, Pt2D, Option<usize>)> = Vec::new();
        for (idx, l) in shifted.iter().enumerate() {
            let start = match idx.checked_sub(1).map(|j| &joints[j]) {
                Some(Joint::Miter(pt)) => *pt,
                _ => l.pt1(),
            };
            let end = match joints.get(idx) {
                Some(Joint::Miter(pt)) => *pt,
                _ => l.pt2(),
            };
            pieces.push((start, end, Some(idx)));
            if let Some(Joint::Bevel) = joints.get(idx) {
                pieces.push((l.pt2(), shifted[idx + 1].pt1(), None));
            }
        }

        let mut parts: Vec<Vec<Pt2D>> = Vec::new();
        let mut current: Vec<Pt2D> = Vec::new();
        for (start, end, src) in pieces {
            let flipped = match src {
                Some(idx) => {
                    let (ux, uy) = originals[idx].direction();
                    (end.x() - start.x()) * ux + (end.y() - start.y()) * uy <= 0.0
                }
                None => false,
            };
            if flipped {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
                continue;
            }
            if current.is_empty() {
                current.push(start);
            }
            current.push(end);
        }
        if !current.is_empty() {
            parts.push(current);
        }

        let best = parts
            .into_iter()
            .filter_map(|pts| PolyLine::new(pts).ok())
            .max_by_key(|pl| pl.length())?;
        let start = self.first_pt();
        if best.last_pt().dist_to(start) < best.first_pt().dist_to(start) {
            Some(best.reversed())
        } else {
            Some(best)
        }
    }

    pub fn dist_to_pt(&self, pt: Pt2D) -> Distance {
        Distance::meters(pt.to_geo().euclidean_distance(&self.to_geo()))
    }

    /// The minimum distance between any two points of the polylines; zero if they cross.
    pub fn dist_to_polyline(&self, other: &PolyLine) -> Distance {
        Distance::meters(self.to_geo().euclidean_distance(&other.to_geo()))
    }

    pub fn get_bounds(&self) -> Bounds {
        Bounds::from(&self.pts)
    }

    /// Optionally translates world-space back to GPS.
    pub fn to_geojson(&self, gps: Option<&GPSBounds>) -> geojson::Geometry {
        let mut pts = Vec::new();
        if let Some(gps) = gps {
            for pt in gps.convert_back(&self.pts) {
                pts.push(vec![pt.x(), pt.y()]);
            }
        } else {
            for pt in &self.pts {
                pts.push(vec![pt.x(), pt.y()]);
            }
        }
        geojson::Geometry::new(geojson::Value::LineString(pts))
    }

    pub(crate) fn to_geo(&self) -> geo::LineString<f64> {
        self.pts
            .iter()
            .map(|pt| (pt.x(), pt.y()))
            .collect::<Vec<_>>()
            .into()
    }
}

impl fmt::Display for PolyLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "PolyLine::new(vec![")?;
        for pt in &self.pts {
            writeln!(f, "  Pt2D::new({}, {}),", pt.x(), pt.y())?;
        }
        write!(f, "])")
    }
}
