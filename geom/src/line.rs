use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DegenerateGeometry, Distance, Pt2D, EPSILON_DIST};

/// A line segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line(Pt2D, Pt2D);

impl Line {
    /// Creates a line segment between two points, which must not be the same
    pub fn new(pt1: Pt2D, pt2: Pt2D) -> Result<Line, DegenerateGeometry> {
        if pt1.dist_to(pt2) <= EPSILON_DIST {
            return Err(DegenerateGeometry::new(format!(
                "line from {} to {} is too short",
                pt1, pt2
            )));
        }
        Ok(Line(pt1, pt2))
    }

    // Only for callers that already guarantee distinct points, like PolyLine.
    pub(crate) fn unchecked(pt1: Pt2D, pt2: Pt2D) -> Line {
        Line(pt1, pt2)
    }

    pub fn pt1(&self) -> Pt2D {
        self.0
    }

    pub fn pt2(&self) -> Pt2D {
        self.1
    }

    pub fn length(&self) -> Distance {
        self.pt1().dist_to(self.pt2())
    }

    fn delta(&self) -> (f64, f64) {
        (
            self.pt2().x() - self.pt1().x(),
            self.pt2().y() - self.pt1().y(),
        )
    }

    /// Returns the point this far along the line, clamped to the endpoints.
    pub fn dist_along(&self, dist: Distance) -> Pt2D {
        let percent = (dist / self.length()).max(0.0).min(1.0);
        self.percent_along(percent)
    }

    pub fn percent_along(&self, percent: f64) -> Pt2D {
        let (dx, dy) = self.delta();
        Pt2D::new(self.pt1().x() + percent * dx, self.pt1().y() + percent * dy)
    }

    /// Finds the closest point on the segment to `pt`, and how far along the segment it is, as a
    /// fraction in [0, 1].
    pub fn project_pt(&self, pt: Pt2D) -> (f64, Pt2D) {
        let (dx, dy) = self.delta();
        let len_squared = dx * dx + dy * dy;
        let t = ((pt.x() - self.pt1().x()) * dx + (pt.y() - self.pt1().y()) * dy) / len_squared;
        let t = t.max(0.0).min(1.0);
        (t, self.percent_along(t))
    }

    /// Unit vector pointing from pt1 to pt2.
    pub fn direction(&self) -> (f64, f64) {
        let (dx, dy) = self.delta();
        let len = self.length().inner_meters();
        (dx / len, dy / len)
    }

    /// Shifts the line perpendicularly. Positive widths move toward `Side::Near`, negative toward
    /// `Side::Far`.
    pub fn shift_either_direction(&self, width: Distance) -> Line {
        let (ux, uy) = self.direction();
        // Rotating the direction by +90 degrees. With y growing southward, this normal always has
        // a positive cross product against the direction.
        let (nx, ny) = (-uy, ux);
        let w = width.inner_meters();
        Line(
            self.pt1().offset(nx * w, ny * w),
            self.pt2().offset(nx * w, ny * w),
        )
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Line({} to {})", self.pt1(), self.pt2())
    }
}

/// Where the infinite extensions of two lines meet. None if they're parallel.
pub fn line_intersection(l1: &Line, l2: &Line) -> Option<Pt2D> {
    let (x1, y1) = (l1.pt1().x(), l1.pt1().y());
    let (x2, y2) = (l1.pt2().x(), l1.pt2().y());
    let (x3, y3) = (l2.pt1().x(), l2.pt1().y());
    let (x4, y4) = (l2.pt2().x(), l2.pt2().y());

    let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if denom.abs() < 1e-12 {
        return None;
    }
    let a = x1 * y2 - y1 * x2;
    let b = x3 * y4 - y3 * x4;
    Some(Pt2D::new(
        (a * (x3 - x4) - (x1 - x2) * b) / denom,
        (a * (y3 - y4) - (y1 - y2) * b) / denom,
    ))
}
