//! Decides which side of a centerline some other geometry is on.

use geom::{Distance, GPSBounds, LonLat, PolyLine, Pt2D, Side};

/// Where to sample a shape when voting
const VOTE_FRACTIONS: [f64; 3] = [0.25, 0.5, 0.75];

/// Something to classify, in world-space.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Point(Pt2D),
    Line(PolyLine),
}

impl Shape {
    /// None if there are no points. A line whose points all coincide becomes a point.
    pub fn from_gps(pts: &[LonLat], gps_bounds: &GPSBounds) -> Option<Shape> {
        match pts {
            [] => None,
            [pt] => Some(Shape::Point(gps_bounds.convert_pt(*pt))),
            _ => {
                let world = gps_bounds.convert(pts);
                let first = world[0];
                match PolyLine::new(world) {
                    Ok(pl) => Some(Shape::Line(pl)),
                    Err(_) => Some(Shape::Point(first)),
                }
            }
        }
    }

    /// A point samples to itself everywhere.
    pub fn sample(&self, fraction: f64) -> Pt2D {
        match self {
            Shape::Point(pt) => *pt,
            Shape::Line(pl) => pl.sample(fraction),
        }
    }

    pub fn dist_to(&self, pl: &PolyLine) -> Distance {
        match self {
            Shape::Point(pt) => pl.dist_to_pt(*pt),
            Shape::Line(line) => line.dist_to_polyline(pl),
        }
    }
}

/// Classifies by the shape's midpoint alone. Good enough for curb lines, which run parallel to
/// their centerline.
pub fn classify_single(centerline: &PolyLine, shape: &Shape) -> Option<Side> {
    centerline.side_of(shape.sample(0.5))
}

/// Classifies the shape at a quarter, half, and three quarters of the way along, then takes the
/// majority. Samples that can't be classified don't vote. A tie goes to whatever the middle
/// sample said; if the middle sample didn't say anything either, the answer is None.
pub fn classify_vote(centerline: &PolyLine, shape: &Shape) -> Option<Side> {
    let votes: Vec<Option<Side>> = VOTE_FRACTIONS
        .iter()
        .map(|fraction| centerline.side_of(shape.sample(*fraction)))
        .collect();
    let near = votes.iter().filter(|x| **x == Some(Side::Near)).count();
    let far = votes.iter().filter(|x| **x == Some(Side::Far)).count();
    if near > far {
        Some(Side::Near)
    } else if far > near {
        Some(Side::Far)
    } else {
        votes[1]
    }
}
