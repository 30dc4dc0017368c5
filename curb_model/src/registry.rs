use std::collections::{BTreeMap, BTreeSet};

use anyhow::{bail, Result};

use abstutil::Timer;
use feeds::CenterlineRecord;
use geom::{FindClosest, GPSBounds, LonLat, PolyLine, Side};

use crate::{AddressRange, CenterlineID, Segment, SegmentID};

/// Every segment, two per centerline, plus a spatial index over the centerlines. Segments are
/// only created by `build`; later stages can modify them, but never add or remove any.
pub struct SegmentRegistry {
    segments: BTreeMap<SegmentID, Segment>,
    closest: FindClosest<CenterlineID>,
    gps_bounds: GPSBounds,
}

impl SegmentRegistry {
    /// Fails if any centerline has no points at all, or if two centerlines share an id. A
    /// centerline that's too short to be a line still gets both of its segments; it's just left
    /// out of the spatial index.
    pub fn build(records: &[CenterlineRecord], timer: &mut Timer) -> Result<SegmentRegistry> {
        timer.start("build segment registry");
        let result = SegmentRegistry::build_inner(records, timer);
        timer.stop("build segment registry");
        result
    }

    fn build_inner(records: &[CenterlineRecord], timer: &mut Timer) -> Result<SegmentRegistry> {
        let mut seen = BTreeSet::new();
        let mut gps_bounds = GPSBounds::new();
        for rec in records {
            if rec.points.is_empty() {
                bail!("Centerline {} has no points", rec.id);
            }
            if !seen.insert(rec.id.clone()) {
                bail!("Centerline {} appears more than once", rec.id);
            }
            for pt in &rec.points {
                gps_bounds.update(*pt);
            }
        }

        let bounds = &gps_bounds;
        let pairs = timer.parallelize(
            "make segments",
            records.iter().collect(),
            |rec: &CenterlineRecord| make_segments(rec, bounds),
        );

        let mut segments = BTreeMap::new();
        let mut closest = FindClosest::new();
        for [near, far] in pairs {
            if let Some(ref pl) = near.centerline {
                closest.add(near.id.centerline.clone(), pl);
            } else {
                timer.warn(format!(
                    "Centerline {} doesn't have two distinct points",
                    near.id.centerline
                ));
            }
            segments.insert(near.id.clone(), near);
            segments.insert(far.id.clone(), far);
        }

        Ok(SegmentRegistry {
            segments,
            closest,
            gps_bounds,
        })
    }

    pub fn lookup(&self, id: &CenterlineID, side: Side) -> Option<&Segment> {
        self.segments.get(&SegmentID::new(id.clone(), side))
    }

    /// Both sides, near first
    pub fn lookup_by_id(&self, id: &CenterlineID) -> Option<[&Segment; 2]> {
        Some([self.lookup(id, Side::Near)?, self.lookup(id, Side::Far)?])
    }

    pub fn get(&self, id: &SegmentID) -> Option<&Segment> {
        self.segments.get(id)
    }

    pub fn get_mut(&mut self, id: &SegmentID) -> Option<&mut Segment> {
        self.segments.get_mut(id)
    }

    /// In `SegmentID` order
    pub fn all_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    pub(crate) fn all_segments_mut(&mut self) -> impl Iterator<Item = &mut Segment> {
        self.segments.values_mut()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn centerline_ids(&self) -> Vec<CenterlineID> {
        self.segments
            .keys()
            .filter(|id| id.side == Side::Near)
            .map(|id| id.centerline.clone())
            .collect()
    }

    /// None for unknown or degenerate centerlines
    pub fn centerline(&self, id: &CenterlineID) -> Option<&PolyLine> {
        self.closest.get(id)
    }

    pub fn closest(&self) -> &FindClosest<CenterlineID> {
        &self.closest
    }

    pub fn gps_bounds(&self) -> &GPSBounds {
        &self.gps_bounds
    }

    /// How many centerlines couldn't be turned into a line
    pub fn num_degenerate(&self) -> usize {
        self.segments
            .values()
            .filter(|seg| seg.id.side == Side::Near && seg.centerline.is_none())
            .count()
    }

    pub fn to_gps(&self, pl: &PolyLine) -> Vec<LonLat> {
        self.gps_bounds.convert_back(pl.points())
    }
}

fn make_segments(rec: &CenterlineRecord, gps_bounds: &GPSBounds) -> [Segment; 2] {
    let centerline = PolyLine::new(gps_bounds.convert(&rec.points)).ok();
    let id = CenterlineID(rec.id.clone());
    let make = |side: Side, from: &Option<String>, to: &Option<String>| Segment {
        id: SegmentID::new(id.clone(), side),
        street_name: rec.street_name.clone(),
        zip: rec.zip.clone(),
        centerline_gps: rec.points.clone(),
        centerline: centerline.clone(),
        curb: None,
        address_range: AddressRange {
            from: from.clone(),
            to: to.clone(),
        },
        from_street: None,
        to_street: None,
        cardinal: None,
        cardinal_evidence: Vec::new(),
        rules: Vec::new(),
        display: BTreeMap::new(),
    };
    // Left addresses go with the near side
    [
        make(Side::Near, &rec.left_from_address, &rec.left_to_address),
        make(Side::Far, &rec.right_from_address, &rec.right_to_address),
    ]
}
