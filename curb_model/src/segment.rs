use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use geom::{LonLat, PolyLine, Side};

use crate::{CardinalDirection, RuleAttachment};

/// The upstream identifier of a street centerline.
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CenterlineID(pub String);

impl fmt::Display for CenterlineID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CenterlineID {
    fn from(id: &str) -> CenterlineID {
        CenterlineID(id.to_string())
    }
}

/// One side of one centerline. Ordering is by centerline, then near before far.
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentID {
    pub centerline: CenterlineID,
    pub side: Side,
}

impl fmt::Display for SegmentID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SegmentID({}, {})", self.centerline, self.side)
    }
}

impl SegmentID {
    pub fn new(centerline: CenterlineID, side: Side) -> SegmentID {
        SegmentID { centerline, side }
    }

    pub fn both_sides(centerline: CenterlineID) -> [SegmentID; 2] {
        [
            SegmentID::new(centerline.clone(), Side::Near),
            SegmentID::new(centerline, Side::Far),
        ]
    }

    pub fn other_side(&self) -> SegmentID {
        SegmentID::new(self.centerline.clone(), self.side.opposite())
    }
}

/// House numbers along one side of a centerline, exactly as the feed wrote them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl AddressRange {
    /// The parseable, non-zero house numbers. Zero is how the feed says "no address".
    pub fn numbers(&self) -> Vec<u32> {
        [&self.from, &self.to]
            .into_iter()
            .flatten()
            .filter_map(|x| x.trim().parse::<u32>().ok())
            .filter(|x| *x != 0)
            .collect()
    }

    /// (lowest, highest), if there's any number at all
    pub fn bounds(&self) -> Option<(u32, u32)> {
        let numbers = self.numbers();
        let lo = numbers.iter().min()?;
        let hi = numbers.iter().max()?;
        Some((*lo, *hi))
    }

    pub fn overlaps(&self, from: u32, to: u32) -> bool {
        let (other_lo, other_hi) = (from.min(to), from.max(to));
        match self.bounds() {
            Some((lo, hi)) => lo <= other_hi && other_lo <= hi,
            None => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CurbSource {
    /// Came from an upstream curb feed
    Sourced { source_id: String },
    /// Shifted from the centerline; only approximately where the curb is
    Synthetic,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CurbGeometry {
    pub pts: PolyLine,
    pub source: CurbSource,
}

/// One side of a street, between two intersections. This is what rules attach to.
#[derive(Clone, Debug)]
pub struct Segment {
    pub id: SegmentID,
    pub street_name: String,
    pub zip: Option<String>,
    /// The centerline as the feed described it
    pub centerline_gps: Vec<LonLat>,
    /// None if the centerline has fewer than two distinct points
    pub centerline: Option<PolyLine>,
    pub curb: Option<CurbGeometry>,
    pub address_range: AddressRange,
    pub from_street: Option<String>,
    pub to_street: Option<String>,

    /// Only set from evidence, never guessed from geometry
    pub cardinal: Option<CardinalDirection>,
    /// Every compass label any feed used for this side, in the order they were seen
    pub cardinal_evidence: Vec<CardinalDirection>,

    /// Appended to by each stage; nothing is ever removed
    pub rules: Vec<RuleAttachment>,
    /// Labels for people to read. Nothing downstream should parse these.
    pub display: BTreeMap<String, String>,
}

impl Segment {
    /// The best line to draw this segment with. Falls back to the centerline when there's no curb.
    pub fn drawable_line(&self) -> Option<&PolyLine> {
        self.curb
            .as_ref()
            .map(|curb| &curb.pts)
            .or(self.centerline.as_ref())
    }

    pub fn has_sourced_curb(&self) -> bool {
        matches!(
            self.curb,
            Some(CurbGeometry {
                source: CurbSource::Sourced { .. },
                ..
            })
        )
    }

    pub(crate) fn refresh_display(&mut self) {
        self.display.clear();
        let name = if self.street_name.is_empty() {
            format!("centerline {}", self.id.centerline)
        } else {
            self.street_name.clone()
        };
        self.display
            .insert("label".to_string(), format!("{} ({})", name, self.id.side));
        if let Some(dir) = self.cardinal {
            self.display
                .insert("side".to_string(), format!("{} side", dir.long_name()));
        }
        if let (Some(from), Some(to)) = (&self.from_street, &self.to_street) {
            self.display
                .insert("between".to_string(), format!("{} to {}", from, to));
        }
        if let Some((lo, hi)) = self.address_range.bounds() {
            self.display
                .insert("addresses".to_string(), format!("{}-{}", lo, hi));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(from: &str, to: &str) -> AddressRange {
        AddressRange {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
        }
    }

    #[test]
    fn address_numbers() {
        assert_eq!(range("3101", "3199").numbers(), vec![3101, 3199]);
        assert_eq!(range("0", "0").numbers(), Vec::<u32>::new());
        assert_eq!(range("abc", " 12 ").numbers(), vec![12]);
        assert_eq!(AddressRange::default().bounds(), None);
        assert_eq!(range("3199", "3101").bounds(), Some((3101, 3199)));
    }

    #[test]
    fn address_overlap() {
        let r = range("3100", "3198");
        assert!(r.overlaps(3150, 3300));
        assert!(r.overlaps(3300, 3198));
        assert!(!r.overlaps(3200, 3300));
        assert!(!AddressRange::default().overlaps(0, 10_000));
    }

    #[test]
    fn ids_order_near_first() {
        let mut ids = vec![
            SegmentID::new("2".into(), Side::Far),
            SegmentID::new("1".into(), Side::Far),
            SegmentID::new("2".into(), Side::Near),
            SegmentID::new("1".into(), Side::Near),
        ];
        ids.sort();
        let expected: Vec<SegmentID> = SegmentID::both_sides("1".into())
            .into_iter()
            .chain(SegmentID::both_sides("2".into()))
            .collect();
        assert_eq!(ids, expected);
        assert_eq!(ids[0].other_side(), ids[1]);
    }
}
