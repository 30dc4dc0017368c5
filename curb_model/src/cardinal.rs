use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use abstutil::{Counter, Timer};
use geom::Side;

use crate::{CenterlineID, Parity, ResolverConfig, Segment, SegmentID, SegmentRegistry};

/// A compass label for one side of a street, like "the north side of 20th St".
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardinalDirection {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl CardinalDirection {
    pub fn all() -> Vec<CardinalDirection> {
        vec![
            CardinalDirection::N,
            CardinalDirection::S,
            CardinalDirection::E,
            CardinalDirection::W,
            CardinalDirection::NE,
            CardinalDirection::NW,
            CardinalDirection::SE,
            CardinalDirection::SW,
        ]
    }

    pub fn opposite(self) -> CardinalDirection {
        match self {
            CardinalDirection::N => CardinalDirection::S,
            CardinalDirection::S => CardinalDirection::N,
            CardinalDirection::E => CardinalDirection::W,
            CardinalDirection::W => CardinalDirection::E,
            CardinalDirection::NE => CardinalDirection::SW,
            CardinalDirection::SW => CardinalDirection::NE,
            CardinalDirection::NW => CardinalDirection::SE,
            CardinalDirection::SE => CardinalDirection::NW,
        }
    }

    pub fn long_name(self) -> &'static str {
        match self {
            CardinalDirection::N => "North",
            CardinalDirection::S => "South",
            CardinalDirection::E => "East",
            CardinalDirection::W => "West",
            CardinalDirection::NE => "Northeast",
            CardinalDirection::NW => "Northwest",
            CardinalDirection::SE => "Southeast",
            CardinalDirection::SW => "Southwest",
        }
    }

    /// Accepts abbreviations and full words in any case, with or without spaces or hyphens:
    /// "N", "north", "North East", "south-west", "SW".
    pub fn parse(raw: &str) -> Result<CardinalDirection> {
        let squished: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        for dir in CardinalDirection::all() {
            if squished == format!("{:?}", dir) || squished == dir.long_name().to_ascii_uppercase()
            {
                return Ok(dir);
            }
        }
        bail!("unknown compass direction {:?}", raw)
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConflictKind {
    /// A house number on one side has the parity expected on the other side
    AddressParityMismatch,
    /// One side was called both a direction and its opposite
    ConflictingCardinalsSameSide,
    /// Both sides have a direction, but they aren't opposites
    OppositeSideMismatch,
}

/// Evidence that disagrees with itself. These are reported for a person to look at; nothing
/// tries to fix them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardinalConflict {
    pub kind: ConflictKind,
    pub centerline: CenterlineID,
    pub sides: Vec<Side>,
    pub labels: Vec<CardinalDirection>,
    pub addresses: Vec<u32>,
    pub message: String,
}

/// Stamps a cardinal direction on every segment that has consistent evidence, and reports
/// everything inconsistent. Has to run after every rule and hint is attached.
pub fn resolve_cardinals(
    registry: &mut SegmentRegistry,
    config: &ResolverConfig,
    timer: &mut Timer,
) -> Vec<CardinalConflict> {
    timer.start("resolve cardinal directions");
    let mut conflicts = Vec::new();
    for centerline in registry.centerline_ids() {
        let mut resolved = Vec::new();
        for id in SegmentID::both_sides(centerline.clone()) {
            let seg = match registry.get_mut(&id) {
                Some(seg) => seg,
                None => continue,
            };
            if let Some(conflict) = check_parity(seg, config.expected_parity(id.side)) {
                conflicts.push(conflict);
            }
            match pick_cardinal(&seg.cardinal_evidence) {
                Ok(dir) => {
                    seg.cardinal = dir;
                }
                Err(labels) => {
                    seg.cardinal = None;
                    conflicts.push(CardinalConflict {
                        kind: ConflictKind::ConflictingCardinalsSameSide,
                        centerline: centerline.clone(),
                        sides: vec![id.side],
                        message: format!(
                            "{} was called {}",
                            id,
                            labels
                                .iter()
                                .map(|x| x.to_string())
                                .collect::<Vec<_>>()
                                .join(" and ")
                        ),
                        labels,
                        addresses: Vec::new(),
                    });
                }
            }
            resolved.push(seg.cardinal);
        }

        if let [Some(near), Some(far)] = resolved[..] {
            if near.opposite() != far {
                conflicts.push(CardinalConflict {
                    kind: ConflictKind::OppositeSideMismatch,
                    centerline: centerline.clone(),
                    sides: vec![Side::Near, Side::Far],
                    labels: vec![near, far],
                    addresses: Vec::new(),
                    message: format!(
                        "{} has {} on the near side and {} on the far side",
                        centerline, near, far
                    ),
                });
            }
        }
    }

    for conflict in &conflicts {
        timer.warn(conflict.message.clone());
    }
    timer.stop("resolve cardinal directions");
    conflicts
}

fn check_parity(seg: &Segment, expected: Parity) -> Option<CardinalConflict> {
    let wrong: Vec<u32> = seg
        .address_range
        .numbers()
        .into_iter()
        .filter(|x| Parity::of(*x) != expected)
        .collect();
    if wrong.is_empty() {
        return None;
    }
    Some(CardinalConflict {
        kind: ConflictKind::AddressParityMismatch,
        centerline: seg.id.centerline.clone(),
        sides: vec![seg.id.side],
        labels: seg.cardinal_evidence.clone(),
        message: format!(
            "{} should have {:?} addresses, but has {:?}",
            seg.id, expected, wrong
        ),
        addresses: wrong,
    })
}

/// The most common label, with ties going to whichever was seen first. If any label shows up
/// along with its opposite, returns the clashing pair instead.
fn pick_cardinal(
    evidence: &[CardinalDirection],
) -> Result<Option<CardinalDirection>, Vec<CardinalDirection>> {
    for dir in evidence {
        if evidence.contains(&dir.opposite()) {
            return Err(vec![*dir, dir.opposite()]);
        }
    }

    let mut counts = Counter::new();
    for dir in evidence {
        counts.inc(*dir);
    }
    let mut best: Option<CardinalDirection> = None;
    for dir in evidence {
        if best
            .map(|b| counts.get(*dir) > counts.get(b))
            .unwrap_or(true)
        {
            best = Some(*dir);
        }
    }
    Ok(best)
}
