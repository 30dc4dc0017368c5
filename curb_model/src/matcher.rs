use abstutil::Timer;
use feeds::RegulationRecord;
use geom::Distance;

use crate::classify::{classify_vote, Shape};
use crate::{PassStats, ResolverConfig, RuleAttachment, SegmentID, SegmentRegistry};

/// Where one regulation ended up.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchOutcome {
    Matched {
        segment: SegmentID,
        distance: Distance,
    },
    /// Nothing close enough, or nothing close enough agreed on a side
    Unmatched,
    /// No usable geometry
    Malformed,
}

/// Finds the nearest segment to a regulation. Every centerline within the threshold is a
/// candidate, but only on the side its majority vote picks; candidates without a clear side are
/// dropped rather than guessed. The closest survivor wins, with ties broken by `SegmentID`.
pub fn find_match(
    registry: &SegmentRegistry,
    rec: &RegulationRecord,
    threshold: Distance,
) -> MatchOutcome {
    let shape = match Shape::from_gps(&rec.points, registry.gps_bounds()) {
        Some(shape) => shape,
        None => return MatchOutcome::Malformed,
    };
    let candidates = match shape {
        Shape::Point(pt) => registry.closest().all_close_pts(pt, threshold),
        Shape::Line(ref pl) => registry.closest().all_close_to_polyline(pl, threshold),
    };

    let mut best: Option<(Distance, SegmentID)> = None;
    for (centerline_id, dist) in candidates {
        if dist > threshold {
            continue;
        }
        let side = match registry
            .centerline(&centerline_id)
            .and_then(|centerline| classify_vote(centerline, &shape))
        {
            Some(side) => side,
            None => continue,
        };
        let candidate = (dist, SegmentID::new(centerline_id, side));
        if best.as_ref().map(|b| candidate < *b).unwrap_or(true) {
            best = Some(candidate);
        }
    }

    match best {
        Some((distance, segment)) => MatchOutcome::Matched { segment, distance },
        None => MatchOutcome::Unmatched,
    }
}

/// Closer is more confident, capped at 1. Distance is measured in degrees of latitude here, like
/// the threshold.
pub fn confidence(distance: Distance, epsilon: f64) -> f64 {
    (1.0 / (distance.to_degrees_latitude() + epsilon)).min(1.0)
}

/// Matches every regulation in parallel against the unchanging registry, then attaches the
/// results one at a time in the order of the input, so the output doesn't depend on thread
/// scheduling.
pub fn match_regulations(
    registry: &mut SegmentRegistry,
    records: &[RegulationRecord],
    config: &ResolverConfig,
    stats: &mut PassStats,
    timer: &mut Timer,
) {
    let threshold = config.match_threshold();
    let outcomes = {
        let registry: &SegmentRegistry = registry;
        timer.parallelize(
            "match regulations",
            records.iter().collect(),
            |rec: &RegulationRecord| find_match(registry, rec, threshold),
        )
    };

    for (rec, outcome) in records.iter().zip(outcomes) {
        match outcome {
            MatchOutcome::Matched { segment, distance } => {
                if let Some(seg) = registry.get_mut(&segment) {
                    seg.rules.push(RuleAttachment::parking_regulation(
                        segment.side,
                        rec,
                        distance,
                        confidence(distance, config.confidence_epsilon),
                    ));
                    stats.regulations_matched += 1;
                }
            }
            MatchOutcome::Unmatched => {
                stats.regulations_unmatched += 1;
            }
            MatchOutcome::Malformed => {
                stats.regulations_malformed += 1;
                timer.warn(format!(
                    "Regulation {:?} has no usable geometry",
                    rec.regulation_text
                ));
            }
        }
    }
}
