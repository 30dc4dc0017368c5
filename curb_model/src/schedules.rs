use lazy_static::lazy_static;
use regex::Regex;

use abstutil::Timer;
use feeds::SweepScheduleRecord;
use geom::Side;

use crate::{CardinalDirection, CenterlineID, PassStats, RuleAttachment, SegmentID, SegmentRegistry};

/// Sweeping schedules already name their centerline and side, so they join directly. Along the
/// way, they're the main source of compass labels and cross streets.
pub fn join_schedules(
    registry: &mut SegmentRegistry,
    records: &[SweepScheduleRecord],
    stats: &mut PassStats,
    timer: &mut Timer,
) {
    timer.start_iter("join sweeping schedules", records.len());
    for rec in records {
        timer.next();
        let side = match Side::parse(&rec.side) {
            Ok(side) => side,
            Err(err) => {
                stats.schedules_skipped_bad_side += 1;
                timer.warn(format!("Sweeping on {}: {}", rec.centerline_id, err));
                continue;
            }
        };
        let id = SegmentID::new(CenterlineID(rec.centerline_id.clone()), side);
        let seg = match registry.get_mut(&id) {
            Some(seg) => seg,
            None => {
                stats.schedules_skipped_unknown_centerline += 1;
                continue;
            }
        };

        seg.rules.push(RuleAttachment::street_sweeping(side, rec));
        stats.schedules_joined += 1;

        if let Some(ref hint) = rec.cardinal_hint {
            match CardinalDirection::parse(hint) {
                Ok(dir) => seg.cardinal_evidence.push(dir),
                Err(err) => timer.warn(format!("Sweeping on {}: {}", id, err)),
            }
        }
        if seg.from_street.is_none() && seg.to_street.is_none() {
            if let Some((from, to)) = rec.limits_text.as_deref().and_then(parse_limits) {
                seg.from_street = Some(from);
                seg.to_street = Some(to);
            }
        }
    }
}

/// Splits "Mission St  -  Valencia St" into the two cross streets.
pub fn parse_limits(raw: &str) -> Option<(String, String)> {
    lazy_static! {
        static ref SPACED_DASH: Regex = Regex::new(r"\s+-\s+").unwrap();
    }
    let mut parts: Vec<&str> = SPACED_DASH.split(raw).collect();
    if parts.len() != 2 {
        // Hyphenated street names are rare, but a bare dash between names is common
        parts = raw.split('-').collect();
    }
    match parts[..] {
        [from, to] if !from.trim().is_empty() && !to.trim().is_empty() => {
            Some((from.trim().to_string(), to.trim().to_string()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_streets() {
        assert_eq!(
            parse_limits("Mission St  -  Valencia St"),
            Some(("Mission St".to_string(), "Valencia St".to_string()))
        );
        assert_eq!(
            parse_limits("Mission St-Valencia St"),
            Some(("Mission St".to_string(), "Valencia St".to_string()))
        );
        assert_eq!(
            parse_limits("Lower Great Hwy - Sloat Blvd"),
            Some(("Lower Great Hwy".to_string(), "Sloat Blvd".to_string()))
        );
        assert_eq!(parse_limits("Mission St"), None);
        assert_eq!(parse_limits(" - Valencia St"), None);
        assert_eq!(parse_limits("A - B - C"), None);
    }
}
