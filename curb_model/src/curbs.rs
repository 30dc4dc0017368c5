use abstutil::Timer;
use feeds::CurbGeometryRecord;

use crate::classify::{classify_single, Shape};
use crate::{CenterlineID, CurbGeometry, CurbSource, PassStats, SegmentID, SegmentRegistry};

/// Attaches authoritative curb lines. The feed says which centerline each curb belongs to, but not
/// which side, so that's decided geometrically. When two curbs land on the same side, the first
/// one wins.
pub fn join_curbs(
    registry: &mut SegmentRegistry,
    records: &[CurbGeometryRecord],
    stats: &mut PassStats,
    timer: &mut Timer,
) {
    timer.start_iter("join curbs", records.len());
    for rec in records {
        timer.next();
        let centerline_id = CenterlineID(rec.centerline_id.clone());
        if registry.lookup(&centerline_id, geom::Side::Near).is_none() {
            stats.curbs_skipped_unknown_centerline += 1;
            continue;
        }

        let pts = match Shape::from_gps(&rec.points, registry.gps_bounds()) {
            Some(Shape::Line(pl)) => pl,
            _ => {
                stats.curbs_skipped_malformed += 1;
                timer.warn(format!("Curb {} isn't a line", rec.source_id));
                continue;
            }
        };
        let side = registry
            .centerline(&centerline_id)
            .and_then(|centerline| classify_single(centerline, &Shape::Line(pts.clone())));
        let side = match side {
            Some(side) => side,
            None => {
                stats.curbs_skipped_undetermined += 1;
                timer.warn(format!(
                    "Can't tell which side of {} curb {} is on",
                    centerline_id, rec.source_id
                ));
                continue;
            }
        };

        let seg = match registry.get_mut(&SegmentID::new(centerline_id, side)) {
            Some(seg) => seg,
            None => continue,
        };
        if seg.has_sourced_curb() {
            stats.curbs_skipped_duplicate += 1;
            continue;
        }
        seg.curb = Some(CurbGeometry {
            pts,
            source: CurbSource::Sourced {
                source_id: rec.source_id.clone(),
            },
        });
        stats.curbs_attached += 1;
    }
}
