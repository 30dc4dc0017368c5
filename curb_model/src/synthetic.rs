use abstutil::Timer;
use geom::{Distance, PolyLine};

use crate::{CurbGeometry, CurbSource, PassStats, SegmentID, SegmentRegistry};

/// Every segment still missing a curb gets its centerline shifted toward its own side. When that
/// fails, the curb stays empty, and `Segment::drawable_line` falls back to the centerline.
pub fn generate_synthetic_curbs(
    registry: &mut SegmentRegistry,
    offset: Distance,
    stats: &mut PassStats,
    timer: &mut Timer,
) {
    let requests: Vec<(SegmentID, Option<PolyLine>)> = registry
        .all_segments()
        .filter(|seg| seg.curb.is_none())
        .map(|seg| (seg.id.clone(), seg.centerline.clone()))
        .collect();

    let results = timer.parallelize(
        "generate synthetic curbs",
        requests,
        |(id, centerline): (SegmentID, Option<PolyLine>)| {
            let side = id.side;
            (id, centerline.and_then(|pl| pl.offset(side, offset)))
        },
    );

    for (id, result) in results {
        match result {
            Some(pts) => {
                if let Some(seg) = registry.get_mut(&id) {
                    seg.curb = Some(CurbGeometry {
                        pts,
                        source: CurbSource::Synthetic,
                    });
                    stats.synthetic_generated += 1;
                }
            }
            None => {
                stats.synthetic_failed += 1;
                timer.warn(format!("Couldn't make a synthetic curb for {}", id));
            }
        }
    }
}
