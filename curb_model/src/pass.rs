use anyhow::Result;

use abstutil::Timer;
use feeds::{
    CenterlineRecord, CurbGeometryRecord, ManualOverride, RegulationRecord, SweepScheduleRecord,
};

use crate::cardinal::resolve_cardinals;
use crate::curbs::join_curbs;
use crate::matcher::match_regulations;
use crate::overrides::apply_overrides;
use crate::schedules::join_schedules;
use crate::synthetic::generate_synthetic_curbs;
use crate::{CardinalConflict, PassStats, ResolverConfig, SegmentRegistry};

/// Everything a pass reads, already loaded.
#[derive(Clone, Debug, Default)]
pub struct ResolverInputs {
    pub centerlines: Vec<CenterlineRecord>,
    pub curbs: Vec<CurbGeometryRecord>,
    pub sweeping: Vec<SweepScheduleRecord>,
    pub regulations: Vec<RegulationRecord>,
    pub overrides: Vec<ManualOverride>,
}

/// The result of a pass: every segment with everything attached, plus what looked wrong along the
/// way.
pub struct Resolution {
    pub registry: SegmentRegistry,
    pub conflicts: Vec<CardinalConflict>,
    pub stats: PassStats,
}

/// Runs one full offline pass. The stages always run in the same order, and nothing depends on
/// thread scheduling, so the same inputs always produce the same output.
pub fn resolve(
    inputs: &ResolverInputs,
    config: &ResolverConfig,
    timer: &mut Timer,
) -> Result<Resolution> {
    config.validate()?;
    timer.start("resolve curb segments");
    let result = resolve_inner(inputs, config, timer);
    timer.stop("resolve curb segments");

    let resolution = result?;
    for line in resolution.stats.describe() {
        info!("{}", line);
    }
    Ok(resolution)
}

fn resolve_inner(
    inputs: &ResolverInputs,
    config: &ResolverConfig,
    timer: &mut Timer,
) -> Result<Resolution> {
    let mut stats = PassStats::default();

    let mut registry = SegmentRegistry::build(&inputs.centerlines, timer)?;
    stats.centerlines_read = inputs.centerlines.len();
    stats.segments_built = registry.len();
    stats.degenerate_centerlines = registry.num_degenerate();

    join_curbs(&mut registry, &inputs.curbs, &mut stats, timer);
    generate_synthetic_curbs(&mut registry, config.synthetic_offset(), &mut stats, timer);
    join_schedules(&mut registry, &inputs.sweeping, &mut stats, timer);
    match_regulations(
        &mut registry,
        &inputs.regulations,
        config,
        &mut stats,
        timer,
    );
    apply_overrides(&mut registry, &inputs.overrides, &mut stats, timer);

    let conflicts = resolve_cardinals(&mut registry, config, timer);
    for conflict in &conflicts {
        stats.conflicts.inc(conflict.kind);
    }
    for seg in registry.all_segments_mut() {
        seg.refresh_display();
    }

    Ok(Resolution {
        registry,
        conflicts,
        stats,
    })
}
