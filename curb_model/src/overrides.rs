use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};

use abstutil::Timer;
use feeds::ManualOverride;
use geom::Side;

use crate::{PassStats, RuleAttachment, Segment, SegmentID, SegmentRegistry};

/// A `ManualOverride`'s criteria, ready to test segments against.
pub struct OverrideFilter {
    street: Regex,
    side: Option<Side>,
    addresses: Option<(u32, u32)>,
}

impl OverrideFilter {
    pub fn new(rule: &ManualOverride) -> Result<OverrideFilter> {
        let criteria = &rule.match_criteria;
        let street = RegexBuilder::new(&criteria.street_pattern)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("bad street_pattern {:?}", criteria.street_pattern))?;
        let side = match criteria.side {
            Some(ref side) => Some(Side::parse(side)?),
            None => None,
        };
        Ok(OverrideFilter {
            street,
            side,
            addresses: criteria.address_range.map(|r| (r.from, r.to)),
        })
    }

    pub fn matches(&self, seg: &Segment) -> bool {
        if !self.street.is_match(&seg.street_name) {
            return false;
        }
        if let Some(side) = self.side {
            if seg.id.side != side {
                return false;
            }
        }
        if let Some((from, to)) = self.addresses {
            if !seg.address_range.overlaps(from, to) {
                return false;
            }
        }
        true
    }
}

/// Applied last. Overrides only ever add rules; whatever was already attached stays. A broken
/// override is skipped and counted, without affecting the others.
pub fn apply_overrides(
    registry: &mut SegmentRegistry,
    overrides: &[ManualOverride],
    stats: &mut PassStats,
    timer: &mut Timer,
) {
    timer.start("apply manual overrides");
    for (idx, rule) in overrides.iter().enumerate() {
        let filter = match OverrideFilter::new(rule) {
            Ok(filter) => filter,
            Err(err) => {
                stats.overrides_invalid += 1;
                timer.warn(format!("Skipping override #{}: {:#}", idx, err));
                continue;
            }
        };

        let matches: Vec<SegmentID> = registry
            .all_segments()
            .filter(|seg| filter.matches(seg))
            .map(|seg| seg.id.clone())
            .collect();
        if matches.is_empty() {
            timer.warn(format!("Override #{} doesn't match any segment", idx));
        }
        for id in matches {
            if let Some(seg) = registry.get_mut(&id) {
                seg.rules
                    .push(RuleAttachment::manual_override(id.side, &rule.rule_data));
                stats.overrides_applied += 1;
            }
        }
    }
    timer.stop("apply manual overrides");
}
