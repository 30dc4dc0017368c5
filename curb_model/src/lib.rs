//! Turns raw street centerlines, curb lines, sweeping schedules, and parking regulations into one
//! canonical set of curb segments: one per side of every centerline, each with its geometry,
//! compass label, and the rules that apply to it.
//!
//! All geometry is handled in world-space meters; see `geom`. Side `Near` is the one where a
//! point's cross product with the centerline's direction is positive, which, since world-space y
//! grows to the south, is the right-hand side when following the centerline as drawn.

#[macro_use]
extern crate log;

pub mod cardinal;
pub mod classify;
mod config;
mod curbs;
pub mod matcher;
mod output;
mod overrides;
mod pass;
mod registry;
mod rules;
mod schedules;
mod segment;
mod stats;
mod synthetic;

pub use crate::cardinal::{CardinalConflict, CardinalDirection, ConflictKind};
pub use crate::classify::{classify_single, classify_vote, Shape};
pub use crate::config::{Parity, ResolverConfig};
pub use crate::output::ResolvedSegment;
pub use crate::overrides::OverrideFilter;
pub use crate::pass::{resolve, Resolution, ResolverInputs};
pub use crate::registry::SegmentRegistry;
pub use crate::rules::{
    parse_minute_of_day, parse_time_range, rule_key, DaysOfWeek, RuleAttachment, RuleKind,
};
pub use crate::schedules::parse_limits;
pub use crate::segment::{AddressRange, CenterlineID, CurbGeometry, CurbSource, Segment, SegmentID};
pub use crate::stats::PassStats;
