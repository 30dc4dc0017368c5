use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use abstutil::{prettyprint_usize, Timer};

/// A hand-written correction. It adds a rule to every segment matching the criteria; it never
/// removes or replaces anything.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManualOverride {
    pub match_criteria: MatchCriteria,
    /// Copied verbatim into the rule's attributes
    pub rule_data: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchCriteria {
    /// A regular expression, matched case-insensitively against the street name
    pub street_pattern: String,
    /// "L" or "R". Missing means both sides.
    #[serde(default)]
    pub side: Option<String>,
    /// Only segments whose address range overlaps this one
    #[serde(default)]
    pub address_range: Option<AddressFilter>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddressFilter {
    pub from: u32,
    pub to: u32,
}

/// Reads a JSON array of overrides. A missing file just means there are none.
pub fn load_overrides<P: AsRef<Path>>(path: P, timer: &mut Timer) -> Result<Vec<ManualOverride>> {
    let path = path.as_ref();
    let overrides: Vec<ManualOverride> = abstio::maybe_read_json(path)?.unwrap_or_default();
    timer.note(format!(
        "Got {} manual overrides from {}",
        prettyprint_usize(overrides.len()),
        path.display()
    ));
    Ok(overrides)
}
