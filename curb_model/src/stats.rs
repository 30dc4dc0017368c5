use serde::{Deserialize, Serialize};

use abstutil::{prettyprint_usize, Counter};

use crate::ConflictKind;

/// What happened during one pass, for whoever has to figure out why a segment is missing a rule.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PassStats {
    pub centerlines_read: usize,
    pub segments_built: usize,
    pub degenerate_centerlines: usize,

    pub curbs_attached: usize,
    pub curbs_skipped_undetermined: usize,
    pub curbs_skipped_unknown_centerline: usize,
    pub curbs_skipped_duplicate: usize,
    pub curbs_skipped_malformed: usize,

    pub synthetic_generated: usize,
    pub synthetic_failed: usize,

    pub schedules_joined: usize,
    pub schedules_skipped_unknown_centerline: usize,
    pub schedules_skipped_bad_side: usize,

    pub regulations_matched: usize,
    pub regulations_unmatched: usize,
    pub regulations_malformed: usize,

    /// Counts rules added, not overrides read
    pub overrides_applied: usize,
    pub overrides_invalid: usize,

    pub conflicts: Counter<ConflictKind>,
}

impl PassStats {
    pub fn describe(&self) -> Vec<String> {
        let n = prettyprint_usize;
        let mut lines = vec![
            format!(
                "{} centerlines became {} segments ({} degenerate)",
                n(self.centerlines_read),
                n(self.segments_built),
                n(self.degenerate_centerlines)
            ),
            format!(
                "Curbs: {} attached, skipped {} undetermined, {} unknown centerline, {} \
                 duplicate, {} malformed",
                n(self.curbs_attached),
                n(self.curbs_skipped_undetermined),
                n(self.curbs_skipped_unknown_centerline),
                n(self.curbs_skipped_duplicate),
                n(self.curbs_skipped_malformed)
            ),
            format!(
                "Synthetic curbs: {} generated, {} failed",
                n(self.synthetic_generated),
                n(self.synthetic_failed)
            ),
            format!(
                "Sweeping schedules: {} joined, skipped {} unknown centerline, {} bad side",
                n(self.schedules_joined),
                n(self.schedules_skipped_unknown_centerline),
                n(self.schedules_skipped_bad_side)
            ),
            format!(
                "Regulations: {} matched, {} unmatched, {} malformed",
                n(self.regulations_matched),
                n(self.regulations_unmatched),
                n(self.regulations_malformed)
            ),
            format!(
                "Overrides: {} rules added, {} invalid",
                n(self.overrides_applied),
                n(self.overrides_invalid)
            ),
        ];
        for (kind, count) in self.conflicts.borrow() {
            lines.push(format!("Conflicts: {} {:?}", n(*count), kind));
        }
        lines
    }
}
