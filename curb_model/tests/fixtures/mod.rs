// Each test binary uses a different subset of these
#![allow(dead_code)]

use std::collections::BTreeMap;

use feeds::{
    AddressFilter, CenterlineRecord, CurbGeometryRecord, ManualOverride, MatchCriteria,
    RegulationRecord, SweepScheduleRecord,
};
use geom::LonLat;

pub const TWENTIETH_ST: &str = "1046000";

fn gps(pts: &[(f64, f64)]) -> Vec<LonLat> {
    pts.iter().map(|(lon, lat)| LonLat::new(*lon, *lat)).collect()
}

pub fn centerline(id: &str, name: &str, pts: &[(f64, f64)]) -> CenterlineRecord {
    CenterlineRecord {
        id: id.to_string(),
        points: gps(pts),
        street_name: name.to_string(),
        left_from_address: None,
        left_to_address: None,
        right_from_address: None,
        right_to_address: None,
        zip: Some("94110".to_string()),
        admin_meta: BTreeMap::new(),
    }
}

/// Runs due east, with odd addresses on the left
pub fn twentieth_st() -> CenterlineRecord {
    let mut rec = centerline(
        TWENTIETH_ST,
        "20TH ST",
        &[(-122.410, 37.759), (-122.406, 37.759)],
    );
    rec.left_from_address = Some("3101".to_string());
    rec.left_to_address = Some("3199".to_string());
    rec.right_from_address = Some("3100".to_string());
    rec.right_to_address = Some("3198".to_string());
    rec
}

pub fn sweep(centerline_id: &str, side: &str, weekday: &str, hint: Option<&str>) -> SweepScheduleRecord {
    SweepScheduleRecord {
        centerline_id: centerline_id.to_string(),
        side: side.to_string(),
        weekday: weekday.to_string(),
        from_hour: "2".to_string(),
        to_hour: "6".to_string(),
        cardinal_hint: hint.map(|x| x.to_string()),
        limits_text: Some("Mission St  -  Valencia St".to_string()),
    }
}

pub fn regulation(pts: &[(f64, f64)], text: &str) -> RegulationRecord {
    let mut attributes = BTreeMap::new();
    attributes.insert("regulation".to_string(), text.to_string());
    attributes.insert("days".to_string(), "M-F".to_string());
    attributes.insert("hours".to_string(), "800-1800".to_string());
    attributes.insert("hrlimit".to_string(), "2".to_string());
    RegulationRecord {
        points: gps(pts),
        regulation_text: Some(text.to_string()),
        days: Some("M-F".to_string()),
        hours: Some("800-1800".to_string()),
        time_limit: Some("2".to_string()),
        permit_area: None,
        exceptions: None,
        attributes,
    }
}

/// About 10m south of the middle of 20th St
pub fn two_hour_parking() -> RegulationRecord {
    regulation(&[(-122.408, 37.75891)], "2 HR PARKING")
}

pub fn curb(centerline_id: &str, source_id: &str, pts: &[(f64, f64)]) -> CurbGeometryRecord {
    CurbGeometryRecord {
        centerline_id: centerline_id.to_string(),
        points: gps(pts),
        source_id: source_id.to_string(),
    }
}

pub fn manual_override(pattern: &str, side: Option<&str>, range: Option<(u32, u32)>) -> ManualOverride {
    let mut rule_data = BTreeMap::new();
    rule_data.insert("description".to_string(), "Tow-away for street fair".to_string());
    rule_data.insert("days".to_string(), "Sat".to_string());
    ManualOverride {
        match_criteria: MatchCriteria {
            street_pattern: pattern.to_string(),
            side: side.map(|x| x.to_string()),
            address_range: range.map(|(from, to)| AddressFilter { from, to }),
        },
        rule_data,
    }
}
