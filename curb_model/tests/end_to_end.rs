mod fixtures;

use abstutil::Timer;
use curb_model::{
    classify_single, resolve, CardinalDirection, CenterlineID, ConflictKind, CurbSource,
    DaysOfWeek, Resolution, ResolverConfig, ResolverInputs, RuleKind, Segment, Shape,
};
use geom::{Distance, Side};

use fixtures::*;

fn run(inputs: &ResolverInputs) -> Resolution {
    resolve(inputs, &ResolverConfig::default(), &mut Timer::throwaway()).unwrap()
}

fn side<'a>(resolution: &'a Resolution, id: &str, side: Side) -> &'a Segment {
    resolution
        .registry
        .lookup(&CenterlineID::from(id), side)
        .unwrap()
}

fn count(seg: &Segment, kind: RuleKind) -> usize {
    seg.rules.iter().filter(|r| r.kind == kind).count()
}

#[test]
fn sweeping_and_parking_on_20th_st() {
    let inputs = ResolverInputs {
        centerlines: vec![twentieth_st()],
        sweeping: vec![sweep(TWENTIETH_ST, "Near", "Tuesday", Some("S"))],
        regulations: vec![two_hour_parking()],
        ..Default::default()
    };
    let resolution = run(&inputs);
    let near = side(&resolution, TWENTIETH_ST, Side::Near);
    let far = side(&resolution, TWENTIETH_ST, Side::Far);

    assert_eq!(count(near, RuleKind::StreetSweeping), 1);
    assert_eq!(count(near, RuleKind::ParkingRegulation), 1);
    assert_eq!(count(far, RuleKind::StreetSweeping), 0);
    assert_eq!(count(far, RuleKind::ParkingRegulation), 0);

    let sweeping = near
        .rules
        .iter()
        .find(|r| r.kind == RuleKind::StreetSweeping)
        .unwrap();
    assert_eq!(sweeping.days, Some(DaysOfWeek::single(1)));
    assert_eq!(sweeping.side, Side::Near);
    assert_eq!(sweeping.match_confidence, None);

    let parking = near
        .rules
        .iter()
        .find(|r| r.kind == RuleKind::ParkingRegulation)
        .unwrap();
    assert_eq!(parking.attributes["regulation"], "2 HR PARKING");
    assert!(parking.match_confidence.unwrap() > 0.9);
    let dist = parking.match_distance_meters.unwrap();
    assert!((dist - 10.0).abs() < 0.5, "matched at {}m", dist);
    assert_eq!(parking.days, Some(DaysOfWeek::WEEKDAYS));
    assert_eq!(parking.start_minute, Some(480));
    assert_eq!(parking.end_minute, Some(1080));

    assert_eq!(near.cardinal, Some(CardinalDirection::S));
    assert_eq!(far.cardinal, None);
    assert_eq!(near.from_street.as_deref(), Some("Mission St"));
    assert_eq!(near.to_street.as_deref(), Some("Valencia St"));
    assert!(resolution.conflicts.is_empty());

    assert_eq!(resolution.stats.regulations_matched, 1);
    assert_eq!(resolution.stats.schedules_joined, 1);
    assert_eq!(near.display["label"], "20TH ST (Near)");
    assert_eq!(near.display["side"], "South side");
}

#[test]
fn no_curbs_or_regulations() {
    let inputs = ResolverInputs {
        centerlines: vec![twentieth_st()],
        ..Default::default()
    };
    let resolution = run(&inputs);
    assert_eq!(resolution.registry.len(), 2);
    for seg in resolution.registry.all_segments() {
        let curb = seg.curb.as_ref().unwrap();
        assert_eq!(curb.source, CurbSource::Synthetic);
        assert!(seg.rules.is_empty());
        assert_eq!(seg.cardinal, None);

        let centerline = seg.centerline.as_ref().unwrap();
        let dist = curb.pts.dist_to_polyline(centerline);
        assert!((dist - Distance::meters(5.0)).abs() < Distance::meters(0.01));
        assert_eq!(
            classify_single(centerline, &Shape::Line(curb.pts.clone())),
            Some(seg.id.side)
        );
    }
    assert_eq!(resolution.stats.synthetic_generated, 2);
    assert!(resolution.conflicts.is_empty());
}

#[test]
fn every_centerline_gets_two_segments() {
    let inputs = ResolverInputs {
        centerlines: vec![
            twentieth_st(),
            centerline(
                "1047000",
                "21ST ST",
                &[(-122.410, 37.7575), (-122.408, 37.7575), (-122.406, 37.7576)],
            ),
            centerline(
                "2001000",
                "VALENCIA ST",
                &[(-122.4215, 37.7616), (-122.4213, 37.7585)],
            ),
            // Only one distinct point
            centerline(
                "3000000",
                "NOWHERE ALY",
                &[(-122.409, 37.758), (-122.409, 37.758)],
            ),
        ],
        ..Default::default()
    };
    let resolution = run(&inputs);
    assert_eq!(resolution.registry.len(), 8);
    assert_eq!(resolution.to_records().len(), 8);
    assert_eq!(resolution.stats.degenerate_centerlines, 1);
    assert_eq!(resolution.stats.synthetic_generated, 6);
    assert_eq!(resolution.stats.synthetic_failed, 2);

    let [near, far] = resolution
        .registry
        .lookup_by_id(&CenterlineID::from("3000000"))
        .unwrap();
    assert!(near.curb.is_none());
    assert!(far.drawable_line().is_none());
    // Nothing drawable, so left out of the GeoJSON
    assert_eq!(resolution.to_geojson().features.len(), 6);
}

#[test]
fn matching_threshold() {
    let inputs = ResolverInputs {
        centerlines: vec![twentieth_st()],
        regulations: vec![
            // About 111m south; too far
            regulation(&[(-122.408, 37.758)], "TOO FAR"),
            // About 50m south
            regulation(&[(-122.408, 37.75855)], "JUST CLOSE ENOUGH"),
            // 20m past the east end, right in line with the street. Close, but no side.
            regulation(&[(-122.40577, 37.759)], "IN LINE"),
            // A line about 5.5m north
            regulation(
                &[(-122.4085, 37.75905), (-122.4075, 37.75905)],
                "NORTH SIDE",
            ),
            regulation(&[], "NO GEOMETRY"),
        ],
        ..Default::default()
    };
    let resolution = run(&inputs);
    let threshold = ResolverConfig::default().match_threshold().inner_meters();

    let mut matched = Vec::new();
    for seg in resolution.registry.all_segments() {
        for rule in &seg.rules {
            assert_eq!(rule.kind, RuleKind::ParkingRegulation);
            assert!(rule.match_distance_meters.unwrap() <= threshold);
            let confidence = rule.match_confidence.unwrap();
            assert!(confidence > 0.0 && confidence <= 1.0);
            matched.push((rule.attributes["regulation"].clone(), seg.id.side));
        }
    }
    matched.sort();
    assert_eq!(
        matched,
        vec![
            ("JUST CLOSE ENOUGH".to_string(), Side::Near),
            ("NORTH SIDE".to_string(), Side::Far),
        ]
    );
    assert_eq!(resolution.stats.regulations_matched, 2);
    assert_eq!(resolution.stats.regulations_unmatched, 2);
    assert_eq!(resolution.stats.regulations_malformed, 1);
}

#[test]
fn nearest_centerline_wins() {
    let inputs = ResolverInputs {
        centerlines: vec![
            twentieth_st(),
            // Parallel, about 33m south
            centerline(
                "1046500",
                "LINDEN ALY",
                &[(-122.410, 37.7587), (-122.406, 37.7587)],
            ),
        ],
        // About 10m south of 20th, 23m north of the alley
        regulations: vec![two_hour_parking()],
        ..Default::default()
    };
    let resolution = run(&inputs);
    assert_eq!(
        count(side(&resolution, TWENTIETH_ST, Side::Near), RuleKind::ParkingRegulation),
        1
    );
    for seg in resolution.registry.all_segments() {
        if seg.id.centerline.0 != TWENTIETH_ST {
            assert!(seg.rules.is_empty());
        }
    }
}

#[test]
fn sourced_curbs() {
    let inputs = ResolverInputs {
        centerlines: vec![twentieth_st()],
        curbs: vec![
            curb(
                TWENTIETH_ST,
                "south-curb",
                &[(-122.4099, 37.75895), (-122.4061, 37.75895)],
            ),
            curb(
                TWENTIETH_ST,
                "another-south-curb",
                &[(-122.4099, 37.75894), (-122.4061, 37.75894)],
            ),
            curb("999", "orphan", &[(-122.4099, 37.75895), (-122.4061, 37.75895)]),
            curb(TWENTIETH_ST, "just-a-point", &[(-122.408, 37.75895)]),
        ],
        ..Default::default()
    };
    let resolution = run(&inputs);
    let near = side(&resolution, TWENTIETH_ST, Side::Near);
    let far = side(&resolution, TWENTIETH_ST, Side::Far);
    assert_eq!(
        near.curb.as_ref().unwrap().source,
        CurbSource::Sourced {
            source_id: "south-curb".to_string()
        }
    );
    assert_eq!(far.curb.as_ref().unwrap().source, CurbSource::Synthetic);

    let stats = &resolution.stats;
    assert_eq!(stats.curbs_attached, 1);
    assert_eq!(stats.curbs_skipped_duplicate, 1);
    assert_eq!(stats.curbs_skipped_unknown_centerline, 1);
    assert_eq!(stats.curbs_skipped_malformed, 1);
    assert_eq!(stats.synthetic_generated, 1);

    let records = resolution.to_records();
    assert_eq!(records[0].side, Side::Near);
    let curb_pts = records[0].curb.as_ref().unwrap();
    assert!((curb_pts[0].longitude - -122.4099).abs() < 1e-7);
    assert!((curb_pts[0].latitude - 37.75895).abs() < 1e-7);
}

#[test]
fn schedules_that_dont_join() {
    let inputs = ResolverInputs {
        centerlines: vec![twentieth_st()],
        sweeping: vec![
            sweep(TWENTIETH_ST, "R", "Wed", Some("North")),
            sweep(TWENTIETH_ST, "Middle", "Wed", None),
            sweep("999", "L", "Wed", None),
            // Unparseable hints are ignored, but the rule still joins
            sweep(TWENTIETH_ST, "L", "Thu", Some("Uphill")),
        ],
        ..Default::default()
    };
    let resolution = run(&inputs);
    assert_eq!(resolution.stats.schedules_joined, 2);
    assert_eq!(resolution.stats.schedules_skipped_bad_side, 1);
    assert_eq!(resolution.stats.schedules_skipped_unknown_centerline, 1);
    let near = side(&resolution, TWENTIETH_ST, Side::Near);
    let far = side(&resolution, TWENTIETH_ST, Side::Far);
    assert_eq!(near.cardinal, None);
    assert_eq!(far.cardinal, Some(CardinalDirection::N));
    assert_eq!(count(near, RuleKind::StreetSweeping), 1);
    assert_eq!(count(far, RuleKind::StreetSweeping), 1);
}

#[test]
fn cardinal_conflicts() {
    let mut bad_addresses = twentieth_st();
    bad_addresses.left_from_address = Some("3100".to_string());
    let inputs = ResolverInputs {
        centerlines: vec![bad_addresses],
        sweeping: vec![
            sweep(TWENTIETH_ST, "L", "Tues", Some("S")),
            sweep(TWENTIETH_ST, "L", "Thurs", Some("N")),
            sweep(TWENTIETH_ST, "R", "Wed", Some("E")),
        ],
        ..Default::default()
    };
    let resolution = run(&inputs);
    let kinds: Vec<ConflictKind> = resolution.conflicts.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ConflictKind::AddressParityMismatch,
            ConflictKind::ConflictingCardinalsSameSide,
        ]
    );
    assert_eq!(resolution.conflicts[0].addresses, vec![3100]);
    assert_eq!(resolution.conflicts[0].sides, vec![Side::Near]);
    assert_eq!(
        resolution.conflicts[1].labels,
        vec![CardinalDirection::S, CardinalDirection::N]
    );
    // Never resolved automatically
    assert_eq!(side(&resolution, TWENTIETH_ST, Side::Near).cardinal, None);
    assert_eq!(
        side(&resolution, TWENTIETH_ST, Side::Far).cardinal,
        Some(CardinalDirection::E)
    );
    assert_eq!(
        resolution
            .stats
            .conflicts
            .get(ConflictKind::ConflictingCardinalsSameSide),
        1
    );
}

#[test]
fn mismatched_sides() {
    let inputs = ResolverInputs {
        centerlines: vec![twentieth_st()],
        sweeping: vec![
            sweep(TWENTIETH_ST, "L", "Tues", Some("S")),
            sweep(TWENTIETH_ST, "R", "Wed", Some("E")),
        ],
        ..Default::default()
    };
    let resolution = run(&inputs);
    assert_eq!(resolution.conflicts.len(), 1);
    let conflict = &resolution.conflicts[0];
    assert_eq!(conflict.kind, ConflictKind::OppositeSideMismatch);
    assert_eq!(
        conflict.labels,
        vec![CardinalDirection::S, CardinalDirection::E]
    );
    // Both labels are kept
    assert_eq!(
        side(&resolution, TWENTIETH_ST, Side::Near).cardinal,
        Some(CardinalDirection::S)
    );
    assert_eq!(
        side(&resolution, TWENTIETH_ST, Side::Far).cardinal,
        Some(CardinalDirection::E)
    );
}

#[test]
fn overrides_only_add() {
    let inputs = ResolverInputs {
        centerlines: vec![
            twentieth_st(),
            centerline(
                "2001000",
                "VALENCIA ST",
                &[(-122.4215, 37.7616), (-122.4213, 37.7585)],
            ),
        ],
        sweeping: vec![sweep(TWENTIETH_ST, "L", "Tues", Some("S"))],
        regulations: vec![two_hour_parking()],
        overrides: vec![
            manual_override("^20th", Some("L"), None),
            manual_override("20TH ST", None, Some((3150, 3160))),
            manual_override("20TH ST", None, Some((5000, 6000))),
            manual_override("(unclosed", None, None),
        ],
        ..Default::default()
    };
    let resolution = run(&inputs);
    let near = side(&resolution, TWENTIETH_ST, Side::Near);
    let far = side(&resolution, TWENTIETH_ST, Side::Far);

    let kinds: Vec<RuleKind> = near.rules.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RuleKind::StreetSweeping,
            RuleKind::ParkingRegulation,
            RuleKind::ManualOverride,
            RuleKind::ManualOverride,
        ]
    );
    let far_kinds: Vec<RuleKind> = far.rules.iter().map(|r| r.kind).collect();
    assert_eq!(far_kinds, vec![RuleKind::ManualOverride]);
    assert_eq!(far.rules[0].days, Some(DaysOfWeek::single(5)));

    for seg in resolution.registry.all_segments() {
        if seg.id.centerline.0 != TWENTIETH_ST {
            assert!(seg.rules.is_empty());
        }
    }
    assert_eq!(resolution.stats.overrides_applied, 3);
    assert_eq!(resolution.stats.overrides_invalid, 1);
}

#[test]
fn structural_problems_abort() {
    let inputs = ResolverInputs {
        centerlines: vec![twentieth_st(), twentieth_st()],
        ..Default::default()
    };
    assert!(resolve(&inputs, &ResolverConfig::default(), &mut Timer::throwaway()).is_err());

    let inputs = ResolverInputs {
        centerlines: vec![centerline("1", "EMPTY ST", &[])],
        ..Default::default()
    };
    assert!(resolve(&inputs, &ResolverConfig::default(), &mut Timer::throwaway()).is_err());

    let bad_config = ResolverConfig {
        synthetic_offset_meters: 0.0,
        ..Default::default()
    };
    let inputs = ResolverInputs {
        centerlines: vec![twentieth_st()],
        ..Default::default()
    };
    assert!(resolve(&inputs, &bad_config, &mut Timer::throwaway()).is_err());
}
