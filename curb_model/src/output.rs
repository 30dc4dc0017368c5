use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use geom::{LonLat, Side};

use crate::{
    AddressRange, CardinalDirection, CenterlineID, CurbSource, Resolution, RuleAttachment, Segment,
};

/// One finished segment, in GPS coordinates, ready to be stored or served.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSegment {
    pub centerline_id: CenterlineID,
    pub side: Side,
    pub street_name: String,
    pub zip: Option<String>,
    pub from_street: Option<String>,
    pub to_street: Option<String>,
    pub address_range: AddressRange,
    pub cardinal: Option<CardinalDirection>,
    pub centerline: Vec<LonLat>,
    pub curb: Option<Vec<LonLat>>,
    pub curb_source: Option<CurbSource>,
    pub rules: Vec<RuleAttachment>,
    pub display: BTreeMap<String, String>,
}

impl Resolution {
    /// In `SegmentID` order
    pub fn to_records(&self) -> Vec<ResolvedSegment> {
        self.registry
            .all_segments()
            .map(|seg| self.to_record(seg))
            .collect()
    }

    fn to_record(&self, seg: &Segment) -> ResolvedSegment {
        ResolvedSegment {
            centerline_id: seg.id.centerline.clone(),
            side: seg.id.side,
            street_name: seg.street_name.clone(),
            zip: seg.zip.clone(),
            from_street: seg.from_street.clone(),
            to_street: seg.to_street.clone(),
            address_range: seg.address_range.clone(),
            cardinal: seg.cardinal,
            centerline: seg.centerline_gps.clone(),
            curb: seg
                .curb
                .as_ref()
                .map(|curb| self.registry.to_gps(&curb.pts)),
            curb_source: seg.curb.as_ref().map(|curb| curb.source.clone()),
            rules: seg.rules.clone(),
            display: seg.display.clone(),
        }
    }

    /// One LineString per segment, drawn along the curb when there is one. Segments with nothing
    /// drawable are left out.
    pub fn to_geojson(&self) -> geojson::FeatureCollection {
        let gps = self.registry.gps_bounds();
        let mut features = Vec::new();
        for seg in self.registry.all_segments() {
            let line = match seg.drawable_line() {
                Some(line) => line,
                None => continue,
            };
            let mut properties = serde_json::Map::new();
            properties.insert(
                "centerline_id".to_string(),
                seg.id.centerline.to_string().into(),
            );
            properties.insert("side".to_string(), seg.id.side.label().into());
            properties.insert("street_name".to_string(), seg.street_name.clone().into());
            if let Some(dir) = seg.cardinal {
                properties.insert("cardinal".to_string(), dir.to_string().into());
            }
            let source = match seg.curb.as_ref().map(|curb| &curb.source) {
                Some(CurbSource::Sourced { .. }) => "sourced",
                Some(CurbSource::Synthetic) => "synthetic",
                None => "centerline",
            };
            properties.insert("geometry_source".to_string(), source.into());
            properties.insert("num_rules".to_string(), seg.rules.len().into());
            for (key, value) in &seg.display {
                properties.insert(format!("display_{}", key), value.clone().into());
            }

            features.push(geojson::Feature {
                bbox: None,
                geometry: Some(line.to_geojson(Some(gps))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            });
        }
        geojson::FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}
