//! Raw input feeds for curb resolution. Everything upstream (street centerlines, curb lines,
//! street sweeping schedules, parking regulations, hand-written overrides) is read into plain
//! record types here. Nothing in this crate knows about segments or sides of the street.

#[macro_use]
extern crate log;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Result};
use geojson::{GeoJson, JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

use abstutil::{prettyprint_usize, Timer};
use geom::LonLat;

mod overrides;
mod records;
mod sweeping;

pub use self::overrides::{load_overrides, AddressFilter, ManualOverride, MatchCriteria};
pub use self::records::{
    load_centerlines, load_curbs, load_regulations, CenterlineRecord, CurbGeometryRecord,
    RegulationRecord,
};
pub use self::sweeping::{load_sweeping, SweepScheduleRecord};

/// Some dataset imported from GeoJSON, before the attributes are interpreted.
#[derive(Serialize, Deserialize)]
pub struct ExtraShapes {
    pub shapes: Vec<ExtraShape>,
}

/// A single object in the dataset.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtraShape {
    /// The object has a different inferred shape depending on the points:
    /// - no points means the geometry was missing or of an unsupported type
    /// - a single point just represents a position
    /// - multiple points are interpreted as a PolyLine
    pub points: Vec<LonLat>,
    /// Arbitrary key/value pairs associated with this object; no known schema.
    pub attributes: BTreeMap<String, String>,
}

/// What to do with a MultiLineString.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MultiPart {
    /// Join all of the parts end to end, in order.
    Concatenate,
    /// Just keep the part with the most points.
    Longest,
}

impl ExtraShape {
    /// Removes and returns the first attribute present under any of the keys. Empty values count
    /// as missing.
    pub fn take_attr(&mut self, keys: &[&str]) -> Option<String> {
        for key in keys {
            if let Some(value) = self.attributes.remove(*key) {
                if !value.trim().is_empty() {
                    return Some(value.trim().to_string());
                }
            }
        }
        None
    }

    /// Like `take_attr`, but leaves the attributes alone.
    pub fn get_attr(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.attributes.get(*key))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .map(|value| value.to_string())
    }
}

impl ExtraShapes {
    /// Parses a .geojson file. Every feature becomes one shape, even ones with missing or
    /// unsupported geometry, so that callers can count them.
    pub fn load_geojson<P: AsRef<Path>>(
        path: P,
        multi_part: MultiPart,
        timer: &mut Timer,
    ) -> Result<ExtraShapes> {
        let path = path.as_ref();
        timer.start(format!("read {}", path.display()));
        let result = abstio::slurp_file(path).and_then(|bytes| {
            let raw_string = String::from_utf8(bytes)?;
            ExtraShapes::parse_geojson(&raw_string, multi_part)
        });
        timer.stop(format!("read {}", path.display()));
        let shapes = result?;

        let no_geometry = shapes.shapes.iter().filter(|s| s.points.is_empty()).count();
        timer.note(format!(
            "Got {} shapes from {}; {} have no usable geometry",
            prettyprint_usize(shapes.shapes.len()),
            path.display(),
            prettyprint_usize(no_geometry)
        ));
        Ok(shapes)
    }

    pub fn parse_geojson(raw_string: &str, multi_part: MultiPart) -> Result<ExtraShapes> {
        let geojson = raw_string.parse::<GeoJson>()?;
        let features = match geojson {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => bail!("Expected features, not a bare geometry"),
        };

        let mut shapes = Vec::new();
        for feature in features {
            let points = match feature.geometry {
                Some(geometry) => extract_points(geometry.value, multi_part),
                None => Vec::new(),
            };
            let attributes = feature
                .properties
                .map(flatten_properties)
                .unwrap_or_default();
            shapes.push(ExtraShape { points, attributes });
        }
        Ok(ExtraShapes { shapes })
    }
}

fn extract_points(value: geojson::Value, multi_part: MultiPart) -> Vec<LonLat> {
    match value {
        geojson::Value::Point(pt) => parse_pt(&pt).into_iter().collect(),
        geojson::Value::LineString(line) => parse_line(&line),
        geojson::Value::MultiLineString(parts) => match multi_part {
            MultiPart::Concatenate => parts.iter().flat_map(|line| parse_line(line)).collect(),
            MultiPart::Longest => parts
                .iter()
                .map(|line| parse_line(line))
                // Ties keep the earlier part
                .fold(Vec::new(), |best, pts| {
                    if pts.len() > best.len() {
                        pts
                    } else {
                        best
                    }
                }),
        },
        geojson::Value::MultiPoint(_) => unsupported("MultiPoint"),
        geojson::Value::Polygon(_) => unsupported("Polygon"),
        geojson::Value::MultiPolygon(_) => unsupported("MultiPolygon"),
        geojson::Value::GeometryCollection(_) => unsupported("GeometryCollection"),
    }
}

fn unsupported(geometry_type: &str) -> Vec<LonLat> {
    debug!("Skipping unsupported {} geometry", geometry_type);
    Vec::new()
}

fn parse_line(line: &[Vec<f64>]) -> Vec<LonLat> {
    line.iter().filter_map(|pt| parse_pt(pt)).collect()
}

fn parse_pt(pt: &[f64]) -> Option<LonLat> {
    // A third Z component sometimes shows up. Just ignore it.
    if pt.len() < 2 || !pt[0].is_finite() || !pt[1].is_finite() {
        return None;
    }
    Some(LonLat::new(pt[0], pt[1]))
}

fn flatten_properties(properties: JsonObject) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    for (key, value) in properties {
        let value = match value {
            JsonValue::Null => continue,
            JsonValue::String(s) => s,
            JsonValue::Bool(b) => b.to_string(),
            JsonValue::Number(n) => n.to_string(),
            other => other.to_string(),
        };
        attributes.insert(key, value);
    }
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_become_strings() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [-122.4, 37.7]},
                    "properties": {"cnn": 123, "name": "MARKET ST", "blank": null, "flag": true}
                }
            ]
        }"#;
        let shapes = ExtraShapes::parse_geojson(raw, MultiPart::Longest).unwrap();
        assert_eq!(shapes.shapes.len(), 1);
        let shape = &shapes.shapes[0];
        assert_eq!(shape.points, vec![LonLat::new(-122.4, 37.7)]);
        assert_eq!(shape.attributes.get("cnn").unwrap(), "123");
        assert_eq!(shape.attributes.get("name").unwrap(), "MARKET ST");
        assert_eq!(shape.attributes.get("flag").unwrap(), "true");
        assert!(!shape.attributes.contains_key("blank"));
    }

    #[test]
    fn multi_line_strings() {
        let raw = r#"{
            "type": "Feature",
            "geometry": {"type": "MultiLineString", "coordinates": [
                [[0.0, 0.0], [1.0, 0.0]],
                [[1.0, 0.0], [2.0, 0.0], [3.0, 0.0]]
            ]},
            "properties": {}
        }"#;
        let joined = ExtraShapes::parse_geojson(raw, MultiPart::Concatenate).unwrap();
        assert_eq!(joined.shapes[0].points.len(), 5);
        let longest = ExtraShapes::parse_geojson(raw, MultiPart::Longest).unwrap();
        assert_eq!(
            longest.shapes[0].points,
            vec![
                LonLat::new(1.0, 0.0),
                LonLat::new(2.0, 0.0),
                LonLat::new(3.0, 0.0)
            ]
        );
    }

    #[test]
    fn unsupported_geometry_keeps_the_feature() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]},
                    "properties": {"regulation": "NO PARKING"}
                },
                {"type": "Feature", "geometry": null, "properties": null}
            ]
        }"#;
        let shapes = ExtraShapes::parse_geojson(raw, MultiPart::Longest).unwrap();
        assert_eq!(shapes.shapes.len(), 2);
        assert!(shapes.shapes.iter().all(|s| s.points.is_empty()));
        assert_eq!(
            shapes.shapes[0].get_attr(&["regulation"]),
            Some("NO PARKING".to_string())
        );
    }

    #[test]
    fn attribute_aliases() {
        let mut shape = ExtraShape {
            points: Vec::new(),
            attributes: vec![
                ("id".to_string(), "  ".to_string()),
                ("cnn".to_string(), "42".to_string()),
            ]
            .into_iter()
            .collect(),
        };
        assert_eq!(shape.get_attr(&["id", "cnn"]), Some("42".to_string()));
        assert_eq!(shape.take_attr(&["cnn", "id"]), Some("42".to_string()));
        assert!(!shape.attributes.contains_key("cnn"));
        assert_eq!(shape.take_attr(&["id"]), None);
    }
}
