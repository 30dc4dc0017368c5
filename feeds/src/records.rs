use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use abstutil::Timer;
use geom::LonLat;

use crate::{ExtraShape, ExtraShapes, MultiPart};

/// One street centerline, the unit that every curb segment hangs off of.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CenterlineRecord {
    pub id: String,
    /// In the order the street was digitized
    pub points: Vec<LonLat>,
    pub street_name: String,
    pub left_from_address: Option<String>,
    pub left_to_address: Option<String>,
    pub right_from_address: Option<String>,
    pub right_to_address: Option<String>,
    pub zip: Option<String>,
    /// Everything else the feed said about this centerline
    pub admin_meta: BTreeMap<String, String>,
}

/// An authoritative curb line, tagged with the centerline it belongs to but not the side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurbGeometryRecord {
    pub centerline_id: String,
    pub points: Vec<LonLat>,
    pub source_id: String,
}

/// A parking regulation drawn as a free-floating point or line, with no reference to any
/// centerline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegulationRecord {
    pub points: Vec<LonLat>,
    pub regulation_text: Option<String>,
    pub days: Option<String>,
    pub hours: Option<String>,
    pub time_limit: Option<String>,
    pub permit_area: Option<String>,
    pub exceptions: Option<String>,
    /// Every property of the original feature, including the ones above
    pub attributes: BTreeMap<String, String>,
}

impl CenterlineRecord {
    pub fn from_shape(mut shape: ExtraShape) -> Result<CenterlineRecord> {
        let id = match shape.take_attr(&["cnn", "CNN", "id"]) {
            Some(id) => id,
            None => bail!("centerline has no id: {:?}", shape.attributes),
        };
        Ok(CenterlineRecord {
            street_name: shape
                .take_attr(&["streetname", "street_name", "STREETNAME"])
                .unwrap_or_default(),
            left_from_address: shape.take_attr(&["lf_fadd", "left_from_address"]),
            left_to_address: shape.take_attr(&["lf_toadd", "left_to_address"]),
            right_from_address: shape.take_attr(&["rt_fadd", "right_from_address"]),
            right_to_address: shape.take_attr(&["rt_toadd", "right_to_address"]),
            zip: shape.take_attr(&["zip_code", "zip"]),
            id,
            points: shape.points,
            admin_meta: shape.attributes,
        })
    }
}

impl CurbGeometryRecord {
    pub fn from_shape(mut shape: ExtraShape, idx: usize) -> Result<CurbGeometryRecord> {
        let centerline_id = match shape.take_attr(&["cnn", "CNN", "centerline_id"]) {
            Some(id) => id,
            None => bail!("curb #{} doesn't reference a centerline", idx),
        };
        Ok(CurbGeometryRecord {
            centerline_id,
            source_id: shape
                .take_attr(&["source_id", "globalid", "objectid"])
                .unwrap_or_else(|| format!("curb-{}", idx)),
            points: shape.points,
        })
    }
}

impl RegulationRecord {
    pub fn from_shape(shape: ExtraShape) -> RegulationRecord {
        RegulationRecord {
            regulation_text: shape.get_attr(&["regulation", "regulation_text"]),
            days: shape.get_attr(&["days"]),
            hours: shape.get_attr(&["hours"]),
            time_limit: shape.get_attr(&["hrlimit", "time_limit"]),
            permit_area: shape.get_attr(&["rpparea1", "permit_area"]),
            exceptions: shape.get_attr(&["exceptions"]),
            points: shape.points,
            attributes: shape.attributes,
        }
    }
}

pub fn load_centerlines<P: AsRef<Path>>(
    path: P,
    timer: &mut Timer,
) -> Result<Vec<CenterlineRecord>> {
    let path = path.as_ref();
    let shapes = ExtraShapes::load_geojson(path, MultiPart::Concatenate, timer)?;
    shapes
        .shapes
        .into_iter()
        .enumerate()
        .map(|(idx, shape)| {
            CenterlineRecord::from_shape(shape)
                .with_context(|| format!("feature #{} of {}", idx, path.display()))
        })
        .collect()
}

/// Curbs that don't name a centerline can't be joined to anything, so they're dropped here.
pub fn load_curbs<P: AsRef<Path>>(path: P, timer: &mut Timer) -> Result<Vec<CurbGeometryRecord>> {
    let path = path.as_ref();
    let shapes = ExtraShapes::load_geojson(path, MultiPart::Longest, timer)?;
    let mut curbs = Vec::new();
    for (idx, shape) in shapes.shapes.into_iter().enumerate() {
        match CurbGeometryRecord::from_shape(shape, idx) {
            Ok(curb) => curbs.push(curb),
            Err(err) => timer.warn(format!("Skipping curb from {}: {}", path.display(), err)),
        }
    }
    Ok(curbs)
}

pub fn load_regulations<P: AsRef<Path>>(
    path: P,
    timer: &mut Timer,
) -> Result<Vec<RegulationRecord>> {
    let shapes = ExtraShapes::load_geojson(path, MultiPart::Longest, timer)?;
    Ok(shapes
        .shapes
        .into_iter()
        .map(RegulationRecord::from_shape)
        .collect())
}
