use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use abstutil::{prettyprint_usize, Timer};

/// One row of the street sweeping schedule. These already name their centerline and side, so no
/// geometry is needed to join them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepScheduleRecord {
    #[serde(alias = "CNN", alias = "cnn")]
    pub centerline_id: String,
    /// "L" or "R", or spelled out
    #[serde(alias = "CNNRightLeft", alias = "cnnrightleft")]
    pub side: String,
    #[serde(alias = "WeekDay", alias = "weekday")]
    pub weekday: String,
    #[serde(alias = "FromHour", alias = "fromhour")]
    pub from_hour: String,
    #[serde(alias = "ToHour", alias = "tohour")]
    pub to_hour: String,
    /// A compass direction describing the side, like "North" or "SE"
    #[serde(alias = "BlockSide", alias = "blockside", default)]
    pub cardinal_hint: Option<String>,
    /// The cross streets, like "Mission St  -  Valencia St"
    #[serde(alias = "Limits", alias = "limits", default)]
    pub limits_text: Option<String>,
}

/// Reads a .csv file. Extra columns are ignored; empty optional columns become `None`.
pub fn load_sweeping<P: AsRef<Path>>(
    path: P,
    timer: &mut Timer,
) -> Result<Vec<SweepScheduleRecord>> {
    let path = path.as_ref();
    timer.start(format!("read {}", path.display()));
    let result = csv::Reader::from_path(path)
        .map_err(anyhow::Error::from)
        .and_then(parse_sweeping);
    timer.stop(format!("read {}", path.display()));
    let records = result.with_context(|| format!("parsing {}", path.display()))?;
    timer.note(format!(
        "Got {} sweeping schedules from {}",
        prettyprint_usize(records.len()),
        path.display()
    ));
    Ok(records)
}

fn parse_sweeping<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<SweepScheduleRecord>> {
    let mut records = Vec::new();
    for rec in reader.deserialize() {
        let mut rec: SweepScheduleRecord = rec?;
        rec.cardinal_hint = rec.cardinal_hint.filter(|x| !x.trim().is_empty());
        rec.limits_text = rec.limits_text.filter(|x| !x.trim().is_empty());
        records.push(rec);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_headers() {
        let raw = "CNN,Corridor,Limits,CNNRightLeft,BlockSide,FullName,WeekDay,FromHour,ToHour\n\
                   1046000,20th St,Mission St  -  Valencia St,L,South,Tuesday,Tues,2,6\n\
                   1046000,20th St,,R,,Wednesday,Wed,2,6\n";
        let records = parse_sweeping(csv::Reader::from_reader(raw.as_bytes())).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].centerline_id, "1046000");
        assert_eq!(records[0].side, "L");
        assert_eq!(records[0].weekday, "Tues");
        assert_eq!(records[0].from_hour, "2");
        assert_eq!(records[0].cardinal_hint.as_deref(), Some("South"));
        assert_eq!(
            records[0].limits_text.as_deref(),
            Some("Mission St  -  Valencia St")
        );
        assert_eq!(records[1].cardinal_hint, None);
        assert_eq!(records[1].limits_text, None);
    }
}
