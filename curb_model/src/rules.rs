use std::collections::BTreeMap;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use feeds::{RegulationRecord, SweepScheduleRecord};
use geom::{Distance, Side};

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleKind {
    StreetSweeping,
    ParkingRegulation,
    ManualOverride,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuleKind::StreetSweeping => write!(f, "Street sweeping"),
            RuleKind::ParkingRegulation => write!(f, "Parking regulation"),
            RuleKind::ManualOverride => write!(f, "Manual override"),
        }
    }
}

/// A set of weekdays. Monday is bit 0, Sunday is bit 6.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaysOfWeek(u8);

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

impl DaysOfWeek {
    pub const WEEKDAYS: DaysOfWeek = DaysOfWeek(0b0011111);
    pub const WEEKENDS: DaysOfWeek = DaysOfWeek(0b1100000);
    pub const EVERY_DAY: DaysOfWeek = DaysOfWeek(0b1111111);

    /// `day` is 0 for Monday through 6 for Sunday.
    pub fn single(day: usize) -> DaysOfWeek {
        DaysOfWeek(1 << (day % 7))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, day: usize) -> bool {
        day < 7 && self.0 & (1 << day) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: DaysOfWeek) -> DaysOfWeek {
        DaysOfWeek(self.0 | other.0)
    }

    /// Understands single days ("Tues"), lists ("M, W, F"), ranges that may wrap ("M-F", "Sa-M"),
    /// and a few phrases ("Daily", "Weekdays"). Tokens that aren't days, like "Holiday", are
    /// skipped. Returns None if no day at all is recognized.
    pub fn parse(raw: &str) -> Option<DaysOfWeek> {
        lazy_static! {
            static ref SEPARATORS: Regex = Regex::new(r"[,/&;]|\s+AND\s+|\s+").unwrap();
            static ref RANGE: Regex = Regex::new(r"^([A-Z]+)(?:-|THRU|TO)([A-Z]+)$").unwrap();
        }

        let upper = raw.trim().to_ascii_uppercase();
        // Make ranges written with spaces ("Mon - Fri", "Mon thru Fri") into one token
        let upper = upper
            .replace(" - ", "-")
            .replace(" THRU ", "THRU")
            .replace(" TO ", "TO");

        let mut days = DaysOfWeek::default();
        for token in SEPARATORS.split(&upper) {
            let token = token.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '-');
            if token.is_empty() {
                continue;
            }
            if let Some(set) = parse_day_phrase(token) {
                days = days.union(set);
            } else if let Some(day) = parse_day(token) {
                days = days.union(DaysOfWeek::single(day));
            } else if let Some(caps) = RANGE.captures(token) {
                if let (Some(start), Some(end)) = (parse_day(&caps[1]), parse_day(&caps[2])) {
                    let mut day = start;
                    loop {
                        days = days.union(DaysOfWeek::single(day));
                        if day == end {
                            break;
                        }
                        day = (day + 1) % 7;
                    }
                }
            }
        }
        if days.is_empty() {
            None
        } else {
            Some(days)
        }
    }
}

impl fmt::Display for DaysOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DaysOfWeek::EVERY_DAY => write!(f, "every day"),
            DaysOfWeek::WEEKDAYS => write!(f, "Mon-Fri"),
            _ => {
                let names: Vec<&str> = (0..7)
                    .filter(|day| self.contains(*day))
                    .map(|day| DAY_NAMES[day])
                    .collect();
                write!(f, "{}", names.join(", "))
            }
        }
    }
}

fn parse_day(token: &str) -> Option<usize> {
    match token {
        "M" | "MO" | "MON" | "MONDAY" => Some(0),
        "TU" | "TUE" | "TUES" | "TUESDAY" => Some(1),
        "W" | "WE" | "WED" | "WEDNESDAY" => Some(2),
        "TH" | "THU" | "THUR" | "THURS" | "THURSDAY" => Some(3),
        "F" | "FR" | "FRI" | "FRIDAY" => Some(4),
        "SA" | "SAT" | "SATURDAY" => Some(5),
        "SU" | "SUN" | "SUNDAY" => Some(6),
        _ => None,
    }
}

fn parse_day_phrase(token: &str) -> Option<DaysOfWeek> {
    match token {
        "DAILY" | "EVERYDAY" | "ALL" | "M-SU" => Some(DaysOfWeek::EVERY_DAY),
        "WEEKDAYS" | "WEEKDAY" => Some(DaysOfWeek::WEEKDAYS),
        "WEEKENDS" | "WEEKEND" => Some(DaysOfWeek::WEEKENDS),
        _ => None,
    }
}

/// Parses a time of day into minutes after midnight. Understands bare hours ("2", "14"),
/// military time ("800", "1830"), "H:MM", and AM/PM suffixes ("8AM", "6:30 pm"). "24" is allowed
/// as the end of a day.
pub fn parse_minute_of_day(raw: &str) -> Option<u32> {
    lazy_static! {
        static ref TIME: Regex =
            Regex::new(r"^(\d{1,2}):?(\d{2})?\s*(?:([AP])\.?M?\.?)?$").unwrap();
    }

    let upper = raw.trim().to_ascii_uppercase();
    let caps = TIME.captures(&upper)?;
    let mut hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if minute >= 60 {
        return None;
    }
    match caps.get(3).map(|m| m.as_str()) {
        Some("A") => {
            if hour == 0 || hour > 12 {
                return None;
            }
            if hour == 12 {
                hour = 0;
            }
        }
        Some(_) => {
            if hour == 0 || hour > 12 {
                return None;
            }
            if hour != 12 {
                hour += 12;
            }
        }
        None => {}
    }
    let total = hour * 60 + minute;
    if total > 24 * 60 {
        return None;
    }
    Some(total)
}

/// Splits "800-1800" or "8AM to 6PM" into start and end minutes.
pub fn parse_time_range(raw: &str) -> Option<(u32, u32)> {
    lazy_static! {
        static ref RANGE: Regex = Regex::new(r"(?i)^\s*(.+?)\s*(?:-|\bto\b)\s*(.+?)\s*$").unwrap();
    }
    let caps = RANGE.captures(raw)?;
    Some((
        parse_minute_of_day(&caps[1])?,
        parse_minute_of_day(&caps[2])?,
    ))
}

fn describe_minute(minute: u32) -> String {
    format!("{}:{:02}", minute / 60, minute % 60)
}

/// Some rule that applies to one side of a street. Once attached to a segment, it's never
/// changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleAttachment {
    pub kind: RuleKind,
    pub side: Side,
    /// Everything the source said, untouched
    pub attributes: BTreeMap<String, String>,
    pub days: Option<DaysOfWeek>,
    pub start_minute: Option<u32>,
    pub end_minute: Option<u32>,
    pub description: String,
    /// Only for rules placed by spatial matching. In (0, 1].
    pub match_confidence: Option<f64>,
    pub match_distance_meters: Option<f64>,
    /// Stable across runs; downstream interpreters key their results by this.
    pub rule_key: String,
}

impl RuleAttachment {
    fn new(
        kind: RuleKind,
        side: Side,
        attributes: BTreeMap<String, String>,
        days: Option<DaysOfWeek>,
        minutes: Option<(u32, u32)>,
        summary: Option<&str>,
    ) -> RuleAttachment {
        let mut description = kind.to_string();
        if let Some(summary) = summary {
            description = format!("{}: {}", description, summary);
        }
        if let Some(days) = days {
            description = format!("{}, {}", description, days);
        }
        if let Some((start, end)) = minutes {
            description = format!(
                "{}, {}-{}",
                description,
                describe_minute(start),
                describe_minute(end)
            );
        }

        RuleAttachment {
            rule_key: rule_key(kind, &attributes),
            kind,
            side,
            attributes,
            days,
            start_minute: minutes.map(|(start, _)| start),
            end_minute: minutes.map(|(_, end)| end),
            description,
            match_confidence: None,
            match_distance_meters: None,
        }
    }

    pub fn street_sweeping(side: Side, rec: &SweepScheduleRecord) -> RuleAttachment {
        let mut attributes = BTreeMap::new();
        attributes.insert("centerline_id".to_string(), rec.centerline_id.clone());
        attributes.insert("side".to_string(), rec.side.clone());
        attributes.insert("weekday".to_string(), rec.weekday.clone());
        attributes.insert("from_hour".to_string(), rec.from_hour.clone());
        attributes.insert("to_hour".to_string(), rec.to_hour.clone());
        if let Some(ref hint) = rec.cardinal_hint {
            attributes.insert("cardinal_hint".to_string(), hint.clone());
        }
        if let Some(ref limits) = rec.limits_text {
            attributes.insert("limits".to_string(), limits.clone());
        }

        let minutes = match (
            parse_minute_of_day(&rec.from_hour),
            parse_minute_of_day(&rec.to_hour),
        ) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        };
        RuleAttachment::new(
            RuleKind::StreetSweeping,
            side,
            attributes,
            DaysOfWeek::parse(&rec.weekday),
            minutes,
            None,
        )
    }

    pub fn parking_regulation(
        side: Side,
        rec: &RegulationRecord,
        distance: Distance,
        confidence: f64,
    ) -> RuleAttachment {
        let mut summary = rec.regulation_text.clone();
        if let Some(ref limit) = rec.time_limit {
            let limit = format!("{} hr limit", limit);
            summary = Some(match summary {
                Some(text) => format!("{} ({})", text, limit),
                None => limit,
            });
        }
        let mut rule = RuleAttachment::new(
            RuleKind::ParkingRegulation,
            side,
            rec.attributes.clone(),
            rec.days.as_deref().and_then(DaysOfWeek::parse),
            rec.hours.as_deref().and_then(parse_time_range),
            summary.as_deref(),
        );
        rule.match_confidence = Some(confidence);
        rule.match_distance_meters = Some(distance.inner_meters());
        rule
    }

    pub fn manual_override(side: Side, rule_data: &BTreeMap<String, String>) -> RuleAttachment {
        let summary = rule_data
            .get("description")
            .or_else(|| rule_data.get("regulation"));
        RuleAttachment::new(
            RuleKind::ManualOverride,
            side,
            rule_data.clone(),
            rule_data.get("days").and_then(|x| DaysOfWeek::parse(x)),
            rule_data.get("hours").and_then(|x| parse_time_range(x)),
            summary.map(|x| x.as_str()),
        )
    }
}

/// A SHA-256 over the kind and every attribute, hex-encoded. The attributes are ordered, so this
/// is stable.
pub fn rule_key(kind: RuleKind, attributes: &BTreeMap<String, String>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{:?}", kind).as_bytes());
    for (key, value) in attributes {
        // Length-prefixed
        hasher.update(format!("\n{}:{}={}:{}", key.len(), key, value.len(), value).as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(raw: &str) -> Option<Vec<usize>> {
        DaysOfWeek::parse(raw).map(|d| (0..7).filter(|day| d.contains(*day)).collect())
    }

    #[test]
    fn day_parsing() {
        assert_eq!(days("Tues"), Some(vec![1]));
        assert_eq!(days("tuesday"), Some(vec![1]));
        assert_eq!(days("M-F"), Some(vec![0, 1, 2, 3, 4]));
        assert_eq!(days("Mon - Fri"), Some(vec![0, 1, 2, 3, 4]));
        assert_eq!(days("M, W, F"), Some(vec![0, 2, 4]));
        assert_eq!(days("Sa-M"), Some(vec![0, 5, 6]));
        assert_eq!(days("Daily"), Some((0..7).collect()));
        assert_eq!(days("Weekends"), Some(vec![5, 6]));
        assert_eq!(days("Tu/Th"), Some(vec![1, 3]));
        assert_eq!(days("Holiday"), None);
        assert_eq!(days(""), None);
        assert_eq!(DaysOfWeek::parse("Wed").unwrap().bits(), 0b100);
    }

    #[test]
    fn day_display() {
        assert_eq!(DaysOfWeek::parse("M-F").unwrap().to_string(), "Mon-Fri");
        assert_eq!(DaysOfWeek::parse("Tues").unwrap().to_string(), "Tue");
        assert_eq!(DaysOfWeek::parse("Sa, Su").unwrap().to_string(), "Sat, Sun");
    }

    #[test]
    fn hour_parsing() {
        assert_eq!(parse_minute_of_day("2"), Some(120));
        assert_eq!(parse_minute_of_day("14"), Some(840));
        assert_eq!(parse_minute_of_day("800"), Some(480));
        assert_eq!(parse_minute_of_day("1830"), Some(1110));
        assert_eq!(parse_minute_of_day("6:30"), Some(390));
        assert_eq!(parse_minute_of_day("8AM"), Some(480));
        assert_eq!(parse_minute_of_day("6 pm"), Some(1080));
        assert_eq!(parse_minute_of_day("12AM"), Some(0));
        assert_eq!(parse_minute_of_day("12PM"), Some(720));
        assert_eq!(parse_minute_of_day("24"), Some(1440));
        assert_eq!(parse_minute_of_day("25"), None);
        assert_eq!(parse_minute_of_day("7:75"), None);
        assert_eq!(parse_minute_of_day("noon"), None);
    }

    #[test]
    fn time_ranges() {
        assert_eq!(parse_time_range("800-1800"), Some((480, 1080)));
        assert_eq!(parse_time_range("9AM - 6PM"), Some((540, 1080)));
        assert_eq!(parse_time_range("7am to 10am"), Some((420, 600)));
        assert_eq!(parse_time_range("anytime"), None);
    }

    #[test]
    fn stable_keys() {
        let mut attributes = BTreeMap::new();
        attributes.insert("regulation".to_string(), "2 HR PARKING".to_string());
        let key1 = rule_key(RuleKind::ParkingRegulation, &attributes);
        assert_eq!(key1.len(), 64);
        assert_eq!(key1, rule_key(RuleKind::ParkingRegulation, &attributes));
        assert_ne!(key1, rule_key(RuleKind::ManualOverride, &attributes));
        attributes.insert("days".to_string(), "M-F".to_string());
        assert_ne!(key1, rule_key(RuleKind::ParkingRegulation, &attributes));
    }

    #[test]
    fn sweeping_rule() {
        let rec = SweepScheduleRecord {
            centerline_id: "1046000".to_string(),
            side: "L".to_string(),
            weekday: "Tues".to_string(),
            from_hour: "2".to_string(),
            to_hour: "6".to_string(),
            cardinal_hint: Some("S".to_string()),
            limits_text: None,
        };
        let rule = RuleAttachment::street_sweeping(Side::Near, &rec);
        assert_eq!(rule.kind, RuleKind::StreetSweeping);
        assert_eq!(rule.days, Some(DaysOfWeek::single(1)));
        assert_eq!(rule.start_minute, Some(120));
        assert_eq!(rule.end_minute, Some(360));
        assert_eq!(rule.match_confidence, None);
        assert_eq!(rule.description, "Street sweeping, Tue, 2:00-6:00");
        assert_eq!(rule.attributes["cardinal_hint"], "S");
    }
}
