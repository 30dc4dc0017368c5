use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// One of the two physical sides of a line. Which is which comes from the sign of a cross
/// product in world-space, not from any driving convention; the feeds conventionally label
/// `Near` as "L" and `Far` as "R".
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "L")]
    Near,
    #[serde(rename = "R")]
    Far,
}

impl Side {
    pub fn all() -> [Side; 2] {
        [Side::Near, Side::Far]
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Near => Side::Far,
            Side::Far => Side::Near,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Near => "L",
            Side::Far => "R",
        }
    }

    pub fn parse(raw: &str) -> Result<Side> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "l" | "left" | "near" => Ok(Side::Near),
            "r" | "right" | "far" => Ok(Side::Far),
            _ => bail!("unknown side of street {:?}", raw),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Near => write!(f, "Near"),
            Side::Far => write!(f, "Far"),
        }
    }
}
