use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use geom::{Distance, Side};

/// Tuning knobs for one resolution pass. Every field has a default, so a config file only needs
/// to mention what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Regulations farther than this from every centerline stay unmatched. Measured in degrees of
    /// latitude, because that's how the upstream feeds were originally tuned.
    pub match_threshold_degrees: f64,
    /// How far to shift a centerline to fake a missing curb line.
    pub synthetic_offset_meters: f64,
    /// Keeps confidence finite when a regulation sits right on a centerline.
    pub confidence_epsilon: f64,
    /// House numbers on the near side are expected to have this parity; the far side gets the
    /// other.
    pub near_side_parity: Parity,
}

impl Default for ResolverConfig {
    fn default() -> ResolverConfig {
        ResolverConfig {
            match_threshold_degrees: 0.0005,
            synthetic_offset_meters: 5.0,
            confidence_epsilon: 1e-6,
            near_side_parity: Parity::Odd,
        }
    }
}

impl ResolverConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.match_threshold_degrees > 0.0) {
            bail!(
                "match_threshold_degrees must be positive, not {}",
                self.match_threshold_degrees
            );
        }
        if !(self.synthetic_offset_meters > 0.0) {
            bail!(
                "synthetic_offset_meters must be positive, not {}",
                self.synthetic_offset_meters
            );
        }
        if !(self.confidence_epsilon > 0.0) {
            bail!(
                "confidence_epsilon must be positive, not {}",
                self.confidence_epsilon
            );
        }
        Ok(())
    }

    pub fn match_threshold(&self) -> Distance {
        Distance::degrees_latitude(self.match_threshold_degrees)
    }

    pub fn synthetic_offset(&self) -> Distance {
        Distance::meters(self.synthetic_offset_meters)
    }

    pub fn expected_parity(&self, side: Side) -> Parity {
        match side {
            Side::Near => self.near_side_parity,
            Side::Far => self.near_side_parity.opposite(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    pub fn of(number: u32) -> Parity {
        if number % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    pub fn opposite(self) -> Parity {
        match self {
            Parity::Odd => Parity::Even,
            Parity::Even => Parity::Odd,
        }
    }
}
