//! Length units. Geometry is always millimetres; other units exist only at
//! the input and output boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

const MM_PER_FOOT: f64 = 304.8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Mm,
    Cm,
    M,
    Ft,
    In,
}

impl Unit {
    pub const ALL: [Unit; 5] = [Unit::Mm, Unit::Cm, Unit::M, Unit::Ft, Unit::In];

    /// Millimetres in one of this unit.
    #[must_use]
    pub fn mm_factor(self) -> f64 {
        match self {
            Unit::Mm => 1.0,
            Unit::Cm => 10.0,
            Unit::M => 1000.0,
            Unit::Ft => MM_PER_FOOT,
            Unit::In => 25.4,
        }
    }

    #[must_use]
    pub fn to_mm(self, value: f64) -> f64 {
        value * self.mm_factor()
    }

    #[must_use]
    pub fn from_mm(self, value: f64) -> f64 {
        value / self.mm_factor()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::M => "m",
            Unit::Ft => "ft",
            Unit::In => "in",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| PlanError::UnknownUnit(s.to_owned()))
    }
}

#[must_use]
pub fn area_mm2_to_m2(area_mm2: f64) -> f64 {
    area_mm2 / 1_000_000.0
}

#[must_use]
pub fn area_mm2_to_ft2(area_mm2: f64) -> f64 {
    area_mm2 / (MM_PER_FOOT * MM_PER_FOOT)
}
