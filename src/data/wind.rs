//! Wind-speed categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound (exclusive) of `Light` wind.
pub const LIGHT_LIMIT: f64 = 0.3;
/// Upper bound (exclusive) of `Moderate` wind.
pub const MODERATE_LIMIT: f64 = 0.6;

/// Three-bucket classification of the normalized `windspeed` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WindCategory {
    Light,
    Moderate,
    Strong,
}

impl WindCategory {
    pub const ALL: [WindCategory; 3] = [
        WindCategory::Light,
        WindCategory::Moderate,
        WindCategory::Strong,
    ];

    /// `< 0.3` is Light, `[0.3, 0.6)` Moderate, everything else (NaN included) Strong.
    pub fn classify(windspeed: f64) -> Self {
        if windspeed < LIGHT_LIMIT {
            WindCategory::Light
        } else if windspeed < MODERATE_LIMIT {
            WindCategory::Moderate
        } else {
            WindCategory::Strong
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WindCategory::Light => "Light",
            WindCategory::Moderate => "Moderate",
            WindCategory::Strong => "Strong",
        }
    }
}

impl fmt::Display for WindCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WindCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindCategory::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| format!("unknown wind category '{s}'"))
    }
}
