//! Engine configuration with defaults and `SKAD_*` environment overrides.

use serde::Deserialize;

use crate::units::Unit;
use crate::validation::DEFAULT_CLOSE_TOLERANCE;
use crate::wall::{DEFAULT_MAX_WALL_THICKNESS, DEFAULT_SNAP_TOLERANCE, DEFAULT_WALL_THICKNESS};

/// Cut depth used for doors and windows when none is given (mm).
pub const DEFAULT_CUT_DEPTH: f64 = 300.0;

/// Tunables for one plan build.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Thickness for walls that do not state one (mm).
    pub default_wall_thickness: f64,
    /// Gap closed between walls as floating-point noise (mm).
    pub snap_tolerance: f64,
    /// Gap up to which an unclosed ring is snapped shut (mm).
    pub close_tolerance: f64,
    /// Repair invalid polygons instead of rejecting them.
    pub auto_fix: bool,
    /// Unit assumed for coordinate payloads without one.
    pub default_unit: Unit,
    /// Opening cut depth through walls (mm).
    pub default_cut_depth: f64,
    /// Walls thicker than this get a warning (mm).
    pub max_wall_thickness: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_wall_thickness: DEFAULT_WALL_THICKNESS,
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            close_tolerance: DEFAULT_CLOSE_TOLERANCE,
            auto_fix: true,
            default_unit: Unit::Mm,
            default_cut_depth: DEFAULT_CUT_DEPTH,
            max_wall_thickness: DEFAULT_MAX_WALL_THICKNESS,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from `SKAD_*` environment variables.
    ///
    /// Missing or unparsable values keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let float = |key: &str, default: f64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(default)
        };
        Self {
            default_wall_thickness: float(
                "SKAD_DEFAULT_WALL_THICKNESS",
                defaults.default_wall_thickness,
            ),
            snap_tolerance: float("SKAD_SNAP_TOLERANCE", defaults.snap_tolerance),
            close_tolerance: float("SKAD_CLOSE_TOLERANCE", defaults.close_tolerance),
            auto_fix: lookup("SKAD_AUTO_FIX")
                .map_or(defaults.auto_fix, |v| {
                    matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
                }),
            default_unit: lookup("SKAD_DEFAULT_UNIT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.default_unit),
            default_cut_depth: float("SKAD_DEFAULT_CUT_DEPTH", defaults.default_cut_depth),
            max_wall_thickness: float("SKAD_MAX_WALL_THICKNESS", defaults.max_wall_thickness),
        }
    }
}
