//! Input sanity checks and repair for raw vertex lists and wall chains.
//!
//! Diagnostics are collected into [`GeometryIssue`] lists rather than
//! returned as errors, so callers see every problem in one pass.

mod chain;
mod coords;
mod ring;

use serde::Serialize;

use crate::geometry::Polygon;
use crate::math::Point2;

pub use chain::auto_close_wall_chain;
pub use coords::{dedup_consecutive, non_finite_points, validate_coordinates};
pub use ring::{auto_close_ring, validate_polygon, ValidatePolygon, DEFAULT_CLOSE_TOLERANCE};

/// How much a diagnostic matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Blocks processing.
    Error,
    /// Auto-fixed; processing continues with the correction.
    Warning,
    /// Informational only.
    Info,
}

/// Stable machine-readable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    TooFewPoints,
    NonFiniteCoord,
    ConsecutiveDuplicate,
    DegenerateAfterDedup,
    AllCollinear,
    MicroEdge,
    SnappedClosed,
    AutoClosed,
    ConstructionFailed,
    InvalidGeometry,
    AutoRepaired,
    CwOrientation,
    ZeroArea,
    ChainSnapped,
    ChainAutoClosed,
    ZeroLength,
    InvalidThickness,
    ThickWall,
    NegativeSetback,
    UnknownFixture,
    InvalidFloorLevel,
    ZeroWidthOpening,
    EmptyLabel,
    DuplicateLabel,
    NoWalls,
    LotTooFewPoints,
}

impl IssueCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TooFewPoints => "TOO_FEW_POINTS",
            Self::NonFiniteCoord => "NON_FINITE_COORD",
            Self::ConsecutiveDuplicate => "CONSECUTIVE_DUPLICATE",
            Self::DegenerateAfterDedup => "DEGENERATE_AFTER_DEDUP",
            Self::AllCollinear => "ALL_COLLINEAR",
            Self::MicroEdge => "MICRO_EDGE",
            Self::SnappedClosed => "SNAPPED_CLOSED",
            Self::AutoClosed => "AUTO_CLOSED",
            Self::ConstructionFailed => "CONSTRUCTION_FAILED",
            Self::InvalidGeometry => "INVALID_GEOMETRY",
            Self::AutoRepaired => "AUTO_REPAIRED",
            Self::CwOrientation => "CW_ORIENTATION",
            Self::ZeroArea => "ZERO_AREA",
            Self::ChainSnapped => "CHAIN_SNAPPED",
            Self::ChainAutoClosed => "CHAIN_AUTO_CLOSED",
            Self::ZeroLength => "ZERO_LENGTH",
            Self::InvalidThickness => "INVALID_THICKNESS",
            Self::ThickWall => "THICK_WALL",
            Self::NegativeSetback => "NEGATIVE_SETBACK",
            Self::UnknownFixture => "UNKNOWN_FIXTURE",
            Self::InvalidFloorLevel => "INVALID_FLOOR_LEVEL",
            Self::ZeroWidthOpening => "ZERO_WIDTH_OPENING",
            Self::EmptyLabel => "EMPTY_LABEL",
            Self::DuplicateLabel => "DUPLICATE_LABEL",
            Self::NoWalls => "NO_WALLS",
            Self::LotTooFewPoints => "LOT_TOO_FEW_POINTS",
        }
    }
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic produced while checking or repairing geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    pub location: Option<[f64; 2]>,
}

impl GeometryIssue {
    #[must_use]
    pub fn new(severity: Severity, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location: None,
        }
    }

    #[must_use]
    pub fn error(code: IssueCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    #[must_use]
    pub fn warning(code: IssueCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    #[must_use]
    pub fn info(code: IssueCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    /// Attaches the point the issue refers to.
    #[must_use]
    pub fn at(mut self, location: &Point2) -> Self {
        self.location = Some([location.x, location.y]);
        self
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Same issue with its message prefixed, e.g. by the owning wall.
    #[must_use]
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.message = format!("{prefix}: {}", self.message);
        self
    }
}

impl std::fmt::Display for GeometryIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}: {}", self.severity, self.code, self.message)
    }
}

/// Returns `true` if any issue in the list blocks processing.
#[must_use]
pub fn has_errors(issues: &[GeometryIssue]) -> bool {
    issues.iter().any(GeometryIssue::is_error)
}

/// Outcome of a polygon validation pass: the (possibly repaired) polygon,
/// or `None`, plus every issue found along the way.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub polygon: Option<Polygon>,
    pub issues: Vec<GeometryIssue>,
}

impl ValidationResult {
    /// `true` when no issue is an error.
    #[must_use]
    pub fn valid(&self) -> bool {
        !has_errors(&self.issues)
    }

    pub fn errors(&self) -> impl Iterator<Item = &GeometryIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &GeometryIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// Returns `true` if an issue with `code` was reported.
    #[must_use]
    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    /// Converts into the repaired polygon, or a rejection carrying every issue.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Rejected` when the pass produced no polygon.
    pub fn into_polygon(self) -> crate::error::Result<Polygon> {
        match self.polygon {
            Some(p) if !has_errors(&self.issues) => Ok(p),
            _ => Err(crate::error::ValidationError::Rejected {
                issues: self.issues,
            }
            .into()),
        }
    }
}
