use thiserror::Error;

use crate::validation::GeometryIssue;

/// Top-level error type for the floor-plan geometry engine.
#[derive(Debug, Error)]
pub enum FloorplanError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Errors raised while constructing geometric primitives.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("wall from ({}, {}) to ({}, {}) has zero length", start[0], start[1], end[0], end[1])]
    ZeroLengthWall { start: [f64; 2], end: [f64; 2] },

    #[error("wall thickness {0} must be positive")]
    InvalidThickness(f64),
}

/// A polygon that could not be turned into valid geometry.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("polygon rejected: {}", first_error(issues))]
    Rejected { issues: Vec<GeometryIssue> },
}

/// Errors raised while assembling a plan from commands.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("plan rejected with {} blocking issue(s): {}", issues.len(), first_error(issues))]
    Rejected { issues: Vec<GeometryIssue> },

    #[error("unknown unit '{0}', expected one of mm, cm, m, ft, in")]
    UnknownUnit(String),

    #[error("unknown fixture type '{0}'")]
    UnknownFixture(String),

    #[error("floor level must be at least 1, got {0}")]
    InvalidFloorLevel(i64),

    #[error("malformed plan JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn first_error(issues: &[GeometryIssue]) -> String {
    issues
        .iter()
        .find(|i| i.is_error())
        .or_else(|| issues.first())
        .map_or_else(|| "no diagnostics".to_owned(), |i| i.message.clone())
}

/// Convenience type alias for results using [`FloorplanError`].
pub type Result<T> = std::result::Result<T, FloorplanError>;
