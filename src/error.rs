use glam::Vec2;
use thiserror::Error;

/// The physics world refused to place a new body.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot place body at ({}, {}): {reason}", .position.x, .position.y)]
pub struct PlacementError {
    pub position: Vec2,
    pub reason: PlacementFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementFailure {
    #[error("position is not finite")]
    NonFinite,
    #[error("position lies outside the world bounds")]
    OutOfBounds,
    #[error("shape is degenerate")]
    DegenerateShape,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario validation error: {0}")]
    Validation(String),
}
