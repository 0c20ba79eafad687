//! Contract between the simulation core and the physics backend.
//!
//! The core never integrates motion or detects overlaps itself. It creates
//! and destroys bodies, pushes sharks along with impulses, and listens for
//! "contact begun" events while the backend advances.

pub mod sandbox;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::PlacementError;

pub use sandbox::SandboxPhysics;

/// Opaque reference to a body owned by a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(u32);

impl BodyHandle {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    Static,
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Convex polygon, vertices in the body's local frame.
    Polygon { vertices: Vec<Vec2> },
}

impl Shape {
    /// Radius of the smallest origin-centred circle enclosing the shape.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Shape::Circle { radius } => *radius,
            Shape::Polygon { vertices } => vertices
                .iter()
                .map(|v| v.length())
                .fold(0.0_f32, f32::max),
        }
    }

    pub fn area(&self) -> f32 {
        match self {
            Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
            Shape::Polygon { vertices } => {
                let n = vertices.len();
                let twice: f32 = (0..n)
                    .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
                    .sum();
                twice.abs() * 0.5
            }
        }
    }
}

/// Category/mask bit filter. Two bodies may touch only when each one's
/// category is accepted by the other's mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    pub category: u16,
    pub mask: u16,
}

impl CollisionFilter {
    pub fn accepts(&self, other: &CollisionFilter) -> bool {
        (self.category & other.mask) != 0 && (other.category & self.mask) != 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub shape: Shape,
    pub position: Vec2,
    pub angle: f32,
    pub filter: CollisionFilter,
    pub is_sensor: bool,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub linear_damping: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub angle: f32,
}

impl Transform {
    /// Rotates a local-frame direction into the world frame.
    pub fn rotate(&self, local: Vec2) -> Vec2 {
        Vec2::from_angle(self.angle).rotate(local)
    }

    /// Maps a local-frame point into the world frame.
    pub fn apply(&self, local: Vec2) -> Vec2 {
        self.position + self.rotate(local)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    pub dt: f32,
    pub velocity_iterations: u32,
    pub position_iterations: u32,
}

impl StepConfig {
    pub fn from_fps(fps: u32, velocity_iterations: u32, position_iterations: u32) -> Self {
        Self {
            dt: 1.0 / fps.max(1) as f32,
            velocity_iterations,
            position_iterations,
        }
    }
}

/// Receives "contact begun" events synchronously while the world advances.
pub trait ContactListener {
    fn begin_contact(&mut self, a: BodyHandle, b: BodyHandle);
}

impl<F: FnMut(BodyHandle, BodyHandle)> ContactListener for F {
    fn begin_contact(&mut self, a: BodyHandle, b: BodyHandle) {
        self(a, b)
    }
}

pub trait PhysicsWorld {
    /// Extent of the world; valid positions lie in `[0, bounds.x] x [0, bounds.y]`.
    fn bounds(&self) -> Vec2;

    fn create_body(&mut self, desc: &BodyDesc) -> Result<BodyHandle, PlacementError>;

    /// Returns `false` when the handle was not registered.
    fn destroy_body(&mut self, handle: BodyHandle) -> bool;

    fn advance(&mut self, step: &StepConfig, listener: &mut dyn ContactListener);

    /// Applies a world-frame impulse at a point given in the body's local frame.
    fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec2, local_point: Vec2) -> bool;

    fn transform(&self, handle: BodyHandle) -> Option<Transform>;

    fn body_count(&self) -> usize;
}
