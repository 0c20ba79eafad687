//! Sensor-only reference backend.
//!
//! Integrates dynamic bodies with semi-implicit Euler, wraps them around the
//! world edges and reports overlap begins between bounding circles. There is
//! no constraint solver, so `velocity_iterations` has no effect and
//! `position_iterations` is used as the number of detection sub-steps.
//! Every body behaves as a sensor: `is_sensor`, `friction` and `restitution`
//! are accepted and ignored, and overlapping bodies pass through each other.

use std::collections::{BTreeMap, HashSet};

use glam::Vec2;

use super::{
    BodyDesc, BodyHandle, BodyType, CollisionFilter, ContactListener, PhysicsWorld, Shape,
    StepConfig, Transform,
};
use crate::error::{PlacementError, PlacementFailure};

struct Body {
    body_type: BodyType,
    filter: CollisionFilter,
    position: Vec2,
    angle: f32,
    velocity: Vec2,
    inv_mass: f32,
    linear_damping: f32,
    radius: f32,
}

pub struct SandboxPhysics {
    bounds: Vec2,
    next_handle: u32,
    bodies: BTreeMap<BodyHandle, Body>,
    touching: HashSet<(BodyHandle, BodyHandle)>,
}

impl SandboxPhysics {
    pub fn new(bounds: Vec2) -> Self {
        Self {
            bounds,
            next_handle: 0,
            bodies: BTreeMap::new(),
            touching: HashSet::new(),
        }
    }

    pub fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&handle).map(|b| b.velocity)
    }

    fn validate(&self, desc: &BodyDesc) -> Result<(), PlacementFailure> {
        if !desc.position.is_finite() || !desc.angle.is_finite() {
            return Err(PlacementFailure::NonFinite);
        }
        if desc.position.x < 0.0
            || desc.position.y < 0.0
            || desc.position.x > self.bounds.x
            || desc.position.y > self.bounds.y
        {
            return Err(PlacementFailure::OutOfBounds);
        }
        let degenerate = match &desc.shape {
            Shape::Circle { radius } => !(radius.is_finite() && *radius > 0.0),
            Shape::Polygon { vertices } => vertices.len() < 3 || desc.shape.area() <= f32::EPSILON,
        };
        if degenerate {
            return Err(PlacementFailure::DegenerateShape);
        }
        Ok(())
    }

    fn integrate(&mut self, h: f32) {
        let bounds = self.bounds;
        for body in self.bodies.values_mut() {
            if body.body_type == BodyType::Static {
                continue;
            }
            body.velocity *= 1.0 / (1.0 + h * body.linear_damping);
            body.position += body.velocity * h;
            body.position.x = body.position.x.rem_euclid(bounds.x);
            body.position.y = body.position.y.rem_euclid(bounds.y);
        }
    }

    fn detect(&mut self, listener: &mut dyn ContactListener) {
        let handles: Vec<BodyHandle> = self.bodies.keys().copied().collect();
        for (i, &a) in handles.iter().enumerate() {
            for &b in &handles[i + 1..] {
                let (Some(body_a), Some(body_b)) = (self.bodies.get(&a), self.bodies.get(&b))
                else {
                    continue;
                };
                if body_a.body_type == BodyType::Static && body_b.body_type == BodyType::Static {
                    continue;
                }
                if !body_a.filter.accepts(&body_b.filter) {
                    continue;
                }
                let reach = body_a.radius + body_b.radius;
                let overlapping = body_a.position.distance_squared(body_b.position) <= reach * reach;
                if overlapping {
                    if self.touching.insert((a, b)) {
                        listener.begin_contact(a, b);
                    }
                } else {
                    self.touching.remove(&(a, b));
                }
            }
        }
    }
}

impl PhysicsWorld for SandboxPhysics {
    fn bounds(&self) -> Vec2 {
        self.bounds
    }

    fn create_body(&mut self, desc: &BodyDesc) -> Result<BodyHandle, PlacementError> {
        self.validate(desc).map_err(|reason| PlacementError {
            position: desc.position,
            reason,
        })?;

        let mass = match desc.body_type {
            BodyType::Static => 0.0,
            BodyType::Dynamic => {
                let mass = desc.density * desc.shape.area();
                if mass > 0.0 {
                    mass
                } else {
                    1.0
                }
            }
        };
        let handle = BodyHandle::new(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(
            handle,
            Body {
                body_type: desc.body_type,
                radius: desc.shape.bounding_radius(),
                filter: desc.filter,
                position: desc.position,
                angle: desc.angle,
                velocity: Vec2::ZERO,
                inv_mass: if mass > 0.0 { 1.0 / mass } else { 0.0 },
                linear_damping: desc.linear_damping.max(0.0),
            },
        );
        Ok(handle)
    }

    fn destroy_body(&mut self, handle: BodyHandle) -> bool {
        if self.bodies.remove(&handle).is_none() {
            return false;
        }
        self.touching.retain(|(a, b)| *a != handle && *b != handle);
        true
    }

    fn advance(&mut self, step: &StepConfig, listener: &mut dyn ContactListener) {
        let substeps = step.position_iterations.max(1);
        let h = step.dt / substeps as f32;
        for _ in 0..substeps {
            self.integrate(h);
            self.detect(listener);
        }
    }

    fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec2, _local_point: Vec2) -> bool {
        // No angular dynamics, so the application point does not matter.
        match self.bodies.get_mut(&handle) {
            Some(body) if body.body_type == BodyType::Dynamic => {
                body.velocity += impulse * body.inv_mass;
                true
            }
            _ => false,
        }
    }

    fn transform(&self, handle: BodyHandle) -> Option<Transform> {
        self.bodies.get(&handle).map(|b| Transform {
            position: b.position,
            angle: b.angle,
        })
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
