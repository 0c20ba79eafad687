use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PlacementError;
use crate::physics::{BodyDesc, BodyHandle, BodyType, CollisionFilter, PhysicsWorld, Shape};
use crate::render::Surface;

pub const FOOD_CATEGORY: u16 = 0x0001;
pub const SHARK_CATEGORY: u16 = 0x0002;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Food,
    Shark,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Food, EntityKind::Shark];

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Food => "food",
            EntityKind::Shark => "shark",
        }
    }
}

/// How long an entity may live, counted in ticks of age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifetime {
    Immortal,
    Ticks(u64),
}

impl Lifetime {
    /// Negative limits mean immortal.
    pub fn from_limit(limit: i64) -> Self {
        u64::try_from(limit).map_or(Lifetime::Immortal, Lifetime::Ticks)
    }

    pub fn is_expired(self, age: u64) -> bool {
        match self {
            Lifetime::Immortal => false,
            Lifetime::Ticks(limit) => age > limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Alive,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec2,
    pub angle: f32,
}

impl Placement {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            angle: 0.0,
        }
    }

    /// Uniform position inside `bounds` with a uniform heading.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2) -> Self {
        Self {
            position: Vec2::new(rng.gen::<f32>() * bounds.x, rng.gen::<f32>() * bounds.y),
            angle: rng.gen_range(0.0..std::f32::consts::TAU),
        }
    }
}

/// Per-kind body layout and behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct KindProfile {
    pub kind: EntityKind,
    pub body_type: BodyType,
    pub shape: Shape,
    pub filter: CollisionFilter,
    pub linear_damping: f32,
    /// Forward impulse applied every tick; `None` for entities that never move.
    pub thrust: Option<f32>,
}

impl KindProfile {
    /// Static circular sensor that only sharks can touch.
    pub fn food(radius: f32) -> Self {
        Self {
            kind: EntityKind::Food,
            body_type: BodyType::Static,
            shape: Shape::Circle { radius },
            filter: CollisionFilter {
                category: FOOD_CATEGORY,
                mask: SHARK_CATEGORY,
            },
            linear_damping: 0.0,
            thrust: None,
        }
    }

    /// Dynamic triangular sensor pointing along local +Y.
    pub fn shark(size: f32, impulse: f32, linear_damping: f32) -> Self {
        Self {
            kind: EntityKind::Shark,
            body_type: BodyType::Dynamic,
            shape: Shape::Polygon {
                vertices: vec![
                    Vec2::new(0.0, size),
                    Vec2::new(-0.5 * size, -0.5 * size),
                    Vec2::new(0.5 * size, -0.5 * size),
                ],
            },
            filter: CollisionFilter {
                category: SHARK_CATEGORY,
                mask: FOOD_CATEGORY | SHARK_CATEGORY,
            },
            linear_damping,
            thrust: Some(impulse),
        }
    }

    fn body_desc(&self, placement: Placement) -> BodyDesc {
        BodyDesc {
            body_type: self.body_type,
            shape: self.shape.clone(),
            position: placement.position,
            angle: placement.angle,
            filter: self.filter,
            is_sensor: true,
            density: 0.0,
            friction: 0.0,
            restitution: 0.0,
            linear_damping: self.linear_damping,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    age: u64,
    lifetime: Lifetime,
    body: BodyHandle,
    shape: Shape,
    thrust: Option<f32>,
}

impl Entity {
    pub fn create(
        id: EntityId,
        profile: &KindProfile,
        lifetime: Lifetime,
        placement: Placement,
        physics: &mut dyn PhysicsWorld,
    ) -> Result<Self, PlacementError> {
        let body = physics.create_body(&profile.body_desc(placement))?;
        Ok(Self {
            id,
            kind: profile.kind,
            age: 0,
            lifetime,
            body,
            shape: profile.shape.clone(),
            thrust: profile.thrust,
        })
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// Ages the entity by one tick. Swimmers also push themselves forward.
    pub(crate) fn step(&mut self, physics: &mut dyn PhysicsWorld) -> StepOutcome {
        self.age += 1;

        if let Some(thrust) = self.thrust {
            let applied = physics.transform(self.body).is_some_and(|transform| {
                let impulse = transform.rotate(Vec2::Y) * thrust;
                physics.apply_impulse(self.body, impulse, Vec2::ZERO)
            });
            if !applied {
                tracing::trace!(entity = %self.id, "impulse not applied");
            }
        }

        if self.lifetime.is_expired(self.age) {
            StepOutcome::Expired
        } else {
            StepOutcome::Alive
        }
    }

    pub fn render(&self, physics: &dyn PhysicsWorld, surface: &mut dyn Surface) {
        let Some(transform) = physics.transform(self.body) else {
            return;
        };
        match &self.shape {
            Shape::Circle { radius } => surface.draw_circle(self.kind, transform.position, *radius),
            Shape::Polygon { vertices } => {
                let world: Vec<Vec2> = vertices.iter().map(|v| transform.apply(*v)).collect();
                surface.draw_polygon(self.kind, &world);
            }
        }
    }
}
