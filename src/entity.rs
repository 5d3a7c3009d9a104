//! Per-actor state shared by the physics, collision and behaviour modules.
//!
//! Every actor in a session (the player, each platform and each enemy) is an
//! [`Entity`]. Entities are built once through [`EntityBuilder`], which
//! rejects degenerate geometry and inconsistent AI settings, and are never
//! reallocated afterwards: defeating an enemy flips it inactive and parks it
//! off-stage.
use std::fmt;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::EntityError;
use crate::OFFSTAGE_POSITION;

/// Stable handle for an entity within one session.
///
/// Ids are handed out sequentially when a session is built and are never
/// reused, so holding one is always safe even after the entity it names has
/// been deactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl EntityId {
    /// Returns the raw numeric id.
    #[must_use]
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Role an entity plays in the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Static solid geometry.
    Platform,
    /// The user-controlled actor.
    Player,
    /// An AI-controlled actor.
    Enemy,
}

/// Behaviour variant driving an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiKind {
    /// Walks in one direction, turning around at walls.
    Walker,
    /// Chases the player while they are in range.
    Guard,
    /// Hops in place whenever it is on the ground.
    Jumper,
    /// Flees from the player while they are in range.
    Runner,
    /// Paces back and forth between two x coordinates.
    Patroller,
}

/// Current state of an enemy's behaviour state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AiState {
    /// Not reacting to anything.
    #[default]
    Idle,
    /// Walking in its facing direction.
    Walking,
    /// Fleeing from the player.
    Running,
    /// Closing in on the player.
    Attacking,
    /// Pacing between patrol bounds.
    Patrol,
}

/// Persistent horizontal heading.
///
/// Walkers and patrollers keep their direction across ticks here; the
/// per-tick [`Entity::movement`] intent is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Heading towards negative x.
    Left,
    /// Heading towards positive x.
    #[default]
    Right,
}

impl Facing {
    /// Unit x component for this heading.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The opposite heading.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// One side of an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The upper edge.
    Top,
    /// The lower edge.
    Bottom,
    /// The edge facing negative x.
    Left,
    /// The edge facing positive x.
    Right,
}

/// Per-side contact flags.
///
/// Used twice on every entity: once for solid contacts of any kind and once
/// for contacts whose other party is an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sides {
    /// Something blocks the upper edge.
    pub top: bool,
    /// Something blocks the lower edge.
    pub bottom: bool,
    /// Something blocks the edge facing negative x.
    pub left: bool,
    /// Something blocks the edge facing positive x.
    pub right: bool,
}

impl Sides {
    /// Returns whether the flag for `side` is set.
    #[must_use]
    pub const fn get(&self, side: Side) -> bool {
        match side {
            Side::Top => self.top,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Sets the flag for `side`.
    pub fn set(&mut self, side: Side) {
        match side {
            Side::Top => self.top = true,
            Side::Bottom => self.bottom = true,
            Side::Left => self.left = true,
            Side::Right => self.right = true,
        }
    }

    /// Clears `top` and `bottom`.
    pub fn clear_vertical(&mut self) {
        self.top = false;
        self.bottom = false;
    }

    /// Clears `left` and `right`.
    pub fn clear_horizontal(&mut self) {
        self.left = false;
        self.right = false;
    }

    /// Returns `true` when any flag is set.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }
}

/// The x interval a patroller paces between, with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolBounds {
    a: f32,
    b: f32,
}

impl PatrolBounds {
    /// Creates patrol bounds, rejecting non-finite or empty intervals.
    ///
    /// # Errors
    /// Returns [`EntityError::InvalidPatrolBounds`] unless both values are
    /// finite and `a < b`.
    pub fn new(a: f32, b: f32) -> Result<Self, EntityError> {
        if a.is_finite() && b.is_finite() && a < b {
            Ok(Self { a, b })
        } else {
            Err(EntityError::InvalidPatrolBounds { a, b })
        }
    }

    /// Lower x bound.
    #[must_use]
    pub const fn a(&self) -> f32 {
        self.a
    }

    /// Upper x bound.
    #[must_use]
    pub const fn b(&self) -> f32 {
        self.b
    }

    /// Returns whether `x` lies within the closed interval.
    #[must_use]
    pub fn contains(&self, x: f32) -> bool {
        (self.a..=self.b).contains(&x)
    }
}

/// A simulated actor: player, platform or enemy.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    ai_kind: Option<AiKind>,
    ai_state: AiState,
    position: Vec3,
    velocity: Vec3,
    acceleration: Vec3,
    movement: Vec2,
    speed: f32,
    width: f32,
    height: f32,
    facing: Facing,
    is_jumping: bool,
    jump_power: f32,
    collided: Sides,
    touched_enemy: Sides,
    last_collided: Option<EntityId>,
    active: bool,
    patrol: Option<PatrolBounds>,
}

impl Entity {
    /// Starts building an entity of the given kind.
    #[must_use]
    pub fn builder(kind: EntityKind) -> EntityBuilder {
        EntityBuilder::new(kind)
    }

    /// Session-unique id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Role of this entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Behaviour variant; `Some` exactly when the entity is an enemy.
    #[must_use]
    pub const fn ai_kind(&self) -> Option<AiKind> {
        self.ai_kind
    }

    /// Current behaviour state.
    #[must_use]
    pub const fn ai_state(&self) -> AiState {
        self.ai_state
    }

    /// Sets the behaviour state.
    pub fn set_ai_state(&mut self, state: AiState) {
        self.ai_state = state;
    }

    /// Centre of the bounding box. `z` is carried for the renderer only.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the centre of the bounding box.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Current velocity in world units per second.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Overwrites the velocity.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Constant acceleration, usually gravity.
    #[must_use]
    pub const fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Overwrites the acceleration.
    pub fn set_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration = acceleration;
    }

    /// Movement intent for the current tick.
    #[must_use]
    pub const fn movement(&self) -> Vec2 {
        self.movement
    }

    /// Sets the movement intent for the current tick.
    pub fn set_movement(&mut self, movement: Vec2) {
        self.movement = movement;
    }

    /// Horizontal speed applied to the movement intent.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Sets the horizontal speed.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Width of the bounding box.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the bounding box.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Half of the width and height.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    /// Resizes the bounding box.
    ///
    /// # Errors
    /// Returns [`EntityError::InvalidSize`] and leaves the entity unchanged
    /// unless both dimensions are positive and finite.
    pub fn set_size(&mut self, width: f32, height: f32) -> Result<(), EntityError> {
        validate_size(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Persistent horizontal heading.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Sets the persistent horizontal heading.
    pub fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
    }

    /// Whether a jump has been requested and not yet performed.
    #[must_use]
    pub const fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    /// Sets or clears the pending jump request directly.
    pub fn set_jumping(&mut self, jumping: bool) {
        self.is_jumping = jumping;
    }

    /// Requests a jump, returning `true` if this call raised the request.
    ///
    /// A request that is already pending is left as is and reported as
    /// `false`, so callers can fire a "jump initiated" notification exactly
    /// once per transition.
    pub fn request_jump(&mut self) -> bool {
        if self.is_jumping {
            return false;
        }
        self.is_jumping = true;
        true
    }

    /// Upward velocity applied when a jump is performed.
    #[must_use]
    pub const fn jump_power(&self) -> f32 {
        self.jump_power
    }

    /// Sets the jump velocity.
    pub fn set_jump_power(&mut self, power: f32) {
        self.jump_power = power;
    }

    /// Solid contacts found by the latest resolution pass.
    #[must_use]
    pub const fn collided(&self) -> Sides {
        self.collided
    }

    /// Mutable access to the solid contact flags.
    pub fn collided_mut(&mut self) -> &mut Sides {
        &mut self.collided
    }

    /// Contacts whose other party was an enemy.
    #[must_use]
    pub const fn touched_enemy(&self) -> Sides {
        self.touched_enemy
    }

    /// Mutable access to the enemy contact flags.
    pub fn touched_enemy_mut(&mut self) -> &mut Sides {
        &mut self.touched_enemy
    }

    /// Whether the entity stood on something after its latest vertical pass.
    #[must_use]
    pub const fn is_grounded(&self) -> bool {
        self.collided.bottom
    }

    /// The most recent entity this one collided with.
    #[must_use]
    pub const fn last_collided(&self) -> Option<EntityId> {
        self.last_collided
    }

    /// Records the most recent collision partner.
    pub fn set_last_collided(&mut self, other: Option<EntityId>) {
        self.last_collided = other;
    }

    /// Whether the entity still takes part in the simulation.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Patrol interval; `Some` exactly for patrollers.
    #[must_use]
    pub const fn patrol(&self) -> Option<PatrolBounds> {
        self.patrol
    }

    /// Returns the entity to play without moving it.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Removes the entity from play.
    ///
    /// The entity is parked at [`OFFSTAGE_POSITION`] with its motion and
    /// contact state cleared, so even a resolver that ignored the `active`
    /// flag could not collide with it.
    pub fn deactivate(&mut self) {
        let (x, y) = OFFSTAGE_POSITION;
        self.active = false;
        self.position = Vec3::new(x, y, self.position.z);
        self.velocity = Vec3::ZERO;
        self.movement = Vec2::ZERO;
        self.is_jumping = false;
        self.collided = Sides::default();
        self.touched_enemy = Sides::default();
        self.ai_state = AiState::Idle;
    }
}

/// Validating constructor for [`Entity`].
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use stomp::entity::{AiKind, Entity, EntityId, EntityKind};
///
/// let guard = Entity::builder(EntityKind::Enemy)
///     .ai(AiKind::Guard)
///     .position(Vec2::new(2.0, 0.0))
///     .speed(0.5)
///     .build(EntityId(7))
///     .unwrap();
/// assert!(guard.is_active());
/// assert_eq!(guard.ai_kind(), Some(AiKind::Guard));
/// ```
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    kind: EntityKind,
    ai_kind: Option<AiKind>,
    position: Vec3,
    acceleration: Vec3,
    speed: f32,
    width: f32,
    height: f32,
    facing: Facing,
    jump_power: f32,
    patrol: Option<(f32, f32)>,
}

impl EntityBuilder {
    /// Creates a builder for a 1×1 entity at the origin.
    #[must_use]
    pub const fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            ai_kind: None,
            position: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            speed: 0.0,
            width: 1.0,
            height: 1.0,
            facing: Facing::Right,
            jump_power: 0.0,
            patrol: None,
        }
    }

    /// Sets the behaviour variant. Required for enemies, rejected otherwise.
    #[must_use]
    pub const fn ai(mut self, ai_kind: AiKind) -> Self {
        self.ai_kind = Some(ai_kind);
        self
    }

    /// Sets the starting centre on the x/y plane.
    #[must_use]
    pub const fn position(mut self, position: Vec2) -> Self {
        self.position = Vec3::new(position.x, position.y, 0.0);
        self
    }

    /// Sets a constant vertical acceleration such as gravity.
    #[must_use]
    pub const fn gravity(mut self, gravity: f32) -> Self {
        self.acceleration = Vec3::new(0.0, gravity, 0.0);
        self
    }

    /// Sets the full acceleration vector.
    #[must_use]
    pub const fn acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Sets the horizontal speed.
    #[must_use]
    pub const fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the bounding box size.
    #[must_use]
    pub const fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the starting heading.
    #[must_use]
    pub const fn facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    /// Sets the jump velocity.
    #[must_use]
    pub const fn jump_power(mut self, jump_power: f32) -> Self {
        self.jump_power = jump_power;
        self
    }

    /// Sets the patrol interval. Required for patrollers, rejected otherwise.
    #[must_use]
    pub const fn patrol(mut self, a: f32, b: f32) -> Self {
        self.patrol = Some((a, b));
        self
    }

    /// Validates the definition and produces an active, motionless entity.
    ///
    /// # Errors
    /// Returns an [`EntityError`] describing the first violated precondition.
    pub fn build(self, id: EntityId) -> Result<Entity, EntityError> {
        validate_size(self.width, self.height)?;
        ensure_finite("position", self.position.is_finite())?;
        ensure_finite("acceleration", self.acceleration.is_finite())?;
        ensure_finite("speed", self.speed.is_finite())?;
        ensure_finite("jump power", self.jump_power.is_finite())?;
        if self.speed < 0.0 {
            return Err(EntityError::NegativeSpeed(self.speed));
        }

        match (self.kind, self.ai_kind) {
            (EntityKind::Enemy, None) => return Err(EntityError::MissingAiKind),
            (kind @ (EntityKind::Player | EntityKind::Platform), Some(ai)) => {
                return Err(EntityError::UnexpectedAiKind { kind, ai });
            }
            _ => {}
        }

        let patrol = match (self.ai_kind, self.patrol) {
            (Some(AiKind::Patroller), Some((a, b))) => {
                let bounds = PatrolBounds::new(a, b)?;
                if !bounds.contains(self.position.x) {
                    return Err(EntityError::PatrolStartOutOfBounds {
                        x: self.position.x,
                        a,
                        b,
                    });
                }
                Some(bounds)
            }
            (Some(AiKind::Patroller), None) => return Err(EntityError::MissingPatrol),
            (_, Some(_)) => return Err(EntityError::UnexpectedPatrol),
            (_, None) => None,
        };

        Ok(Entity {
            id,
            kind: self.kind,
            ai_kind: self.ai_kind,
            ai_state: AiState::Idle,
            position: self.position,
            velocity: Vec3::ZERO,
            acceleration: self.acceleration,
            movement: Vec2::ZERO,
            speed: self.speed,
            width: self.width,
            height: self.height,
            facing: self.facing,
            is_jumping: false,
            jump_power: self.jump_power,
            collided: Sides::default(),
            touched_enemy: Sides::default(),
            last_collided: None,
            active: true,
            patrol,
        })
    }
}

fn validate_size(width: f32, height: f32) -> Result<(), EntityError> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(EntityError::InvalidSize { width, height })
    }
}

const fn ensure_finite(field: &'static str, finite: bool) -> Result<(), EntityError> {
    if finite {
        Ok(())
    } else {
        Err(EntityError::NonFinite { field })
    }
}
