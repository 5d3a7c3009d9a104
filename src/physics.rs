//! Semi-implicit Euler integration with axis-separated collision response.
//!
//! One call to [`integrate`] advances a single entity by one fixed step:
//!
//! 1. velocity picks up the constant acceleration;
//! 2. the vertical position advances and is resolved along Y, cancelling
//!    vertical velocity that points into whatever blocked it;
//! 3. the horizontal position advances by the movement intent and is
//!    resolved along X;
//! 4. a pending jump launches the entity if it started the step grounded.
//!
//! A jump request that cannot be honoured is dropped rather than buffered.

use log::debug;

use crate::collision::{resolve, Axis, Contact};
use crate::entity::{Entity, Side};

/// What happened to an entity during one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepContacts {
    /// Contact applied by the vertical pass.
    pub vertical: Option<Contact>,
    /// Contact applied by the horizontal pass.
    pub horizontal: Option<Contact>,
    /// Whether the entity took off this step.
    pub jumped: bool,
}

/// Advances `entity` by `dt` seconds against `collidables`.
///
/// `collidables` is walked once per axis, hence the `Clone` bound; iterator
/// chains over slices satisfy it cheaply. The entity itself may appear in
/// the set and is skipped by the resolver.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use stomp::entity::{Entity, EntityId, EntityKind};
/// use stomp::physics::integrate;
///
/// let floor = Entity::builder(EntityKind::Platform)
///     .build(EntityId(1))
///     .unwrap();
/// let mut player = Entity::builder(EntityKind::Player)
///     .position(Vec2::new(0.0, 1.01))
///     .gravity(-9.81)
///     .build(EntityId(0))
///     .unwrap();
/// for _ in 0..10 {
///     integrate(&mut player, 1.0 / 60.0, [&floor]);
/// }
/// assert!(player.is_grounded());
/// assert!((player.position().y - 1.0).abs() < 1e-4);
/// ```
pub fn integrate<'a, I>(entity: &mut Entity, dt: f32, collidables: I) -> StepContacts
where
    I: IntoIterator<Item = &'a Entity> + Clone,
{
    let grounded_at_start = entity.is_grounded();

    let mut velocity = entity.velocity() + entity.acceleration() * dt;
    let mut position = entity.position();
    position.y += velocity.y * dt;
    entity.set_position(position);

    let vertical = resolve(entity, Axis::Y, collidables.clone());
    if let Some(contact) = vertical {
        let into_obstacle = match contact.side {
            Side::Bottom => velocity.y < 0.0,
            Side::Top => velocity.y > 0.0,
            Side::Left | Side::Right => false,
        };
        if into_obstacle {
            velocity.y = 0.0;
        }
    }

    velocity.x = entity.movement().x * entity.speed();
    let mut moved = entity.position();
    moved.x += velocity.x * dt;
    entity.set_position(moved);
    entity.set_velocity(velocity);

    let horizontal = resolve(entity, Axis::X, collidables);

    let mut jumped = false;
    if entity.is_jumping() {
        if grounded_at_start {
            let mut launch = entity.velocity();
            launch.y = entity.jump_power();
            entity.set_velocity(launch);
            entity.collided_mut().bottom = false;
            jumped = true;
            debug!("{} took off at {:.3}", entity.id(), launch.y);
        }
        entity.set_jumping(false);
    }

    StepContacts {
        vertical,
        horizontal,
        jumped,
    }
}
