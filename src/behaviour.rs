//! Enemy decision making.
//!
//! Each [`AiKind`] maps an enemy's own state, its contact flags from the
//! previous resolution and the player's position to an [`Intent`]: the
//! behaviour state to enter, the heading to keep and the movement to apply.
//! Decisions are pure; [`think`] applies them to an enemy in place.
//!
//! Except for patrollers and jumpers, enemies wait in [`AiState::Idle`]
//! until the player comes strictly closer than the activation range.

use glam::{Vec2, Vec3};
use log::debug;

use crate::entity::{AiKind, AiState, Entity, Facing};
use crate::vector_math::{direction_sign, planar_distance};

/// The outcome of one decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intent {
    /// Behaviour state to enter.
    pub state: AiState,
    /// Heading to keep.
    pub facing: Facing,
    /// Horizontal movement intent in `[-1, 1]`.
    pub movement_x: f32,
    /// Whether to request a jump this tick.
    pub jump: bool,
}

impl Intent {
    const fn idle(facing: Facing) -> Self {
        Self {
            state: AiState::Idle,
            facing,
            movement_x: 0.0,
            jump: false,
        }
    }

    const fn moving(state: AiState, facing: Facing) -> Self {
        Self {
            state,
            facing,
            movement_x: facing.sign(),
            jump: false,
        }
    }
}

/// Whether `distance` is close enough to wake an enemy.
#[must_use]
pub fn within_activation(distance: f32, activation_range: f32) -> bool {
    distance < activation_range
}

fn facing_towards(dx: f32, fallback: Facing) -> Facing {
    match direction_sign(dx) {
        s if s > 0.0 => Facing::Right,
        s if s < 0.0 => Facing::Left,
        _ => fallback,
    }
}

/// Decides what `enemy` should do this tick.
///
/// `enemy` must be an enemy; anything without an AI kind idles.
#[must_use]
pub fn decide(enemy: &Entity, player_position: Vec3, activation_range: f32) -> Intent {
    let facing = enemy.facing();
    let Some(kind) = enemy.ai_kind() else {
        return Intent::idle(facing);
    };
    let position = enemy.position();
    let in_range = within_activation(
        planar_distance(position, player_position),
        activation_range,
    );
    let collided = enemy.collided();

    match kind {
        AiKind::Walker => {
            if !in_range && enemy.ai_state() == AiState::Idle {
                return Intent::idle(facing);
            }
            let heading = if collided.left {
                Facing::Right
            } else if collided.right {
                Facing::Left
            } else {
                facing
            };
            Intent::moving(AiState::Walking, heading)
        }
        AiKind::Guard => {
            if !in_range {
                return Intent::idle(facing);
            }
            let dx = player_position.x - position.x;
            Intent {
                state: AiState::Attacking,
                facing: facing_towards(dx, facing),
                movement_x: direction_sign(dx),
                jump: false,
            }
        }
        AiKind::Jumper => Intent {
            jump: collided.bottom,
            ..Intent::idle(facing)
        },
        AiKind::Runner => {
            if !in_range {
                return Intent::idle(facing);
            }
            let heading = facing_towards(position.x - player_position.x, facing);
            Intent::moving(AiState::Running, heading)
        }
        AiKind::Patroller => {
            let heading = match enemy.patrol() {
                Some(bounds) if position.x <= bounds.a() => Facing::Right,
                Some(bounds) if position.x >= bounds.b() => Facing::Left,
                _ => facing,
            };
            Intent::moving(AiState::Patrol, heading)
        }
    }
}

/// Runs one decision for an active enemy and applies it.
///
/// Returns `true` when the decision raised a new jump request.
pub fn think(enemy: &mut Entity, player_position: Vec3, activation_range: f32) -> bool {
    if !enemy.is_active() {
        return false;
    }
    let intent = decide(enemy, player_position, activation_range);

    if intent.state != enemy.ai_state() {
        debug!(
            "{} {:?} -> {:?}",
            enemy.id(),
            enemy.ai_state(),
            intent.state
        );
        enemy.set_ai_state(intent.state);
    }
    enemy.set_facing(intent.facing);
    enemy.set_movement(Vec2::new(intent.movement_x, 0.0));

    intent.jump && enemy.request_jump()
}

/// Keeps a patroller inside its bounds after it has moved.
///
/// A patroller that reached or crossed a bound is clamped back onto it and
/// turned around on the same tick. Returns `true` when it turned. Other
/// entities are left alone.
pub fn enforce_patrol_bounds(enemy: &mut Entity) -> bool {
    let Some(bounds) = enemy.patrol() else {
        return false;
    };
    if !enemy.is_active() {
        return false;
    }
    let mut position = enemy.position();
    let heading = if position.x <= bounds.a() {
        position.x = bounds.a();
        Facing::Right
    } else if position.x >= bounds.b() {
        position.x = bounds.b();
        Facing::Left
    } else {
        return false;
    };
    enemy.set_position(position);

    let turned = heading != enemy.facing();
    enemy.set_facing(heading);
    enemy.set_movement(Vec2::new(heading.sign(), 0.0));
    if turned {
        debug!("{} turned {:?} at x = {:.3}", enemy.id(), heading, position.x);
    }
    turned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityBuilder, EntityId, EntityKind, Side};
    use rstest::rstest;

    const RANGE: f32 = 3.0;

    fn enemy(kind: AiKind) -> EntityBuilder {
        Entity::builder(EntityKind::Enemy).ai(kind).speed(0.5)
    }

    fn at(kind: AiKind, x: f32) -> Entity {
        enemy(kind)
            .position(Vec2::new(x, 0.0))
            .build(EntityId(1))
            .expect("valid enemy")
    }

    fn patroller(x: f32, facing: Facing) -> Entity {
        enemy(AiKind::Patroller)
            .position(Vec2::new(x, 0.0))
            .patrol(-4.0, -2.0)
            .facing(facing)
            .build(EntityId(2))
            .expect("valid patroller")
    }

    #[rstest]
    #[case::just_inside(2.999, true)]
    #[case::exactly_at_range(3.0, false)]
    #[case::outside(3.5, false)]
    fn activation_is_strict(#[case] distance: f32, #[case] expected: bool) {
        assert_eq!(within_activation(distance, RANGE), expected);
    }

    #[rstest]
    #[case::guard_left(AiKind::Guard, -1.0, AiState::Attacking, -1.0)]
    #[case::guard_right(AiKind::Guard, 2.0, AiState::Attacking, 1.0)]
    #[case::runner_flees_left(AiKind::Runner, 1.0, AiState::Running, -1.0)]
    #[case::runner_flees_right(AiKind::Runner, -2.0, AiState::Running, 1.0)]
    #[case::walker_keeps_heading(AiKind::Walker, -1.0, AiState::Walking, 1.0)]
    fn in_range_decisions(
        #[case] kind: AiKind,
        #[case] player_x: f32,
        #[case] state: AiState,
        #[case] movement_x: f32,
    ) {
        let e = at(kind, 0.0);
        let intent = decide(&e, Vec3::new(player_x, 0.0, 0.0), RANGE);
        assert_eq!(intent.state, state);
        assert_eq!(intent.movement_x, movement_x);
        assert!(!intent.jump);
    }

    #[rstest]
    #[case::walker(AiKind::Walker)]
    #[case::guard(AiKind::Guard)]
    #[case::runner(AiKind::Runner)]
    fn out_of_range_enemies_idle(#[case] kind: AiKind) {
        let e = at(kind, 0.0);
        let intent = decide(&e, Vec3::new(10.0, 0.0, 0.0), RANGE);
        assert_eq!(intent, Intent::idle(Facing::Right));
    }

    #[test]
    fn guard_stops_when_player_leaves() {
        let mut e = at(AiKind::Guard, 0.0);
        think(&mut e, Vec3::new(1.0, 0.0, 0.0), RANGE);
        assert_eq!(e.ai_state(), AiState::Attacking);

        think(&mut e, Vec3::new(8.0, 0.0, 0.0), RANGE);
        assert_eq!(e.ai_state(), AiState::Idle);
        assert_eq!(e.movement(), Vec2::ZERO);
    }

    #[test]
    fn walker_stays_awake_and_bounces() {
        let mut e = at(AiKind::Walker, 0.0);
        think(&mut e, Vec3::new(1.0, 0.0, 0.0), RANGE);
        assert_eq!(e.ai_state(), AiState::Walking);

        e.collided_mut().set(Side::Right);
        think(&mut e, Vec3::new(50.0, 0.0, 0.0), RANGE);
        assert_eq!(e.ai_state(), AiState::Walking);
        assert_eq!(e.facing(), Facing::Left);
        assert_eq!(e.movement().x, -1.0);

        e.collided_mut().clear_horizontal();
        e.collided_mut().set(Side::Left);
        think(&mut e, Vec3::new(50.0, 0.0, 0.0), RANGE);
        assert_eq!(e.movement().x, 1.0);
    }

    #[test]
    fn runner_falls_back_to_facing_when_level_with_player() {
        let mut e = at(AiKind::Runner, 1.0);
        e.set_facing(Facing::Left);
        let intent = decide(&e, Vec3::new(1.0, 2.0, 0.0), RANGE);
        assert_eq!(intent.movement_x, -1.0);
    }

    #[test]
    fn jumper_hops_only_when_grounded() {
        let mut e = at(AiKind::Jumper, 0.0);
        assert!(!think(&mut e, Vec3::new(100.0, 0.0, 0.0), RANGE));
        assert!(!e.is_jumping());

        e.collided_mut().set(Side::Bottom);
        assert!(think(&mut e, Vec3::new(100.0, 0.0, 0.0), RANGE));
        assert!(e.is_jumping());
        assert_eq!(e.ai_state(), AiState::Idle);
        assert_eq!(e.movement(), Vec2::ZERO);
    }

    #[rstest]
    #[case::at_lower_bound(-4.0, Facing::Left, Facing::Right)]
    #[case::at_upper_bound(-2.0, Facing::Right, Facing::Left)]
    #[case::between(-3.0, Facing::Left, Facing::Left)]
    fn patroller_turns_at_bounds_regardless_of_player(
        #[case] x: f32,
        #[case] facing: Facing,
        #[case] expected: Facing,
    ) {
        let e = patroller(x, facing);
        let intent = decide(&e, Vec3::new(100.0, 100.0, 0.0), RANGE);
        assert_eq!(intent.state, AiState::Patrol);
        assert_eq!(intent.facing, expected);
        assert_eq!(intent.movement_x, expected.sign());
    }

    #[test]
    fn patrol_bounds_clamp_and_flip() {
        let mut e = patroller(-2.5, Facing::Right);
        e.set_position(Vec3::new(-1.99, 0.0, 0.0));

        assert!(enforce_patrol_bounds(&mut e));
        assert_eq!(e.position().x, -2.0);
        assert_eq!(e.facing(), Facing::Left);
        assert_eq!(e.movement().x, -1.0);

        assert!(!enforce_patrol_bounds(&mut e));
    }

    #[test]
    fn patrol_hook_ignores_other_kinds() {
        let mut e = at(AiKind::Walker, 10.0);
        assert!(!enforce_patrol_bounds(&mut e));
        assert_eq!(e.position().x, 10.0);
    }

    #[test]
    fn inactive_enemies_do_not_think() {
        let mut e = at(AiKind::Jumper, 0.0);
        e.deactivate();
        e.collided_mut().set(Side::Bottom);
        assert!(!think(&mut e, Vec3::ZERO, RANGE));
        assert!(!e.is_jumping());
    }
}
