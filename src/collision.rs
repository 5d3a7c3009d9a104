//! Axis-separated AABB collision detection and response.
//!
//! The integrator moves an entity along one axis at a time and then calls
//! [`resolve`] for that axis. Resolving each axis on its own keeps the
//! blocking side unambiguous and avoids corner tunnelling without a swept
//! test.
//!
//! Candidates are checked brute force. When several overlap on the same
//! axis, the deepest penetration wins: its push is applied and its side is
//! flagged. Shallower overlaps on the same side are cleared by that same
//! push.

use glam::Vec2;
use log::trace;
use ordered_float::OrderedFloat;

use crate::entity::{Entity, EntityId, EntityKind, Side};
use crate::CONTACT_EPSILON;

/// Axis along which a resolution pass operates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal pass; may flag `left` or `right`.
    X,
    /// Vertical pass; may flag `top` or `bottom`.
    Y,
}

/// Axis-aligned bounding box described by its centre and half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Centre of the box.
    pub center: Vec2,
    /// Half of the width and height.
    pub half: Vec2,
}

impl Aabb {
    /// Box occupied by `entity` on the x/y plane.
    #[must_use]
    pub fn of(entity: &Entity) -> Self {
        Self {
            center: entity.position().truncate(),
            half: entity.half_extents(),
        }
    }

    /// Per-axis overlap with `other`.
    ///
    /// Positive components are penetration depths; zero means the boxes
    /// touch and negative values are the gap between them.
    #[must_use]
    pub fn overlap(&self, other: &Self) -> Vec2 {
        self.half + other.half - (self.center - other.center).abs()
    }

    /// Whether the boxes penetrate along `axis`.
    ///
    /// Any positive overlap counts on `axis` itself. Across it the overlap
    /// must exceed [`CONTACT_EPSILON`], so a box resting flush against a
    /// surface is not blocked by it sideways.
    #[must_use]
    pub fn intersects(&self, other: &Self, axis: Axis) -> bool {
        let overlap = self.overlap(other);
        let (along, across) = match axis {
            Axis::X => (overlap.x, overlap.y),
            Axis::Y => (overlap.y, overlap.x),
        };
        along > 0.0 && across > CONTACT_EPSILON
    }
}

/// The contact applied by a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The entity that was pushed against.
    pub other: EntityId,
    /// Kind of the entity that was pushed against.
    pub other_kind: EntityKind,
    /// Side of the resolved entity that is now blocked.
    pub side: Side,
    /// Distance the resolved entity was pushed.
    pub depth: f32,
}

/// Side of `entity` that `other` blocks along `axis`.
///
/// The entity is pushed away from the candidate's centre. When the centres
/// coincide on that axis, the entity's own velocity (vertical) or movement
/// intent (horizontal) breaks the tie: whatever it was heading into is what
/// blocks it.
fn blocked_side(entity: &Entity, other: &Aabb, axis: Axis) -> Side {
    let own = Aabb::of(entity);
    match axis {
        Axis::Y => {
            let dy = own.center.y - other.center.y;
            if dy > 0.0 || (dy == 0.0 && entity.velocity().y <= 0.0) {
                Side::Bottom
            } else {
                Side::Top
            }
        }
        Axis::X => {
            let dx = own.center.x - other.center.x;
            if dx > 0.0 || (dx == 0.0 && entity.movement().x < 0.0) {
                Side::Left
            } else {
                Side::Right
            }
        }
    }
}

/// Pushes `entity` out of the deepest overlapping candidate along `axis`.
///
/// The flags for `axis` on both [`Entity::collided`] and
/// [`Entity::touched_enemy`] are cleared first, so after the call they
/// describe exactly the contact that was applied, if any. Inactive
/// candidates and the entity itself are skipped. Contacts with enemies also
/// set the matching `touched_enemy` flag; platforms and players never do.
///
/// Returns the applied contact, or `None` when nothing overlapped.
pub fn resolve<'a, I>(entity: &mut Entity, axis: Axis, candidates: I) -> Option<Contact>
where
    I: IntoIterator<Item = &'a Entity>,
{
    match axis {
        Axis::X => {
            entity.collided_mut().clear_horizontal();
            entity.touched_enemy_mut().clear_horizontal();
        }
        Axis::Y => {
            entity.collided_mut().clear_vertical();
            entity.touched_enemy_mut().clear_vertical();
        }
    }

    let own = Aabb::of(entity);
    let contact = candidates
        .into_iter()
        .filter(|other| other.is_active() && other.id() != entity.id())
        .filter_map(|other| {
            let bounds = Aabb::of(other);
            if !own.intersects(&bounds, axis) {
                return None;
            }
            let overlap = own.overlap(&bounds);
            let depth = match axis {
                Axis::X => overlap.x,
                Axis::Y => overlap.y,
            };
            Some(Contact {
                other: other.id(),
                other_kind: other.kind(),
                side: blocked_side(entity, &bounds, axis),
                depth,
            })
        })
        .max_by_key(|c| OrderedFloat(c.depth))?;

    let push = match contact.side {
        Side::Bottom | Side::Left => contact.depth,
        Side::Top | Side::Right => -contact.depth,
    };
    let mut position = entity.position();
    match axis {
        Axis::X => position.x += push,
        Axis::Y => position.y += push,
    }
    entity.set_position(position);
    entity.collided_mut().set(contact.side);
    entity.set_last_collided(Some(contact.other));
    if contact.other_kind == EntityKind::Enemy {
        entity.touched_enemy_mut().set(contact.side);
    }

    trace!(
        "{} resolved against {} on {:?}: {:?} by {:.5}",
        entity.id(),
        contact.other,
        axis,
        contact.side,
        contact.depth
    );
    Some(contact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::AiKind;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn platform(id: u32, x: f32, y: f32) -> Entity {
        Entity::builder(EntityKind::Platform)
            .position(Vec2::new(x, y))
            .build(EntityId(id))
            .expect("valid platform")
    }

    fn enemy(id: u32, x: f32, y: f32) -> Entity {
        Entity::builder(EntityKind::Enemy)
            .ai(AiKind::Walker)
            .position(Vec2::new(x, y))
            .build(EntityId(id))
            .expect("valid enemy")
    }

    fn player(x: f32, y: f32) -> Entity {
        Entity::builder(EntityKind::Player)
            .position(Vec2::new(x, y))
            .build(EntityId(0))
            .expect("valid player")
    }

    #[rstest]
    #[case::from_above(0.0, 0.8, Side::Bottom, 1.0)]
    #[case::from_below(0.0, -0.8, Side::Top, -1.0)]
    fn vertical_overlap_pushes_out_and_flags(
        #[case] x: f32,
        #[case] y: f32,
        #[case] side: Side,
        #[case] expected_y: f32,
    ) {
        let floor = platform(1, 0.0, 0.0);
        let mut p = player(x, y);

        let contact = resolve(&mut p, Axis::Y, [&floor]).expect("overlap");

        assert_eq!(contact.side, side);
        assert_relative_eq!(contact.depth, 0.2, epsilon = 1e-5);
        assert_relative_eq!(p.position().y, expected_y, epsilon = 1e-5);
        assert!(p.collided().get(side));
        assert_eq!(p.last_collided(), Some(EntityId(1)));
        assert!(!p.touched_enemy().any());
    }

    #[rstest]
    #[case::wall_on_right(-0.7, Side::Right, -1.0)]
    #[case::wall_on_left(0.7, Side::Left, 1.0)]
    fn horizontal_overlap_pushes_out_and_flags(
        #[case] x: f32,
        #[case] side: Side,
        #[case] expected_x: f32,
    ) {
        let wall = platform(1, 0.0, 0.0);
        let mut p = player(x, 0.0);

        let contact = resolve(&mut p, Axis::X, [&wall]).expect("overlap");

        assert_eq!(contact.side, side);
        assert_relative_eq!(p.position().x, expected_x, epsilon = 1e-5);
        assert!(p.collided().get(side));
    }

    #[test]
    fn deepest_candidate_wins() {
        let shallow = platform(1, 0.0, 0.0);
        let deep = platform(2, 0.6, 0.3);
        let mut p = player(0.3, 0.9);

        let contact = resolve(&mut p, Axis::Y, [&shallow, &deep]).expect("overlap");

        assert_eq!(contact.other, EntityId(2));
        assert_relative_eq!(p.position().y, 1.3, epsilon = 1e-5);
        for other in [&shallow, &deep] {
            assert!(Aabb::of(&p).overlap(&Aabb::of(other)).y <= CONTACT_EPSILON);
        }
    }

    #[test]
    fn enemy_contacts_set_touched_flags() {
        let foe = enemy(5, 0.0, 0.0);
        let mut p = player(0.0, 0.9);

        resolve(&mut p, Axis::Y, [&foe]);

        assert!(p.touched_enemy().bottom);
        assert!(!p.touched_enemy().top);
        assert_eq!(p.last_collided(), Some(EntityId(5)));
    }

    #[test]
    fn inactive_and_self_candidates_are_ignored() {
        let mut foe = enemy(5, 0.0, 0.0);
        foe.deactivate();
        let mut p = player(0.0, 0.0);
        let twin = p.clone();

        assert!(resolve(&mut p, Axis::Y, [&foe, &twin]).is_none());
        assert_eq!(p.position().y, 0.0);
    }

    #[test]
    fn resting_contact_is_not_a_side_hit() {
        let floor = platform(1, 0.0, 0.0);
        let mut p = player(0.5, 1.0);

        assert!(resolve(&mut p, Axis::X, [&floor]).is_none());
        assert!(!p.collided().any());
    }

    #[test]
    fn flags_for_the_axis_are_recomputed() {
        let floor = platform(1, 0.0, 0.0);
        let mut p = player(0.0, 0.9);
        resolve(&mut p, Axis::Y, [&floor]);
        assert!(p.collided().bottom);

        p.set_position(glam::Vec3::new(0.0, 5.0, 0.0));
        resolve(&mut p, Axis::Y, [&floor]);
        assert!(!p.collided().bottom);
        assert_eq!(p.last_collided(), Some(EntityId(1)));
    }

    #[rstest]
    #[case::below_epsilon(5e-5)]
    #[case::above_epsilon(5e-4)]
    fn shallow_sinks_still_ground(#[case] sink: f32) {
        let floor = platform(1, 0.0, 0.0);
        let mut p = player(0.0, 1.0 - sink);

        let contact = resolve(&mut p, Axis::Y, [&floor]).expect("resting contact");

        assert_eq!(contact.side, Side::Bottom);
        assert!(p.collided().bottom);
        assert_relative_eq!(p.position().y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn flush_boxes_do_not_block_sideways() {
        let floor = platform(1, 0.0, 0.0);
        let mut p = player(0.5, 1.0 - 5e-5);

        assert!(resolve(&mut p, Axis::X, [&floor]).is_none());
        assert!(!Aabb::of(&p).intersects(&Aabb::of(&floor), Axis::X));
        assert!(Aabb::of(&p).intersects(&Aabb::of(&floor), Axis::Y));
    }

    #[test]
    fn empty_candidate_set_is_a_no_op() {
        let mut p = player(0.0, 0.0);
        assert!(resolve(&mut p, Axis::X, std::iter::empty()).is_none());
    }
}
