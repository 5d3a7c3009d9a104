//! Small vector helpers used by the behaviour and physics modules.
use glam::{Vec2, Vec3};

/// Returns the planar (x/y) distance between two positions, ignoring `z`.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use stomp::vector_math::planar_distance;
/// let d = planar_distance(Vec3::new(0.0, 0.0, 5.0), Vec3::new(3.0, 4.0, -2.0));
/// assert!((d - 5.0).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    a.truncate().distance(b.truncate())
}

/// Returns `-1.0`, `0.0` or `1.0` according to the sign of `value`.
///
/// Unlike [`f32::signum`], zero (of either sign) and NaN map to `0.0`, which
/// is what a movement intent needs when two actors share an x coordinate.
///
/// # Examples
/// ```
/// use stomp::vector_math::direction_sign;
/// assert_eq!(direction_sign(-3.5), -1.0);
/// assert_eq!(direction_sign(0.0), 0.0);
/// assert_eq!(direction_sign(f32::NAN), 0.0);
/// ```
#[must_use]
pub fn direction_sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Clamps a movement intent to at most unit length.
///
/// Non-finite vectors collapse to zero so a corrupt input frame cannot push
/// NaNs into the simulation.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use stomp::vector_math::clamp_intent;
/// let diagonal = clamp_intent(Vec2::new(1.0, 1.0));
/// assert!((diagonal.length() - 1.0).abs() < 1e-6);
/// assert_eq!(clamp_intent(Vec2::new(0.5, 0.0)), Vec2::new(0.5, 0.0));
/// ```
#[must_use]
pub fn clamp_intent(intent: Vec2) -> Vec2 {
    if !intent.is_finite() {
        return Vec2::ZERO;
    }
    if intent.length_squared() > 1.0 {
        intent.normalize_or_zero()
    } else {
        intent
    }
}
