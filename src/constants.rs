//! Simulation constants shared across the physics and behaviour modules.
//!
//! These are the compile-time defaults; a [`crate::config::SessionConfig`]
//! may override the timestep and activation range per session.

/// Duration of one simulation tick in seconds.
pub const FIXED_TIMESTEP: f32 = 0.016_666_6;
/// Distance below which an idle enemy wakes up and starts its behaviour.
///
/// The comparison is strict: an enemy exactly this far from the player
/// stays idle.
pub const ACTIVATION_RANGE: f32 = 3.0;
/// Overlap (in world units) across the resolved axis that must be exceeded
/// before two boxes count as colliding on it.
pub const CONTACT_EPSILON: f32 = 1e-4;
/// Where deactivated entities are parked, far outside the play area.
pub const OFFSTAGE_POSITION: (f32, f32) = (100.0, 100.0);
/// Vertical acceleration applied to the player in the default level.
pub const PLAYER_GRAVITY: f32 = -4.905;
/// Vertical acceleration applied to most enemies in the default level.
pub const ENEMY_GRAVITY: f32 = -9.81;
/// Reduced gravity that gives the default jumper its floaty hops.
pub const JUMPER_GRAVITY: f32 = -1.5;
/// Upward velocity applied when the player jumps.
pub const PLAYER_JUMP_POWER: f32 = 4.0;
/// Upward velocity applied when a jumper hops.
pub const JUMPER_JUMP_POWER: f32 = 3.0;
/// Horizontal speed of the player in world units per second.
pub const PLAYER_SPEED: f32 = 1.0;
/// Horizontal speed shared by the default enemies.
pub const ENEMY_SPEED: f32 = 0.5;
