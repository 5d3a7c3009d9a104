//! Fluent construction of test levels.

use glam::Vec2;
use stomp::config::{EnemySpec, PatrolSpec, PlatformSpec, PlayerSpec, SessionConfig};
use stomp::{AiKind, Facing, Session};

/// An enemy of `kind` at `(x, y)` with the default speed and gravity.
///
/// # Examples
/// ```
/// use stomp::AiKind;
/// use test_utils::enemy;
/// let walker = enemy(AiKind::Walker, 1.0, 0.0);
/// assert_eq!(walker.position.x, 1.0);
/// ```
#[must_use]
pub const fn enemy(kind: AiKind, x: f32, y: f32) -> EnemySpec {
    EnemySpec::new(kind, x, y)
}

/// A patroller at `(x, y)` pacing between `a` and `b`, heading `facing`.
#[must_use]
pub const fn patroller(x: f32, y: f32, a: f32, b: f32, facing: Facing) -> EnemySpec {
    EnemySpec {
        patrol: Some(PatrolSpec { a, b }),
        facing,
        ..EnemySpec::new(AiKind::Patroller, x, y)
    }
}

/// Builds a [`SessionConfig`] piece by piece.
///
/// Starts from an empty level: the default player at the origin, no
/// platforms and no enemies.
#[derive(Debug, Clone)]
pub struct LevelBuilder {
    config: SessionConfig,
}

impl Default for LevelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelBuilder {
    /// An empty level.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SessionConfig {
                player: PlayerSpec {
                    position: Vec2::ZERO,
                    ..PlayerSpec::default()
                },
                platforms: Vec::new(),
                enemies: Vec::new(),
                ..SessionConfig::default()
            },
        }
    }

    /// Lays unit tiles centred on `y` for every integer x in `from..=to`.
    #[must_use]
    pub fn floor(mut self, from: i16, to: i16, y: f32) -> Self {
        self.config
            .platforms
            .extend((from..=to).map(|x| PlatformSpec::tile(f32::from(x), y)));
        self
    }

    /// Adds one unit tile.
    #[must_use]
    pub fn tile(mut self, x: f32, y: f32) -> Self {
        self.config.platforms.push(PlatformSpec::tile(x, y));
        self
    }

    /// Places the player.
    #[must_use]
    pub fn player_at(mut self, x: f32, y: f32) -> Self {
        self.config.player.position = Vec2::new(x, y);
        self
    }

    /// Overrides the player's gravity.
    #[must_use]
    pub fn player_gravity(mut self, gravity: f32) -> Self {
        self.config.player.gravity = gravity;
        self
    }

    /// Adds an enemy.
    #[must_use]
    pub fn enemy(mut self, spec: EnemySpec) -> Self {
        self.config.enemies.push(spec);
        self
    }

    /// Overrides the fixed timestep, in seconds.
    #[must_use]
    pub fn timestep(mut self, seconds: f32) -> Self {
        self.config.timestep = seconds;
        self
    }

    /// Overrides the activation range.
    #[must_use]
    pub fn activation_range(mut self, range: f32) -> Self {
        self.config.activation_range = range;
        self
    }

    /// The finished config.
    #[must_use]
    pub fn config(self) -> SessionConfig {
        self.config
    }

    /// Builds a session from the finished config.
    ///
    /// # Panics
    /// Panics if the level is invalid.
    #[must_use]
    pub fn session(self) -> Session {
        Session::new(self.config).unwrap_or_else(|e| panic!("invalid test level: {e}"))
    }
}
