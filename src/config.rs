//! Session configuration.
//!
//! A [`SessionConfig`] describes a level: the fixed timestep, the enemy
//! activation range and every entity to create. It round-trips through JSON
//! so levels can live outside the binary; [`SessionConfig::default`] is the
//! built-in level.
//!
//! Loading always validates. Every entity is pushed through
//! [`EntityBuilder`], so a config that loads is one a session can be built
//! from.

use std::fs;
use std::path::Path;

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::entity::{AiKind, Entity, EntityBuilder, EntityId, EntityKind, Facing};
use crate::error::ConfigError;
use crate::{
    ACTIVATION_RANGE, ENEMY_GRAVITY, ENEMY_SPEED, FIXED_TIMESTEP, JUMPER_GRAVITY,
    JUMPER_JUMP_POWER, PLAYER_GRAVITY, PLAYER_JUMP_POWER, PLAYER_SPEED,
};

const PLAYER_SIZE: Vec2 = Vec2::new(0.9, 0.9);

/// Tiles of the built-in level, one unit square each.
const DEFAULT_PLATFORMS: [(f32, f32); 18] = [
    (-5.0, -3.0),
    (-4.0, -3.0),
    (-3.0, -3.0),
    (-2.0, -3.0),
    (-1.0, -3.0),
    (0.0, -3.0),
    (1.0, -3.0),
    (2.0, -3.0),
    (3.0, -3.0),
    (4.0, -3.0),
    (-2.0, -1.0),
    (-2.0, -1.0),
    (3.0, -1.0),
    (2.0, -2.0),
    (1.0, 0.0),
    (0.0, 0.0),
    (5.0, -2.5),
    (-5.0, -2.35),
];

const fn unit_size() -> Vec2 {
    Vec2::ONE
}

const fn player_size() -> Vec2 {
    PLAYER_SIZE
}

const fn default_timestep() -> f32 {
    FIXED_TIMESTEP
}

const fn default_activation_range() -> f32 {
    ACTIVATION_RANGE
}

const fn default_player_speed() -> f32 {
    PLAYER_SPEED
}

const fn default_player_gravity() -> f32 {
    PLAYER_GRAVITY
}

const fn default_player_jump_power() -> f32 {
    PLAYER_JUMP_POWER
}

const fn default_enemy_speed() -> f32 {
    ENEMY_SPEED
}

const fn default_enemy_gravity() -> f32 {
    ENEMY_GRAVITY
}

/// The user-controlled actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerSpec {
    /// Starting centre.
    pub position: Vec2,
    /// Bounding box width and height.
    #[serde(default = "player_size")]
    pub size: Vec2,
    /// Horizontal speed.
    #[serde(default = "default_player_speed")]
    pub speed: f32,
    /// Vertical acceleration.
    #[serde(default = "default_player_gravity")]
    pub gravity: f32,
    /// Upward velocity of a jump.
    #[serde(default = "default_player_jump_power")]
    pub jump_power: f32,
}

impl Default for PlayerSpec {
    fn default() -> Self {
        Self {
            position: Vec2::new(2.0, 2.0),
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            gravity: PLAYER_GRAVITY,
            jump_power: PLAYER_JUMP_POWER,
        }
    }
}

impl PlayerSpec {
    /// Builder for the described player.
    #[must_use]
    pub const fn builder(&self) -> EntityBuilder {
        EntityBuilder::new(EntityKind::Player)
            .position(self.position)
            .size(self.size.x, self.size.y)
            .speed(self.speed)
            .gravity(self.gravity)
            .jump_power(self.jump_power)
    }
}

/// A static solid tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformSpec {
    /// Centre of the tile.
    pub position: Vec2,
    /// Tile width and height; one unit square when omitted.
    #[serde(default = "unit_size")]
    pub size: Vec2,
}

impl PlatformSpec {
    /// A unit tile centred on `(x, y)`.
    #[must_use]
    pub const fn tile(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::ONE,
        }
    }

    /// Builder for the described platform.
    #[must_use]
    pub const fn builder(&self) -> EntityBuilder {
        EntityBuilder::new(EntityKind::Platform)
            .position(self.position)
            .size(self.size.x, self.size.y)
    }
}

/// Interval a patroller paces between.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatrolSpec {
    /// Lower x bound.
    pub a: f32,
    /// Upper x bound.
    pub b: f32,
}

/// An AI-controlled actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnemySpec {
    /// Behaviour variant.
    pub ai: AiKind,
    /// Starting centre.
    pub position: Vec2,
    /// Bounding box width and height; one unit square when omitted.
    #[serde(default = "unit_size")]
    pub size: Vec2,
    /// Horizontal speed.
    #[serde(default = "default_enemy_speed")]
    pub speed: f32,
    /// Vertical acceleration.
    #[serde(default = "default_enemy_gravity")]
    pub gravity: f32,
    /// Upward velocity of a hop; only jumpers use it.
    #[serde(default)]
    pub jump_power: f32,
    /// Starting heading.
    #[serde(default)]
    pub facing: Facing,
    /// Patrol interval; required for patrollers and rejected for others.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patrol: Option<PatrolSpec>,
}

impl EnemySpec {
    /// An enemy of `ai` kind at `(x, y)` with the default speed and gravity.
    #[must_use]
    pub const fn new(ai: AiKind, x: f32, y: f32) -> Self {
        Self {
            ai,
            position: Vec2::new(x, y),
            size: Vec2::ONE,
            speed: ENEMY_SPEED,
            gravity: ENEMY_GRAVITY,
            jump_power: 0.0,
            facing: Facing::Right,
            patrol: None,
        }
    }

    /// Builder for the described enemy.
    #[must_use]
    pub const fn builder(&self) -> EntityBuilder {
        let builder = EntityBuilder::new(EntityKind::Enemy)
            .ai(self.ai)
            .position(self.position)
            .size(self.size.x, self.size.y)
            .speed(self.speed)
            .gravity(self.gravity)
            .jump_power(self.jump_power)
            .facing(self.facing);
        match self.patrol {
            Some(PatrolSpec { a, b }) => builder.patrol(a, b),
            None => builder,
        }
    }
}

/// Entities built from a config, ids assigned player first, then platforms,
/// then enemies.
#[derive(Debug, Clone)]
pub struct Roster {
    /// The player.
    pub player: Entity,
    /// Platforms in config order.
    pub platforms: Vec<Entity>,
    /// Enemies in config order.
    pub enemies: Vec<Entity>,
}

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Length of one simulation tick in seconds.
    #[serde(default = "default_timestep")]
    pub timestep: f32,
    /// Distance below which enemies wake up.
    #[serde(default = "default_activation_range")]
    pub activation_range: f32,
    /// The player.
    #[serde(default)]
    pub player: PlayerSpec,
    /// Static tiles.
    #[serde(default)]
    pub platforms: Vec<PlatformSpec>,
    /// Enemies, in the order they are created.
    #[serde(default)]
    pub enemies: Vec<EnemySpec>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let platforms = DEFAULT_PLATFORMS
            .iter()
            .map(|&(x, y)| PlatformSpec::tile(x, y))
            .collect();
        let enemies = vec![
            EnemySpec::new(AiKind::Runner, 1.5, 1.0),
            EnemySpec {
                gravity: JUMPER_GRAVITY,
                jump_power: JUMPER_JUMP_POWER,
                ..EnemySpec::new(AiKind::Jumper, 3.0, 0.0)
            },
            EnemySpec {
                patrol: Some(PatrolSpec { a: -4.0, b: -2.0 }),
                ..EnemySpec::new(AiKind::Patroller, -3.0, -2.0)
            },
        ];
        Self {
            timestep: FIXED_TIMESTEP,
            activation_range: ACTIVATION_RANGE,
            player: PlayerSpec::default(),
            platforms,
            enemies,
        }
    }
}

impl SessionConfig {
    /// Parses and validates a JSON level description.
    ///
    /// Omitted fields take the built-in defaults, so `{}` is the default
    /// player with no platforms or enemies.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error from [`SessionConfig::validate`].
    ///
    /// # Examples
    /// ```
    /// use stomp::config::SessionConfig;
    ///
    /// let config = SessionConfig::from_json_str(
    ///     r#"{ "platforms": [{ "position": [0.0, -1.0] }],
    ///          "enemies": [{ "ai": "Walker", "position": [2.0, 0.0] }] }"#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.enemies.len(), 1);
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON level file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`SessionConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded config from {}", path.display());
        Self::from_json_str(&text)
    }

    /// Serializes the config as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the timestep, activation range and every entity.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build().map(|_| ())
    }

    /// Validates the config and builds its entities.
    ///
    /// # Errors
    /// Returns the first problem found. Entity failures carry a label such as
    /// `player`, `platform[3]` or `enemy[1]`.
    pub fn build(&self) -> Result<Roster, ConfigError> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(ConfigError::InvalidTimestep(self.timestep));
        }
        if !(self.activation_range.is_finite() && self.activation_range > 0.0) {
            return Err(ConfigError::InvalidActivationRange(self.activation_range));
        }

        let mut next = 0_u32;
        let mut allocate = || {
            let id = EntityId(next);
            next = next.saturating_add(1);
            id
        };

        let player = self
            .player
            .builder()
            .build(allocate())
            .map_err(|e| ConfigError::entity("player", e))?;
        let platforms = self
            .platforms
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                spec.builder()
                    .build(allocate())
                    .map_err(|e| ConfigError::entity(format!("platform[{i}]"), e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let enemies = self
            .enemies
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                spec.builder()
                    .build(allocate())
                    .map_err(|e| ConfigError::entity(format!("enemy[{i}]"), e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Roster {
            player,
            platforms,
            enemies,
        })
    }
}
