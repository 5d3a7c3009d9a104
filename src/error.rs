//! Error types for entity construction and session configuration.
//!
//! Every precondition the simulation relies on is checked when entities are
//! built or a session is configured. Once a [`crate::simulation::Session`]
//! exists, ticking it cannot fail.

use std::path::PathBuf;

use thiserror::Error;

use crate::entity::{AiKind, EntityKind};

/// Rejected entity definitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntityError {
    /// Width or height was zero, negative or not finite.
    #[error("entity size must be positive and finite, got {width}x{height}")]
    InvalidSize {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
    /// Position, speed, acceleration or jump power contained NaN or infinity.
    #[error("entity {field} must be finite")]
    NonFinite {
        /// Name of the offending attribute.
        field: &'static str,
    },
    /// Speed was negative.
    #[error("entity speed must not be negative, got {0}")]
    NegativeSpeed(f32),
    /// An enemy was declared without an AI kind.
    #[error("enemies require an AI kind")]
    MissingAiKind,
    /// A player or platform was given an AI kind.
    #[error("{kind:?} entities cannot carry AI kind {ai:?}")]
    UnexpectedAiKind {
        /// Kind of the entity that was being built.
        kind: EntityKind,
        /// AI kind that was supplied.
        ai: AiKind,
    },
    /// Patrol bounds were supplied for something other than a patroller.
    #[error("patrol bounds are only valid for patrollers")]
    UnexpectedPatrol,
    /// A patroller was declared without patrol bounds.
    #[error("patrollers require patrol bounds")]
    MissingPatrol,
    /// Patrol bounds were not finite or did not satisfy `a < b`.
    #[error("patrol bounds must be finite with a < b, got [{a}, {b}]")]
    InvalidPatrolBounds {
        /// Lower x bound.
        a: f32,
        /// Upper x bound.
        b: f32,
    },
    /// A patroller was placed outside its own patrol interval.
    #[error("patroller starts at x = {x}, outside its bounds [{a}, {b}]")]
    PatrolStartOutOfBounds {
        /// Starting x coordinate.
        x: f32,
        /// Lower x bound.
        a: f32,
        /// Upper x bound.
        b: f32,
    },
}

/// Failures while loading or validating a [`crate::config::SessionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The fixed timestep was zero, negative or not finite.
    #[error("fixed timestep must be positive and finite, got {0}")]
    InvalidTimestep(f32),
    /// The activation range was not positive or not finite.
    #[error("activation range must be positive and finite, got {0}")]
    InvalidActivationRange(f32),
    /// One of the configured entities failed validation.
    #[error("invalid {label}: {source}")]
    Entity {
        /// Human-readable name of the entity, such as `enemy[2]`.
        label: String,
        /// The underlying validation failure.
        #[source]
        source: EntityError,
    },
    /// The configuration file could not be read.
    #[error("failed to read config {path:?}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text was not valid JSON for a session.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Wraps an [`EntityError`] with the label of the offending entity.
    pub fn entity(label: impl Into<String>, source: EntityError) -> Self {
        Self::Entity {
            label: label.into(),
            source,
        }
    }
}
