//! Boundaries between the simulation core and the outside world.
//!
//! The core never reads devices, plays sounds or draws. Each frame it pulls a
//! [`FrameInput`] from an [`InputSource`], pushes notifications to an
//! [`AudioSink`] and hands a read-only snapshot to a [`FrameObserver`].

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::entity::{AiState, Entity, EntityId, EntityKind, Facing};
use crate::simulation::Outcome;

/// Background music requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MusicCommand {
    /// Start or resume the background track.
    Play,
    /// Stop the background track.
    Halt,
}

/// User input sampled once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Desired movement; only `x` drives the player. Clamped to unit length.
    pub movement: Vec2,
    /// Whether the jump button is held.
    pub jump: bool,
    /// Optional music request.
    pub music: Option<MusicCommand>,
}

impl FrameInput {
    /// Input that only moves.
    #[must_use]
    pub const fn walking(x: f32) -> Self {
        Self {
            movement: Vec2::new(x, 0.0),
            jump: false,
            music: None,
        }
    }

    /// Input that only jumps.
    #[must_use]
    pub const fn jumping() -> Self {
        Self {
            movement: Vec2::ZERO,
            jump: true,
            music: None,
        }
    }
}

/// Notable things that happened while advancing a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SimEvent {
    /// An entity committed to a jump.
    JumpInitiated(EntityId),
    /// Music should start or stop.
    Music(MusicCommand),
    /// A stomp removed this enemy from play.
    EnemyDefeated(EntityId),
    /// The player touched an enemy other than by landing on it.
    Lost,
    /// Every enemy has been defeated.
    Won,
}

/// Read-only snapshot of one active entity, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityView {
    /// Entity id.
    pub id: EntityId,
    /// Entity role.
    pub kind: EntityKind,
    /// Centre of the bounding box.
    pub position: Vec3,
    /// Bounding box width.
    pub width: f32,
    /// Bounding box height.
    pub height: f32,
    /// Behaviour state; always idle for players and platforms.
    pub ai_state: AiState,
    /// Movement intent of the latest tick.
    pub movement: Vec2,
    /// Persistent heading.
    pub facing: Facing,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id(),
            kind: entity.kind(),
            position: entity.position(),
            width: entity.width(),
            height: entity.height(),
            ai_state: entity.ai_state(),
            movement: entity.movement(),
            facing: entity.facing(),
        }
    }
}

/// Supplies one [`FrameInput`] per frame.
#[cfg_attr(test, mockall::automock)]
pub trait InputSource {
    /// Samples the input for the coming frame.
    fn poll(&mut self) -> FrameInput;
}

/// Receives audio notifications.
#[cfg_attr(test, mockall::automock)]
pub trait AudioSink {
    /// `entity` committed to a jump.
    fn jump_initiated(&mut self, entity: EntityId);
    /// Music should start or stop.
    fn music(&mut self, command: MusicCommand);
}

/// Receives the state of the world after each frame.
#[cfg_attr(test, mockall::automock)]
pub trait FrameObserver {
    /// Called once per frame with every active entity and the outcome.
    fn observe(&mut self, views: &[EntityView], outcome: &Outcome);
}

/// Forwards the audio-relevant events to `audio`.
pub fn dispatch_audio<A>(events: &[SimEvent], audio: &mut A)
where
    A: AudioSink + ?Sized,
{
    for event in events {
        match *event {
            SimEvent::JumpInitiated(id) => audio.jump_initiated(id),
            SimEvent::Music(command) => audio.music(command),
            SimEvent::EnemyDefeated(_) | SimEvent::Lost | SimEvent::Won => {}
        }
    }
}
