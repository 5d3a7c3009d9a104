//! Library crate providing the simulation core of a 2D stomp-the-enemy
//! platformer.
//! Re-exports the session driver, entity model and collaborator traits for
//! the binary and tests.
pub mod behaviour;
pub mod clock;
pub mod collaborators;
pub mod collision;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod logging;
pub mod physics;
pub mod simulation;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use clock::FixedStepClock;
pub use collaborators::{
    AudioSink, EntityView, FrameInput, FrameObserver, InputSource, MusicCommand, SimEvent,
};
pub use collision::{resolve, Aabb, Axis, Contact};
pub use config::SessionConfig;
pub use entity::{AiKind, AiState, Entity, EntityBuilder, EntityId, EntityKind, Facing, Side};
pub use error::{ConfigError, EntityError};
pub use logging::init as init_logging;
pub use physics::integrate;
pub use simulation::{FrameReport, Outcome, Session};
pub use vector_math::{clamp_intent, direction_sign, planar_distance};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust
    //! use stomp::prelude::*;
    //! use std::time::Duration;
    //!
    //! let mut session = Session::with_default_level().unwrap();
    //! let report = session.advance(Duration::from_millis(50), &FrameInput::walking(-1.0));
    //! assert_eq!(report.ticks, 3);
    //! ```

    pub use crate::collaborators::{FrameInput, MusicCommand, SimEvent};
    pub use crate::config::SessionConfig;
    pub use crate::entity::{AiKind, EntityId, EntityKind};
    pub use crate::simulation::{Outcome, Session};
    pub use glam::{Vec2, Vec3};
}
