//! Utility helpers for tests.
//!
//! [`level`] builds small hand-made levels and [`stepping`] drives sessions
//! tick by tick while collecting what happened.
pub mod level;
pub mod stepping;

pub use level::{enemy, patroller, LevelBuilder};
pub use stepping::{run_ticks, tick_until, Trace};
