//! Helpers that drive a [`Session`] one tick at a time.

use stomp::{EntityId, FrameInput, FrameReport, Session, SimEvent};

/// Everything observed while stepping a session.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    /// One report per tick, in order.
    pub reports: Vec<FrameReport>,
}

impl Trace {
    /// All events, flattened in order.
    pub fn events(&self) -> impl Iterator<Item = &SimEvent> {
        self.reports.iter().flat_map(|r| r.events.iter())
    }

    /// Ids of enemies defeated during the trace.
    #[must_use]
    pub fn defeated(&self) -> Vec<EntityId> {
        self.events()
            .filter_map(|e| match e {
                SimEvent::EnemyDefeated(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// How many jumps `id` initiated.
    #[must_use]
    pub fn jumps_by(&self, id: EntityId) -> usize {
        self.events()
            .filter(|e| **e == SimEvent::JumpInitiated(id))
            .count()
    }
}

/// Runs `n` single-tick frames with the same input.
pub fn run_ticks(session: &mut Session, n: usize, input: &FrameInput) -> Trace {
    Trace {
        reports: (0..n).map(|_| session.tick(input)).collect(),
    }
}

/// Ticks until `done` holds, for at most `max` ticks.
///
/// Returns the number of ticks taken, or `None` if `done` never held.
pub fn tick_until<F>(session: &mut Session, max: usize, input: &FrameInput, mut done: F) -> Option<usize>
where
    F: FnMut(&Session, &FrameReport) -> bool,
{
    (1..=max).find(|_| {
        let report = session.tick(input);
        done(session, &report)
    })
}
