//! Session orchestration.
//!
//! A [`Session`] owns every entity of one play-through. Each fixed tick runs
//! in a fixed order:
//!
//! 1. every active enemy decides what to do;
//! 2. the player is integrated against platforms and active enemies, the
//!    latter still at their positions from the previous tick;
//! 3. every active enemy is integrated against platforms only, then
//!    patrollers are held inside their bounds.
//!
//! Win and lose are evaluated once per frame, after all of the frame's
//! ticks, from the enemy contacts the player made during them.

use std::time::Duration;

use glam::Vec2;
use hashbrown::HashMap;
use log::{debug, info};
use serde::Serialize;

use crate::behaviour::{enforce_patrol_bounds, think};
use crate::clock::FixedStepClock;
use crate::collaborators::{
    dispatch_audio, AudioSink, EntityView, FrameInput, FrameObserver, InputSource,
    MusicCommand, SimEvent,
};
use crate::config::{Roster, SessionConfig};
use crate::entity::{Entity, EntityId, EntityKind, Side, Sides};
use crate::error::ConfigError;
use crate::physics::{integrate, StepContacts};
use crate::vector_math::clamp_intent;

/// Progress towards winning or losing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Outcome {
    /// Every enemy was defeated before the player lost.
    pub win: bool,
    /// The player touched an enemy other than by stomping on it.
    pub lose: bool,
    /// Enemies defeated so far.
    pub kills: u32,
    /// Enemies the session started with.
    pub total_enemies: u32,
}

impl Outcome {
    /// Whether the session has been decided either way.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.win || self.lose
    }
}

/// What one call to [`Session::advance`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Fixed ticks simulated.
    pub ticks: u32,
    /// Events raised, in order.
    pub events: Vec<SimEvent>,
    /// Outcome after the frame.
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Player,
    Platform(usize),
    Enemy(usize),
}

/// Enemy contacts the player made during one frame.
#[derive(Debug, Clone, Copy, Default)]
struct FrameContacts {
    touched: Sides,
    stomped: Option<EntityId>,
}

impl FrameContacts {
    fn record(&mut self, player: &Entity, step: &StepContacts) {
        let touched = player.touched_enemy();
        for side in [Side::Top, Side::Bottom, Side::Left, Side::Right] {
            if touched.get(side) {
                self.touched.set(side);
            }
        }
        if let Some(contact) = step.vertical {
            if contact.other_kind == EntityKind::Enemy && contact.side == Side::Bottom {
                self.stomped = Some(contact.other);
            }
        }
    }
}

/// One play-through of a level.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    initial: Roster,
    clock: FixedStepClock,
    player: Entity,
    platforms: Vec<Entity>,
    enemies: Vec<Entity>,
    index: HashMap<EntityId, Slot>,
    outcome: Outcome,
    ticks: u64,
    music_started: bool,
}

fn index_roster(roster: &Roster) -> HashMap<EntityId, Slot> {
    let mut index = HashMap::with_capacity(1 + roster.platforms.len() + roster.enemies.len());
    index.insert(roster.player.id(), Slot::Player);
    for (i, platform) in roster.platforms.iter().enumerate() {
        index.insert(platform.id(), Slot::Platform(i));
    }
    for (i, enemy) in roster.enemies.iter().enumerate() {
        index.insert(enemy.id(), Slot::Enemy(i));
    }
    index
}

impl Session {
    /// Builds a session from a config.
    ///
    /// # Errors
    /// Returns the first validation failure in `config`.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let roster = config.build()?;
        let clock = FixedStepClock::new(config.timestep)?;
        let total_enemies = u32::try_from(roster.enemies.len()).unwrap_or(u32::MAX);
        info!(
            "session started: {} platforms, {} enemies, timestep {:.5}s",
            roster.platforms.len(),
            total_enemies,
            config.timestep
        );
        Ok(Self {
            config,
            index: index_roster(&roster),
            player: roster.player.clone(),
            platforms: roster.platforms.clone(),
            enemies: roster.enemies.clone(),
            initial: roster,
            clock,
            outcome: Outcome {
                total_enemies,
                ..Outcome::default()
            },
            ticks: 0,
            music_started: false,
        })
    }

    /// Builds a session on the built-in level.
    ///
    /// # Errors
    /// Never fails in practice; the built-in level is valid.
    pub fn with_default_level() -> Result<Self, ConfigError> {
        Self::new(SessionConfig::default())
    }

    /// Restarts the level from its initial state.
    ///
    /// Entities, outcome, banked frame time and the tick counter are all
    /// restored. Music is requested again on the next frame.
    pub fn reset(&mut self) {
        self.player = self.initial.player.clone();
        self.platforms.clone_from(&self.initial.platforms);
        self.enemies.clone_from(&self.initial.enemies);
        self.outcome = Outcome {
            total_enemies: self.outcome.total_enemies,
            ..Outcome::default()
        };
        self.clock.reset();
        self.ticks = 0;
        self.music_started = false;
        info!("session reset");
    }

    /// The config this session was built from.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Entity {
        &self.player
    }

    /// Mutable access to the player, for scripted scenarios.
    pub fn player_mut(&mut self) -> &mut Entity {
        &mut self.player
    }

    /// Platforms in config order.
    #[must_use]
    pub fn platforms(&self) -> &[Entity] {
        &self.platforms
    }

    /// Enemies in config order, including defeated ones.
    #[must_use]
    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    /// Looks up any entity by id.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        match *self.index.get(&id)? {
            Slot::Player => Some(&self.player),
            Slot::Platform(i) => self.platforms.get(i),
            Slot::Enemy(i) => self.enemies.get(i),
        }
    }

    /// Mutable lookup by id, for scripted scenarios.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match *self.index.get(&id)? {
            Slot::Player => Some(&mut self.player),
            Slot::Platform(i) => self.platforms.get_mut(i),
            Slot::Enemy(i) => self.enemies.get_mut(i),
        }
    }

    /// Progress towards winning or losing.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Fixed ticks simulated since the session started.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// How far banked frame time is into the next tick, for interpolation.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.clock.alpha()
    }

    /// Snapshot of every active entity: player, platforms, then enemies.
    #[must_use]
    pub fn views(&self) -> Vec<EntityView> {
        std::iter::once(&self.player)
            .chain(&self.platforms)
            .chain(&self.enemies)
            .filter(|e| e.is_active())
            .map(EntityView::from)
            .collect()
    }

    /// Feeds one frame of input and `elapsed` real time into the session.
    ///
    /// Input is applied first, then as many fixed ticks as the banked time
    /// allows are simulated. Win and lose are evaluated afterwards, and only
    /// if at least one tick ran.
    pub fn advance(&mut self, elapsed: Duration, input: &FrameInput) -> FrameReport {
        let mut events = Vec::new();
        self.apply_input(input, &mut events);

        let ticks = self.clock.advance(elapsed);
        let mut contacts = FrameContacts::default();
        for _ in 0..ticks {
            self.step(&mut events, &mut contacts);
        }
        if ticks > 0 {
            self.evaluate_outcome(contacts, &mut events);
        }

        FrameReport {
            ticks,
            events,
            outcome: self.outcome,
        }
    }

    /// Runs exactly one tick as its own frame, bypassing the clock.
    ///
    /// Input and music are handled as in [`Session::advance`].
    pub fn tick(&mut self, input: &FrameInput) -> FrameReport {
        let mut events = Vec::new();
        self.apply_input(input, &mut events);
        let mut contacts = FrameContacts::default();
        self.step(&mut events, &mut contacts);
        self.evaluate_outcome(contacts, &mut events);
        FrameReport {
            ticks: 1,
            events,
            outcome: self.outcome,
        }
    }

    /// Polls `input`, advances, then notifies `audio` and `observer`.
    pub fn run_frame<I, A, O>(
        &mut self,
        elapsed: Duration,
        input: &mut I,
        audio: &mut A,
        observer: &mut O,
    ) -> FrameReport
    where
        I: InputSource + ?Sized,
        A: AudioSink + ?Sized,
        O: FrameObserver + ?Sized,
    {
        let frame = input.poll();
        let report = self.advance(elapsed, &frame);
        dispatch_audio(&report.events, audio);
        observer.observe(&self.views(), &report.outcome);
        report
    }

    fn apply_input(&mut self, input: &FrameInput, events: &mut Vec<SimEvent>) {
        if !self.music_started {
            self.music_started = true;
            events.push(SimEvent::Music(MusicCommand::Play));
        }
        if let Some(command) = input.music {
            events.push(SimEvent::Music(command));
        }

        let movement = if self.outcome.lose {
            Vec2::ZERO
        } else {
            clamp_intent(input.movement)
        };
        self.player.set_movement(movement);
        if input.jump {
            if !self.player.is_grounded() {
                debug!("jump ignored: player is airborne");
            } else if self.player.request_jump() {
                debug!("player jump requested");
                events.push(SimEvent::JumpInitiated(self.player.id()));
            }
        }
    }

    fn step(&mut self, events: &mut Vec<SimEvent>, contacts: &mut FrameContacts) {
        self.ticks = self.ticks.saturating_add(1);
        let dt = self.config.timestep;
        let player_position = self.player.position();
        let range = self.config.activation_range;

        for enemy in self.enemies.iter_mut().filter(|e| e.is_active()) {
            if think(enemy, player_position, range) {
                events.push(SimEvent::JumpInitiated(enemy.id()));
            }
        }

        let player_step = integrate(
            &mut self.player,
            dt,
            self.platforms.iter().chain(self.enemies.iter()),
        );
        contacts.record(&self.player, &player_step);

        for enemy in self.enemies.iter_mut().filter(|e| e.is_active()) {
            integrate(enemy, dt, self.platforms.iter());
            enforce_patrol_bounds(enemy);
        }
    }

    fn evaluate_outcome(&mut self, contacts: FrameContacts, events: &mut Vec<SimEvent>) {
        let touched = contacts.touched;
        if (touched.top || touched.left || touched.right) && !self.outcome.lose {
            self.outcome.lose = true;
            info!("player touched an enemy: session lost");
            events.push(SimEvent::Lost);
        }

        if touched.bottom {
            if let Some(target) = contacts.stomped {
                self.stomp(target, events);
            }
        }

        if !self.outcome.is_over() && self.outcome.kills == self.outcome.total_enemies {
            self.outcome.win = true;
            info!("all {} enemies defeated: session won", self.outcome.kills);
            events.push(SimEvent::Won);
        }
    }

    /// Defeats every active enemy sharing the stomped enemy's AI kind.
    fn stomp(&mut self, target: EntityId, events: &mut Vec<SimEvent>) {
        let Some(kind) = self
            .entity(target)
            .filter(|e| e.kind() == EntityKind::Enemy)
            .and_then(Entity::ai_kind)
        else {
            debug!("stomp on {target} ignored: not an enemy");
            return;
        };

        for enemy in self
            .enemies
            .iter_mut()
            .filter(|e| e.is_active() && e.ai_kind() == Some(kind))
        {
            enemy.deactivate();
            self.outcome.kills = self.outcome.kills.saturating_add(1);
            info!("{} ({kind:?}) defeated", enemy.id());
            events.push(SimEvent::EnemyDefeated(enemy.id()));
        }
    }
}
