//! End-to-end tests of the session driver on the built-in level.

use std::time::Duration;

use static_assertions::assert_impl_all;
use stomp::{
    AudioSink, EntityId, EntityKind, EntityView, FrameInput, FrameObserver, InputSource,
    MusicCommand, Outcome, Session, SessionConfig,
};
use test_utils::{tick_until, LevelBuilder};

assert_impl_all!(Session: Send, Sync, Clone, std::fmt::Debug);
assert_impl_all!(SessionConfig: serde::Serialize, serde::de::DeserializeOwned);

#[derive(Default)]
struct Recorder {
    jumps: Vec<EntityId>,
    music: Vec<MusicCommand>,
    frames: usize,
    last_views: Vec<EntityView>,
    last_outcome: Outcome,
}

impl AudioSink for Recorder {
    fn jump_initiated(&mut self, entity: EntityId) {
        self.jumps.push(entity);
    }

    fn music(&mut self, command: MusicCommand) {
        self.music.push(command);
    }
}

impl FrameObserver for Recorder {
    fn observe(&mut self, views: &[EntityView], outcome: &Outcome) {
        self.frames += 1;
        self.last_views = views.to_vec();
        self.last_outcome = *outcome;
    }
}

struct Script(Vec<FrameInput>);

impl InputSource for Script {
    fn poll(&mut self) -> FrameInput {
        if self.0.is_empty() {
            FrameInput::default()
        } else {
            self.0.remove(0)
        }
    }
}

#[test]
fn default_level_runs_without_numeric_blowups() {
    let mut session = Session::with_default_level().expect("default level");
    let mut input = Script(vec![FrameInput::walking(-1.0); 300]);
    let mut audio = Recorder::default();
    let mut observer = Recorder::default();

    for _ in 0..600 {
        session.run_frame(Duration::from_millis(16), &mut input, &mut audio, &mut observer);
        for view in &observer.last_views {
            assert!(view.position.is_finite(), "{:?} went non-finite", view.id);
        }
    }

    assert_eq!(observer.frames, 600);
    assert_eq!(audio.music.first(), Some(&MusicCommand::Play));
    assert_eq!(observer.last_outcome, session.outcome());
    assert!(!(session.outcome().win && session.outcome().lose));
    let platforms = observer
        .last_views
        .iter()
        .filter(|v| v.kind == EntityKind::Platform)
        .count();
    assert_eq!(platforms, 18);
}

#[test]
fn music_commands_are_forwarded() {
    let mut session = LevelBuilder::new().floor(-2, 2, -1.0).session();
    let halt = FrameInput {
        music: Some(MusicCommand::Halt),
        ..FrameInput::default()
    };
    let mut input = Script(vec![FrameInput::default(), halt]);
    let mut audio = Recorder::default();
    let mut observer = Recorder::default();

    for _ in 0..2 {
        session.run_frame(Duration::ZERO, &mut input, &mut audio, &mut observer);
    }

    assert_eq!(audio.music, [MusicCommand::Play, MusicCommand::Halt]);
    assert_eq!(session.tick_count(), 0);
}

#[test]
fn player_jumps_are_announced_once() {
    let mut session = LevelBuilder::new().floor(-2, 2, -1.0).session();
    let landed = tick_until(&mut session, 120, &FrameInput::default(), |s, _| {
        s.player().is_grounded()
    });
    assert!(landed.is_some());

    let mut input = Script(vec![FrameInput::jumping(); 5]);
    let mut audio = Recorder::default();
    let mut observer = Recorder::default();
    for _ in 0..5 {
        session.run_frame(Duration::from_millis(17), &mut input, &mut audio, &mut observer);
    }

    assert_eq!(audio.jumps, [EntityId(0)]);
    assert!(session.player().position().y > -0.05);
}

#[test]
fn frame_splits_do_not_change_the_result() {
    let mut coarse = LevelBuilder::new().floor(-6, 6, -3.0).session();
    let mut fine = coarse.clone();
    let walk = FrameInput::walking(1.0);

    for _ in 0..60 {
        coarse.advance(Duration::from_millis(40), &walk);
        for _ in 0..4 {
            fine.advance(Duration::from_millis(10), &walk);
        }
    }

    assert_eq!(coarse.tick_count(), fine.tick_count());
    assert_eq!(coarse.player().position(), fine.player().position());
}

#[test]
fn levels_load_from_json_files() {
    let config = LevelBuilder::new()
        .floor(-3, 3, -2.0)
        .enemy(test_utils::enemy(stomp::AiKind::Guard, 2.0, -1.0))
        .config();
    let path = std::env::temp_dir().join(format!("stomp-level-{}.json", std::process::id()));
    std::fs::write(&path, config.to_json_pretty().expect("serializable")).expect("write level");

    let result = SessionConfig::load(&path);
    std::fs::remove_file(&path).ok();

    let loaded = result.expect("level loads");
    assert_eq!(loaded, config);
    let session = Session::new(loaded).expect("valid level");
    assert_eq!(session.platforms().len(), 7);
    assert_eq!(session.enemies().len(), 1);
}
