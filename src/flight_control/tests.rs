use super::{
    Airframe, BeatClock, Collaborators, CollisionProbe, CollisionTag, ControlMode, FlightController,
    FlightMode, FlightParams, InstructionDisplay, ModeKind, ReferenceTone, SceneManager, look_rotation,
};
use crate::audio::PitchSource;
use crate::level::{Gate, LevelData};
use crate::mode_control::{FrameSignal, GameModeState, GamePhase, ModeContext};
use crate::settings::GameSettings;
use crate::trill_link::TrillState;
use glam::Vec3;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

const FLIGHT_LEVELS: &str = r#"{
    "intro": { "startNote": 64, "path": [ { "x": 0, "z": -40 }, { "x": 0, "z": 0 } ] },
    "levels": [
        { "path": [ { "beat": 0, "x": 0, "z": 0 }, { "beat": 8, "x": 0, "z": 80 } ] },
        { "path": [ { "beat": 0, "x": 5, "z": 0 }, { "beat": 4, "x": 5, "z": 40 } ] }
    ]
}"#;

#[derive(Default)]
struct Recorder {
    end_game_calls: AtomicUsize,
    effects: Mutex<Vec<Vec3>>,
    tone: Mutex<Option<f32>>,
    text: Mutex<Option<String>>,
}

impl SceneManager for Recorder {
    fn end_game(&self) { self.end_game_calls.fetch_add(1, Ordering::SeqCst); }
    fn spawn_failure_effect(&self, at: Vec3) { self.effects.lock().unwrap().push(at); }
}

impl ReferenceTone for Recorder {
    fn start_note(&self, note: f32) { *self.tone.lock().unwrap() = Some(note); }
    fn stop_note(&self) { *self.tone.lock().unwrap() = None; }
}

impl InstructionDisplay for Recorder {
    fn show(&self, text: &str) { *self.text.lock().unwrap() = Some(text.to_string()); }
    fn hide(&self) { *self.text.lock().unwrap() = None; }
}

struct ScriptedPitch {
    script: VecDeque<f32>,
    last: f32,
}

impl ScriptedPitch {
    fn new(script: &[f32]) -> Self { Self { script: script.iter().copied().collect(), last: 100.0 } }
    fn hold(pitch: f32) -> Self { Self { script: VecDeque::new(), last: pitch } }
}

impl PitchSource for ScriptedPitch {
    fn refresh(&mut self) -> f32 {
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
    fn current(&self) -> f32 { self.last }
}

struct Fixture {
    ctx: ModeContext,
    rec: Arc<Recorder>,
    trill: Arc<TrillState>,
    game: Arc<GameModeState>,
    airframe: Airframe,
    controller: FlightController,
}

impl Fixture {
    fn new(json: &str, intro_duration: f32) -> Self {
        let settings = GameSettings::default();
        let levels = Arc::new(LevelData::from_json(json).unwrap());
        let rec = Arc::new(Recorder::default());
        let trill = Arc::new(TrillState::new());
        let game = Arc::new(GameModeState::new());
        let collab = Collaborators::new(rec.clone(), rec.clone(), rec.clone());
        let ctx = ModeContext::new(
            Arc::clone(&game),
            Arc::clone(&trill),
            BeatClock::new(settings.time_ratio),
            Arc::clone(&levels),
            levels,
            settings.height_mapping(),
            collab,
        );
        let params = FlightParams { intro_duration, ..FlightParams::from(&settings) };
        let mut airframe = Airframe::default();
        let controller = FlightController::new(&ctx, params, &mut airframe);
        Self { ctx, rec, trill, game, airframe, controller }
    }

    fn tick(&mut self, pitch: &mut dyn PitchSource, dt: f64) -> FrameSignal {
        self.ctx.clock_mut().advance(dt);
        self.controller.update(&mut self.ctx, pitch, &mut self.airframe)
    }

    /// Skips the intro and takes off on the start note.
    fn airborne() -> Self {
        let mut f = Self::new(FLIGHT_LEVELS, 0.0);
        let mut pitch = ScriptedPitch::hold(64.0);
        assert_eq!(f.tick(&mut pitch, 0.1), FrameSignal::Transition(ModeKind::WaitingForStartPitch));
        f.trill.set(true);
        assert_eq!(f.tick(&mut pitch, 0.1), FrameSignal::Transition(ModeKind::Flying));
        f
    }

    fn end_game_calls(&self) -> usize { self.rec.end_game_calls.load(Ordering::SeqCst) }
}

fn height(pitch: f32) -> f32 { GameSettings::default().height_mapping().key_to_height(pitch) }

#[test]
fn test_beat_clock_elapsed_monotonic_and_non_negative() {
    let mut rng = rand::rng();
    let mut clock = BeatClock::new(0.5);
    let mut last = clock.elapsed();
    for _ in 0..1000 {
        if rng.random_bool(0.05) {
            clock.reset_base_time();
            assert_eq!(clock.elapsed(), 0.0);
            last = 0.0;
        }
        if rng.random_bool(0.1) {
            clock.pause();
        } else if rng.random_bool(0.2) {
            clock.resume();
        }
        // includes bogus negative steps from a misbehaving frame timer
        clock.advance(rng.random_range(-0.01..0.05));
        let elapsed = clock.elapsed();
        assert!(elapsed >= 0.0);
        assert!(elapsed >= last, "elapsed went back from {last} to {elapsed}");
        last = elapsed;
    }
}

#[test]
fn test_beat_clock_pause_freezes_elapsed() {
    let mut clock = BeatClock::new(0.5);
    clock.advance(1.0);
    assert_eq!(clock.current_beat(), 2.0);
    clock.pause();
    assert!(clock.is_paused());
    clock.advance(3.0);
    assert_eq!(clock.current_beat(), 2.0);
    assert_eq!(clock.delta(), 0.0);
    clock.resume();
    clock.advance(0.5);
    assert_eq!(clock.current_beat(), 3.0);
    clock.reset_base_time();
    clock.advance(0.25);
    assert_eq!(clock.elapsed(), 0.5);
}

#[test]
fn test_intro_reaches_end_anchor_then_waits() {
    let mut rng = rand::rng();
    for _ in 0..20 {
        let (ax, az, bx, bz) = (
            rng.random_range(-100..100),
            rng.random_range(-100..100),
            rng.random_range(-100..100),
            rng.random_range(-100..100),
        );
        let note = rng.random_range(40..90);
        let json = format!(
            r#"{{ "intro": {{ "startNote": {note}, "path": [ {{ "x": {ax}, "z": {az} }}, {{ "x": {bx}, "z": {bz} }} ] }} }}"#
        );
        let mut f = Fixture::new(&json, 5.0);
        #[allow(clippy::cast_precision_loss)]
        let note = note as f32;
        #[allow(clippy::cast_precision_loss)]
        let start = Vec3::new(ax as f32, 0.0, az as f32);
        #[allow(clippy::cast_precision_loss)]
        let end = Vec3::new(bx as f32, height(note), bz as f32);
        assert_eq!(f.airframe.position(), start);

        let mut pitch = ScriptedPitch::hold(0.0);
        for _ in 0..19 {
            assert_eq!(f.tick(&mut pitch, 0.25), FrameSignal::Continue);
            assert_eq!(f.controller.kind(), ModeKind::Intro);
        }
        assert_eq!(f.tick(&mut pitch, 0.25), FrameSignal::Transition(ModeKind::WaitingForStartPitch));
        assert!(f.airframe.position().abs_diff_eq(end, 1e-3), "{} != {end}", f.airframe.position());
        assert_eq!(*f.rec.tone.lock().unwrap(), Some(note));
        assert!(f.rec.text.lock().unwrap().is_some());
        assert_eq!(f.game.phase(), GamePhase::NotStarted);
    }
}

#[test]
fn test_correct_pitch_without_trill_does_not_start() {
    let mut f = Fixture::new(FLIGHT_LEVELS, 0.0);
    let mut pitch = ScriptedPitch::hold(64.0);
    f.tick(&mut pitch, 0.1);
    for _ in 0..30 {
        assert_eq!(f.tick(&mut pitch, 0.1), FrameSignal::Continue);
    }
    assert_eq!(f.controller.kind(), ModeKind::WaitingForStartPitch);
    assert_eq!(f.game.phase(), GamePhase::NotStarted);
    assert_eq!(f.game.level(), None);
}

#[test]
fn test_start_sequence_succeeds_on_third_tick() {
    let mut f = Fixture::new(FLIGHT_LEVELS, 0.0);
    let mut pitch = ScriptedPitch::new(&[60.0, 66.0, 65.0]);
    f.tick(&mut ScriptedPitch::hold(0.0), 0.1);

    let trill = [false, true, true];
    let mut signals = Vec::new();
    for active in trill {
        f.trill.set(active);
        signals.push(f.tick(&mut pitch, 0.1));
    }
    assert_eq!(
        signals,
        vec![
            FrameSignal::Continue,
            FrameSignal::Continue,
            FrameSignal::Transition(ModeKind::Flying)
        ]
    );
    assert!(f.controller.is_flying());
    assert_eq!(f.game.phase(), GamePhase::Started);
    assert_eq!(f.game.level(), Some(0));
    assert_eq!(*f.rec.tone.lock().unwrap(), None);
    assert_eq!(*f.rec.text.lock().unwrap(), None);
}

#[test]
fn test_start_tolerance_is_measured_in_height() {
    let mut f = Fixture::new(FLIGHT_LEVELS, 0.0);
    // heights 27, 16.5 and 18 against 21 for the start note
    let mut pitch = ScriptedPitch::new(&[66.0, 62.5, 63.0]);
    f.tick(&mut ScriptedPitch::hold(0.0), 0.1);
    f.trill.set(true);
    for _ in 0..2 {
        assert_eq!(f.tick(&mut pitch, 0.1), FrameSignal::Continue);
    }
    assert_eq!(f.tick(&mut pitch, 0.1), FrameSignal::Transition(ModeKind::Flying));
    assert_eq!((height(64.0) - height(63.0)).abs(), 3.0);
}

#[test]
fn test_start_check_uses_the_intro_height_mapping() {
    // the start note sits below the ground clamp, every note down there maps to the same height
    let json = r#"{ "intro": { "startNote": 50, "path": [ { "x": 0, "z": 0 }, { "x": 0, "z": 10 } ] } }"#;
    let mut f = Fixture::new(json, 0.0);
    f.tick(&mut ScriptedPitch::hold(0.0), 0.1);
    let FlightMode::WaitingForStartPitch { start_note } = f.controller.mode() else {
        panic!("intro should be over");
    };
    assert_eq!(*start_note, 50.0);
    assert_eq!(f.airframe.position().y, height(50.0));
    f.trill.set(true);
    assert_eq!(f.tick(&mut ScriptedPitch::hold(40.0), 0.1), FrameSignal::Transition(ModeKind::Flying));
}

#[test]
fn test_trill_drives_height_and_release_falls() {
    let mut f = Fixture::airborne();
    let mut pitch = ScriptedPitch::hold(70.0);
    assert_eq!(f.tick(&mut pitch, 0.5), FrameSignal::Continue);
    assert_eq!(f.controller.control(), Some(ControlMode::Trill));
    assert!(!f.airframe.uses_gravity());
    assert_eq!(f.airframe.position(), Vec3::new(0.0, height(70.0), 0.0));
    assert!(f.airframe.propeller_angle() > 0.0);

    f.trill.set(false);
    // one beat into the level, a tenth along the path
    assert_eq!(f.tick(&mut pitch, 0.5), FrameSignal::Continue);
    assert_eq!(f.controller.control(), Some(ControlMode::FreeFall));
    assert!(f.airframe.uses_gravity());
    let pos = f.airframe.position();
    assert_eq!(pos.y, height(70.0), "height is left to the physics");
    assert!((pos.z - 10.0).abs() < 1e-4);
    let angle = f.airframe.propeller_angle();
    f.tick(&mut pitch, 0.5);
    assert_eq!(f.airframe.propeller_angle(), angle, "propeller idles without trill");
}

#[test]
fn test_level_change_resets_base_time() {
    let mut f = Fixture::airborne();
    let mut pitch = ScriptedPitch::hold(64.0);
    for _ in 0..4 {
        f.tick(&mut pitch, 0.5);
    }
    assert!(f.ctx.clock().elapsed() > 1.0);
    assert!(f.game.transition_level(Some(0), Some(1)));

    f.tick(&mut pitch, 0.5);
    assert_eq!(f.ctx.clock().base_time(), f.ctx.clock().current_beat());
    assert_eq!(f.ctx.clock().elapsed(), 0.0);
    assert_eq!(f.airframe.position(), Vec3::new(5.0, height(64.0), 0.0));
}

#[test]
fn test_floor_collision_ends_game_exactly_once() {
    let mut f = Fixture::airborne();
    let mut pitch = ScriptedPitch::hold(64.0);
    f.tick(&mut pitch, 0.5);

    let first = f.controller.on_collision(CollisionTag::Floor, &f.ctx, &mut f.airframe);
    let second = f.controller.on_collision(CollisionTag::Floor, &f.ctx, &mut f.airframe);
    assert_eq!(first, FrameSignal::Transition(ModeKind::Ended));
    assert_eq!(second, FrameSignal::Idle);
    assert_eq!(f.end_game_calls(), 1);
    assert_eq!(f.rec.effects.lock().unwrap().len(), 1);
    assert_eq!(f.game.phase(), GamePhase::Lost);
    assert!(!f.airframe.is_alive());

    let pos = f.airframe.position();
    for _ in 0..5 {
        assert_eq!(f.tick(&mut pitch, 0.5), FrameSignal::Terminated);
    }
    assert_eq!(f.airframe.position(), pos);
    assert_eq!(f.end_game_calls(), 1);
}

#[test]
fn test_collisions_before_take_off_are_ignored() {
    let mut f = Fixture::new(FLIGHT_LEVELS, 5.0);
    let signal = f.controller.on_collision(CollisionTag::Floor, &f.ctx, &mut f.airframe);
    assert_eq!(signal, FrameSignal::Idle);
    assert_eq!(f.end_game_calls(), 0);
    assert!(f.airframe.is_alive());
    assert_eq!(f.controller.kind(), ModeKind::Intro);
}

#[test]
fn test_gate_collision_is_not_terminal() {
    let mut f = Fixture::airborne();
    let mut pitch = ScriptedPitch::hold(64.0);
    f.tick(&mut pitch, 0.5);

    assert_eq!(
        f.controller.on_collision(CollisionTag::Gate, &f.ctx, &mut f.airframe),
        FrameSignal::Continue
    );
    f.controller.on_collision(CollisionTag::Gate, &f.ctx, &mut f.airframe);
    assert_eq!(f.game.phase(), GamePhase::GateCleared);
    assert_eq!(f.game.score(), 1);
    assert_eq!(f.end_game_calls(), 0);
    assert!(f.controller.is_flying());

    // trill no longer lifts once the gate phase is set
    assert_eq!(f.tick(&mut pitch, 0.5), FrameSignal::Continue);
    assert_eq!(f.controller.control(), Some(ControlMode::FreeFall));
    assert!(f.airframe.uses_gravity());
}

#[test]
fn test_external_phase_change_is_respected() {
    let mut f = Fixture::airborne();
    let mut pitch = ScriptedPitch::hold(64.0);
    f.tick(&mut pitch, 0.5);
    let pos = f.airframe.position();

    assert!(f.game.transition_phase(GamePhase::Started, GamePhase::Won));
    pitch = ScriptedPitch::hold(90.0);
    assert_eq!(f.tick(&mut pitch, 0.5), FrameSignal::Idle);
    assert_eq!(f.airframe.position(), pos);
}

#[test]
fn test_paused_clock_holds_flight() {
    let mut f = Fixture::airborne();
    let mut pitch = ScriptedPitch::hold(80.0);
    f.ctx.clock_mut().pause();
    let pos = f.airframe.position();
    assert_eq!(f.tick(&mut pitch, 0.5), FrameSignal::Idle);
    assert_eq!(f.airframe.position(), pos);
}

#[test]
fn test_collision_tags_from_names() {
    assert_eq!(CollisionTag::from("Floor"), CollisionTag::Floor);
    assert_eq!(CollisionTag::from("Hoop"), CollisionTag::Gate);
    assert_eq!(CollisionTag::from("gate"), CollisionTag::Gate);
    assert_eq!(CollisionTag::from("tree"), CollisionTag::Other);
}

#[test]
fn test_collision_probe_reports_each_gate_once() {
    let gate = Gate { x: 0.0, y: 20.0, z: 10.0, radius: 2.0 };
    let mut probe = CollisionProbe::new(0.0, vec![gate]);
    let mut airframe = Airframe::default();

    airframe.set_position(Vec3::new(0.0, 30.0, 10.0));
    assert!(probe.detect(&airframe).is_empty());
    airframe.set_position(Vec3::new(0.5, 20.5, 10.0));
    assert_eq!(probe.detect(&airframe), vec![CollisionTag::Gate]);
    assert!(probe.detect(&airframe).is_empty());

    airframe.set_position(Vec3::new(0.0, -0.1, 12.0));
    assert_eq!(probe.detect(&airframe), vec![CollisionTag::Floor]);
    airframe.despawn();
    assert!(probe.detect(&airframe).is_empty());

    probe.load_gates(vec![gate]);
    let mut fresh = Airframe::default();
    fresh.set_position(gate.center());
    assert_eq!(probe.detect(&fresh), vec![CollisionTag::Gate]);
}

#[test]
fn test_airframe_free_fall() {
    let mut airframe = Airframe::default();
    airframe.set_position(Vec3::new(0.0, 10.0, 0.0));
    airframe.integrate(0.1, 9.8);
    assert_eq!(airframe.position().y, 10.0, "gravity is off by default");
    airframe.set_gravity(true);
    for _ in 0..10 {
        airframe.integrate(0.1, 9.8);
    }
    assert!(airframe.position().y < 10.0);
    assert!(airframe.vertical_velocity() < 0.0);
    airframe.set_position(Vec3::new(0.0, 10.0, 0.0));
    assert_eq!(airframe.vertical_velocity(), 0.0);
}

#[test]
fn test_look_rotation_faces_forward() {
    let mut rng = rand::rng();
    assert!(look_rotation(Vec3::ZERO).is_none());
    for _ in 0..100 {
        let dir = Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let Some(rot) = look_rotation(dir) else {
            assert!(dir.length() < 1e-6);
            continue;
        };
        let facing = rot * Vec3::Z;
        assert!(facing.abs_diff_eq(dir.normalize(), 1e-4), "{facing} != {dir}");
    }
    let up = look_rotation(Vec3::Y).unwrap();
    assert!((up * Vec3::Z).abs_diff_eq(Vec3::Y, 1e-5));
}

#[test]
fn test_terminal_phase_leaves_clock_and_level_alone() {
    let mut f = Fixture::airborne();
    let mut pitch = ScriptedPitch::hold(64.0);
    f.tick(&mut pitch, 0.5);
    let base = f.ctx.clock().base_time();

    assert!(f.game.transition_level(Some(0), Some(1)));
    assert!(f.game.transition_phase(GamePhase::Started, GamePhase::Lost));
    assert_eq!(f.tick(&mut pitch, 0.5), FrameSignal::Idle);
    assert_eq!(f.ctx.clock().base_time(), base);
    let FlightMode::Flying(state) = f.controller.mode() else {
        panic!("controller left flight");
    };
    assert_eq!(state.level(), Some(0));
}
