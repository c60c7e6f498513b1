use super::{
    airframe::{Airframe, look_rotation},
    collision::CollisionTag,
    flight_mode::{ControlMode, FlightMode, FlyingState, IntroAnimation, ModeKind},
};
use crate::audio::PitchSource;
use crate::mode_control::{FrameSignal, GamePhase, ModeContext};
use crate::settings::GameSettings;
use crate::{event, info, log, warn};
use glam::Vec3;

/// Tunables of the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightParams {
    /// Allowed height difference between the start note and the sung pitch.
    pub pitch_tolerance: f32,
    pub intro_duration: f32,
    /// Propeller speed in degrees per second while trilling.
    pub max_spin_speed: f32,
}

impl From<&GameSettings> for FlightParams {
    fn from(settings: &GameSettings) -> Self {
        Self {
            pitch_tolerance: settings.pitch_tolerance,
            intro_duration: settings.intro_duration,
            max_spin_speed: settings.max_spin_speed,
        }
    }
}

/// Per-frame driver of the glider: intro, start gate, flight and crash.
pub struct FlightController {
    mode: FlightMode,
    params: FlightParams,
    start_note: f32,
}

impl FlightController {
    const INSTRUCTION: &'static str = "Sing the right note to make the airplane start";

    /// Creates a controller in `Intro` and places the airframe at the first intro anchor.
    ///
    /// # Arguments
    /// * `ctx` - The context holding the level data and the height mapping.
    /// * `params` - Tolerance, intro duration and propeller speed.
    /// * `airframe` - The body to place at the start of the approach.
    ///
    /// # Returns
    /// A new [`FlightController`] animating towards the second anchor, raised to the start note's height.
    pub fn new(ctx: &ModeContext, params: FlightParams, airframe: &mut Airframe) -> Self {
        let levels = ctx.levels();
        let start_note = levels.start_note();
        let (start, end) = if let Some((a, b)) = levels.intro_anchors() {
            (Vec3::new(a.x, 0.0, a.z), Vec3::new(b.x, ctx.height().key_to_height(start_note), b.z))
        } else {
            warn!("Level data has no intro anchors, skipping the approach!");
            (airframe.position(), airframe.position())
        };
        info!("Intro from {start} to {end}, start note {start_note}");
        airframe.set_position(start);
        Self {
            mode: FlightMode::Intro(IntroAnimation::new(start, end, params.intro_duration)),
            params,
            start_note,
        }
    }

    pub fn mode(&self) -> &FlightMode { &self.mode }

    pub fn kind(&self) -> ModeKind { self.mode.kind() }

    pub fn is_flying(&self) -> bool { matches!(self.mode, FlightMode::Flying(_)) }

    pub fn start_note(&self) -> f32 { self.start_note }

    /// Active vertical control while flying.
    pub fn control(&self) -> Option<ControlMode> {
        match &self.mode {
            FlightMode::Flying(state) => Some(state.control()),
            _ => None,
        }
    }

    /// Runs one frame. Safe to call in any mode, including after the run ended.
    ///
    /// # Arguments
    /// * `ctx` - The frame context, its clock must already be advanced for this frame.
    /// * `pitch` - The pitch source, refreshed once while waiting or flying.
    /// * `airframe` - The controlled body.
    ///
    /// # Returns
    /// [`FrameSignal::Transition`] when the mode changed, [`FrameSignal::Idle`] when
    /// flight was held (paused clock, no level, terminal phase) and
    /// [`FrameSignal::Terminated`] once the run has ended.
    pub fn update(
        &mut self,
        ctx: &mut ModeContext,
        pitch: &mut dyn PitchSource,
        airframe: &mut Airframe,
    ) -> FrameSignal {
        let dt = ctx.clock().delta();
        match &mut self.mode {
            FlightMode::Intro(anim) => {
                if anim.step(dt, airframe) {
                    self.enter_waiting(ctx);
                    return FrameSignal::Transition(ModeKind::WaitingForStartPitch);
                }
                FrameSignal::Continue
            }
            FlightMode::WaitingForStartPitch { start_note } => {
                let start_note = *start_note;
                self.wait_for_start_pitch(ctx, pitch, start_note)
            }
            FlightMode::Flying(state) => Self::fly(state, &self.params, ctx, pitch, airframe, dt),
            FlightMode::Ended => FrameSignal::Terminated,
        }
    }

    /// Feeds a contact reported by the physics. Ignored unless flying.
    ///
    /// # Arguments
    /// * `tag` - What the glider touched.
    /// * `ctx` - The frame context.
    /// * `airframe` - The body, despawned on a floor hit.
    ///
    /// # Returns
    /// `Transition(Ended)` for the floor, `Continue` for gates and anything else.
    pub fn on_collision(
        &mut self,
        tag: CollisionTag,
        ctx: &ModeContext,
        airframe: &mut Airframe,
    ) -> FrameSignal {
        if !self.is_flying() {
            return FrameSignal::Idle;
        }
        let game = ctx.game();
        match tag {
            CollisionTag::Floor => {
                let scene = ctx.collab().scene();
                scene.spawn_failure_effect(airframe.position());
                scene.end_game();
                airframe.despawn();
                if !(game.transition_phase(GamePhase::Started, GamePhase::Lost)
                    || game.transition_phase(GamePhase::GateCleared, GamePhase::Lost))
                {
                    log!("Phase was already {} when the glider crashed", game.phase());
                }
                warn!("Glider hit the floor at {}!", airframe.position());
                self.mode = FlightMode::Ended;
                FrameSignal::Transition(ModeKind::Ended)
            }
            CollisionTag::Gate => {
                if game.transition_phase(GamePhase::Started, GamePhase::GateCleared) {
                    let score = game.add_score(1);
                    info!("Gate cleared, score {score}");
                }
                FrameSignal::Continue
            }
            CollisionTag::Other => FrameSignal::Continue,
        }
    }

    fn enter_waiting(&mut self, ctx: &ModeContext) {
        let collab = ctx.collab();
        collab.display().show(Self::INSTRUCTION);
        collab.tone().start_note(self.start_note);
        info!("Intro done, waiting for start note {}", self.start_note);
        self.mode = FlightMode::WaitingForStartPitch { start_note: self.start_note };
    }

    fn wait_for_start_pitch(
        &mut self,
        ctx: &mut ModeContext,
        pitch: &mut dyn PitchSource,
        start_note: f32,
    ) -> FrameSignal {
        let sung = pitch.refresh();
        let height = ctx.height();
        let miss = (height.key_to_height(start_note) - height.key_to_height(sung)).abs();
        if !ctx.trill_active() || miss > self.params.pitch_tolerance {
            return FrameSignal::Continue;
        }
        let collab = ctx.collab();
        collab.display().hide();
        collab.tone().stop_note();

        let game = ctx.game();
        if !game.transition_phase(GamePhase::NotStarted, GamePhase::Started) {
            log!("Game phase was already {} at take-off", game.phase());
        }
        game.transition_level(None, Some(0));
        ctx.clock_mut().resume();
        info!("Correct pitch {sung:.1} detected, taking off!");
        self.mode = FlightMode::Flying(FlyingState::default());
        FrameSignal::Transition(ModeKind::Flying)
    }

    fn fly(
        state: &mut FlyingState,
        params: &FlightParams,
        ctx: &mut ModeContext,
        pitch: &mut dyn PitchSource,
        airframe: &mut Airframe,
        dt: f32,
    ) -> FrameSignal {
        if ctx.clock().is_paused() {
            return FrameSignal::Idle;
        }
        let Some(level) = ctx.game().level() else {
            return FrameSignal::Idle;
        };
        let sung = pitch.refresh();
        // the phase may have been changed elsewhere since this frame started
        let phase = ctx.game().phase();
        if phase.is_terminal() || !airframe.is_alive() {
            return FrameSignal::Idle;
        }
        if state.level() != Some(level) {
            ctx.clock_mut().reset_base_time();
            let path = ctx.paths().path_for(level);
            if path.is_none() {
                warn!("Level {level} has no flight path, steering disabled!");
            }
            let notes = ctx.levels().level(level).map_or(0, |l| l.level.len());
            info!("Entering level {level} ({notes} notes) at beat {:.2}", ctx.clock().base_time());
            state.enter_level(level, path);
        }
        let elapsed = ctx.clock().elapsed();
        let trill = ctx.trill_active();

        let control =
            if trill && phase == GamePhase::Started { ControlMode::Trill } else { ControlMode::FreeFall };
        if control != state.control() {
            event!("Control mode {} -> {control}", state.control());
            state.set_control(control);
        }
        let target = state.path().map(|p| (p.position(elapsed), p.forward(elapsed)));
        match control {
            ControlMode::Trill => {
                airframe.set_gravity(false);
                let height = ctx.height().key_to_height(sung);
                let (x, z) = target.map_or((airframe.position().x, airframe.position().z), |(pos, _)| {
                    (pos.x, pos.z)
                });
                airframe.set_position(Vec3::new(x, height, z));
            }
            ControlMode::FreeFall => {
                airframe.set_gravity(true);
                if let Some((pos, _)) = target {
                    airframe.set_planar(pos.x, pos.z);
                }
            }
        }
        if let Some(rot) = target.and_then(|(_, fwd)| look_rotation(fwd)) {
            airframe.set_rotation(rot);
        }

        let spin = if trill { params.max_spin_speed } else { 0.0 };
        airframe.spin_propeller(spin, dt);
        event!("Lip trill state: {trill}, pitch {sung:.1}, beat {elapsed:.2}");
        FrameSignal::Continue
    }
}
