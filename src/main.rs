#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod audio;
mod flight_control;
mod level;
mod logger;
mod mode_control;
mod settings;
mod sim;
mod trill_link;

use crate::audio::{PitchEstimator, YinDetector};
use crate::flight_control::{
    Airframe, BeatClock, Collaborators, CollisionProbe, FlightController, FlightParams, ModeKind,
};
use crate::level::LevelData;
use crate::mode_control::{FrameSignal, GameModeState, ModeContext};
use crate::settings::GameSettings;
use crate::sim::{ConsoleDisplay, ConsoleTone, LevelDirector};
use crate::trill_link::{TrillReceiver, TrillState};
use std::{sync::Arc, time::Duration};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Everything `main` owns for the lifetime of a run.
struct Session {
    settings: GameSettings,
    ctx: ModeContext,
    director: Arc<LevelDirector>,
    estimator: PitchEstimator,
    receiver: TrillReceiver,
    shutdown: CancellationToken,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    let Session { settings, mut ctx, director, mut estimator, receiver, shutdown } = init();

    let ctrl_c_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Ctrl-C received, shutting down!");
                ctrl_c_token.cancel();
            }
            Err(e) => error!("Unable to listen for Ctrl-C: {e}"),
        }
    });

    let mut airframe = Airframe::default();
    let mut controller =
        FlightController::new(&ctx, FlightParams::from(&settings), &mut airframe);
    let mut probe = CollisionProbe::new(settings.ground_level, Vec::new());

    let mut ticker =
        tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(settings.frame_rate)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();
    info!("Starting {} mode at {} fps", controller.kind(), settings.frame_rate);
    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }
        let now = Instant::now();
        ctx.clock_mut().advance(now.duration_since(last_tick).as_secs_f64());
        last_tick = now;

        if let Some(level) = director.on_frame() {
            probe.load_gates(director.gates_for(level));
        }
        let signal = controller.update(&mut ctx, &mut estimator, &mut airframe);
        if signal == FrameSignal::Transition(ModeKind::Flying) {
            probe.load_gates(director.gates_for(0));
        }
        log_signal(signal);

        airframe.integrate(ctx.clock().delta(), settings.gravity);
        if controller.is_flying() {
            for tag in probe.detect(&airframe) {
                log_signal(controller.on_collision(tag, &ctx, &mut airframe));
            }
        }
    }

    estimator.stop();
    receiver.stop();
    info!(
        "Run finished in {} with phase {} and score {}",
        controller.kind(),
        ctx.game().phase(),
        ctx.game().score()
    );
}

fn log_signal(signal: FrameSignal) {
    if let FrameSignal::Transition(kind) = signal {
        info!("Flight mode is now {kind}");
    }
}

fn init() -> Session {
    let settings = GameSettings::from_env();
    if let Err(e) = settings.validate() {
        fatal!("Invalid game settings: {e}");
    }
    let levels = Arc::new(
        LevelData::load(&settings.level_file)
            .unwrap_or_else(|e| fatal!("Unable to load {}: {e}", settings.level_file)),
    );

    let shutdown = CancellationToken::new();
    let game = Arc::new(GameModeState::new());
    let trill = Arc::new(TrillState::new());
    let receiver = TrillReceiver::start(settings.trill_port, Arc::clone(&trill));
    let estimator = PitchEstimator::start(&settings, Box::new(YinDetector::default()))
        .unwrap_or_else(|e| fatal!("Pitch detector failed to initialise: {e}"));

    let director = Arc::new(LevelDirector::new(
        Arc::clone(&game),
        Arc::clone(&levels),
        shutdown.clone(),
    ));
    let collab = Collaborators::new(
        director.clone(),
        Arc::new(ConsoleTone::default()),
        Arc::new(ConsoleDisplay::default()),
    );
    let ctx = ModeContext::new(
        game,
        trill,
        BeatClock::new(settings.time_ratio),
        Arc::clone(&levels),
        levels,
        settings.height_mapping(),
        collab,
    );
    Session { settings, ctx, director, estimator, receiver, shutdown }
}
