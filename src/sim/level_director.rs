use crate::flight_control::SceneManager;
use crate::level::{Gate, LevelData};
use crate::mode_control::{GameModeState, GamePhase};
use crate::{info, warn};
use glam::Vec3;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio_util::sync::CancellationToken;

/// Owns level progression and the end of a run.
///
/// Advances to the next level after a cleared gate, declares the win after the
/// last one and cancels the shutdown token when the run is over.
pub struct LevelDirector {
    game: Arc<GameModeState>,
    levels: Arc<LevelData>,
    shutdown: CancellationToken,
    ended: AtomicBool,
}

impl LevelDirector {
    pub fn new(game: Arc<GameModeState>, levels: Arc<LevelData>, shutdown: CancellationToken) -> Self {
        Self { game, levels, shutdown, ended: AtomicBool::new(false) }
    }

    pub fn is_ended(&self) -> bool { self.ended.load(Ordering::Acquire) }

    /// Gates of `level`, empty for unknown levels.
    pub fn gates_for(&self, level: usize) -> Vec<Gate> {
        self.levels.level(level).map(|l| l.gates.clone()).unwrap_or_default()
    }

    /// Reacts to a cleared gate. Returns the level that was entered, if any.
    pub fn on_frame(&self) -> Option<usize> {
        if self.game.phase() != GamePhase::GateCleared {
            return None;
        }
        let level = self.game.level()?;
        let next = level + 1;
        if next < self.levels.level_count() {
            if !self.enter_level(level, next) {
                return None;
            }
            info!("Level {level} cleared, entering level {next}");
            Some(next)
        } else {
            if self.game.transition_phase(GamePhase::GateCleared, GamePhase::Won) {
                info!("All {} levels cleared with score {}!", next, self.game.score());
                self.finish();
            }
            None
        }
    }

    /// Moves from a cleared gate on `level` to `next`.
    ///
    /// # Arguments
    /// * `level` - The level whose gate was cleared.
    /// * `next` - The level to enter.
    ///
    /// # Returns
    /// `true` if both phase and level were moved by this call. Otherwise neither
    /// is left half changed.
    pub(super) fn enter_level(&self, level: usize, next: usize) -> bool {
        if !self.game.transition_phase(GamePhase::GateCleared, GamePhase::Started) {
            warn!("Phase changed to {} before entering level {next}", self.game.phase());
            return false;
        }
        if self.game.transition_level(Some(level), Some(next)) {
            return true;
        }
        warn!("Level moved to {:?} before entering level {next}", self.game.level());
        self.game.transition_phase(GamePhase::Started, GamePhase::GateCleared);
        false
    }

    fn finish(&self) {
        if !self.ended.swap(true, Ordering::AcqRel) {
            self.shutdown.cancel();
        }
    }
}

impl SceneManager for LevelDirector {
    fn end_game(&self) {
        warn!("Game over at level {:?} with score {}", self.game.level(), self.game.score());
        self.finish();
    }

    fn spawn_failure_effect(&self, at: Vec3) {
        warn!("*** Explosion at {at} ***");
    }
}
