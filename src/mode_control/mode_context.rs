use super::game_mode_state::GameModeState;
use crate::flight_control::{BeatClock, Collaborators};
use crate::level::{LevelData, LevelPaths};
use crate::settings::HeightMapping;
use crate::trill_link::TrillState;
use std::sync::Arc;

/// Everything the flight controller reads or writes besides its own mode,
/// handed to it explicitly on every frame.
pub struct ModeContext {
    game: Arc<GameModeState>,
    trill: Arc<TrillState>,
    clock: BeatClock,
    levels: Arc<LevelData>,
    paths: Arc<dyn LevelPaths>,
    height: HeightMapping,
    collab: Collaborators,
}

impl ModeContext {
    pub fn new(
        game: Arc<GameModeState>,
        trill: Arc<TrillState>,
        clock: BeatClock,
        levels: Arc<LevelData>,
        paths: Arc<dyn LevelPaths>,
        height: HeightMapping,
        collab: Collaborators,
    ) -> Self {
        Self { game, trill, clock, levels, paths, height, collab }
    }

    pub fn game(&self) -> &Arc<GameModeState> { &self.game }
    pub fn trill_active(&self) -> bool { self.trill.is_active() }
    pub fn clock(&self) -> &BeatClock { &self.clock }
    pub fn clock_mut(&mut self) -> &mut BeatClock { &mut self.clock }
    pub fn levels(&self) -> &Arc<LevelData> { &self.levels }
    pub fn paths(&self) -> &Arc<dyn LevelPaths> { &self.paths }
    pub fn height(&self) -> &HeightMapping { &self.height }
    pub fn collab(&self) -> &Collaborators { &self.collab }
}
