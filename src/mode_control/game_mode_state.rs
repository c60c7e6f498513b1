use std::sync::atomic::{AtomicI32, AtomicI64, Ordering};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Global phase of a run.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum GamePhase {
    NotStarted,
    Started,
    Won,
    Lost,
    /// A gate was cleared, the level director has not advanced yet.
    GateCleared,
}

impl GamePhase {
    const fn raw(self) -> i32 {
        match self {
            GamePhase::NotStarted => 0,
            GamePhase::Started => 1,
            GamePhase::Won => 2,
            GamePhase::Lost => -1,
            GamePhase::GateCleared => 3,
        }
    }

    fn from_raw(raw: i32) -> Self {
        GamePhase::iter().find(|p| p.raw() == raw).unwrap_or(GamePhase::NotStarted)
    }

    pub fn is_terminal(self) -> bool { matches!(self, GamePhase::Won | GamePhase::Lost) }
}

/// Coordination state shared by the flight controller and the level director.
///
/// Phase and level only change through compare-and-set, so a writer acting on a
/// stale read loses instead of overwriting somebody else's transition.
#[derive(Debug)]
pub struct GameModeState {
    phase: AtomicI32,
    level: AtomicI32,
    score: AtomicI64,
}

impl Default for GameModeState {
    fn default() -> Self { Self::new() }
}

impl GameModeState {
    /// Level index meaning "no level loaded".
    pub const NO_LEVEL: i32 = -1;

    pub fn new() -> Self {
        Self {
            phase: AtomicI32::new(GamePhase::NotStarted.raw()),
            level: AtomicI32::new(Self::NO_LEVEL),
            score: AtomicI64::new(0),
        }
    }

    pub fn phase(&self) -> GamePhase { GamePhase::from_raw(self.phase.load(Ordering::Acquire)) }

    /// Moves the phase from `from` to `to`, returns whether this call did it.
    pub fn transition_phase(&self, from: GamePhase, to: GamePhase) -> bool {
        self.phase
            .compare_exchange(from.raw(), to.raw(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Current level index, `None` while no level is loaded.
    pub fn level(&self) -> Option<usize> {
        usize::try_from(self.level.load(Ordering::Acquire)).ok()
    }

    /// Moves the level from `from` to `to` (`None` is "no level"), returns whether this call did it.
    pub fn transition_level(&self, from: Option<usize>, to: Option<usize>) -> bool {
        self.level
            .compare_exchange(
                Self::level_raw(from),
                Self::level_raw(to),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    pub fn score(&self) -> i64 { self.score.load(Ordering::Acquire) }

    pub fn add_score(&self, points: i64) -> i64 {
        self.score.fetch_add(points, Ordering::AcqRel) + points
    }

    fn level_raw(level: Option<usize>) -> i32 {
        level.and_then(|l| i32::try_from(l).ok()).unwrap_or(Self::NO_LEVEL)
    }
}
