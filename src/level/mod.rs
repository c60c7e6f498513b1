//! Authored level content and the path functions that drive planar motion.

mod level_data;
mod path;

pub use level_data::{Anchor, Gate, IntroData, Level, LevelData, LevelLoadError, NoteEvent, PathKey};
pub use path::{LevelPaths, PathFunction, WaypointPath};
