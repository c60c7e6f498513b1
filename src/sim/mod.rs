//! Headless stand-ins for the scene around the glider: the level director that
//! owns level progression and the end of a run, plus console backed tone and text output.

mod console;
mod level_director;

pub use console::{ConsoleDisplay, ConsoleTone};
pub use level_director::LevelDirector;
