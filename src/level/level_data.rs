use super::path::{LevelPaths, PathFunction, WaypointPath};
use crate::info;
use glam::Vec3;
use serde::Deserialize;
use std::{path::Path, sync::Arc};

#[derive(Debug, strum_macros::Display)]
pub enum LevelLoadError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    MissingIntroAnchors,
}

/// A point of the intro approach.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Anchor {
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroData {
    pub start_note: f32,
    pub path: Vec<Anchor>,
}

/// One note the player is expected to sing, kept for scoring.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct NoteEvent {
    pub note: f32,
    pub beat: f64,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct PathKey {
    pub beat: f64,
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    pub z: f32,
}

impl PathKey {
    pub fn position(&self) -> Vec3 { Vec3::new(self.x, self.y, self.z) }
}

/// A hoop the glider should fly through.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Gate {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub radius: f32,
}

impl Gate {
    pub fn center(&self) -> Vec3 { Vec3::new(self.x, self.y, self.z) }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Level {
    /// Note sequence of the level.
    #[serde(default)]
    pub level: Vec<NoteEvent>,
    #[serde(default)]
    pub path: Vec<PathKey>,
    #[serde(default)]
    pub gates: Vec<Gate>,
}

/// The whole level file.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelData {
    pub intro: IntroData,
    #[serde(default)]
    pub levels: Vec<Level>,
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, LevelLoadError> {
        let data: Self = serde_json::from_str(json).map_err(LevelLoadError::Parse)?;
        if data.intro.path.len() < 2 {
            return Err(LevelLoadError::MissingIntroAnchors);
        }
        Ok(data)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelLoadError> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(LevelLoadError::Io)?;
        let data = Self::from_json(&json)?;
        info!("Level data loaded from {}: {} levels", path.as_ref().display(), data.levels.len());
        Ok(data)
    }

    pub fn start_note(&self) -> f32 { self.intro.start_note }

    /// Start and end of the intro approach.
    pub fn intro_anchors(&self) -> Option<(Anchor, Anchor)> {
        match self.intro.path.as_slice() {
            [start, end, ..] => Some((*start, *end)),
            _ => None,
        }
    }

    pub fn level(&self, index: usize) -> Option<&Level> { self.levels.get(index) }

    pub fn level_count(&self) -> usize { self.levels.len() }
}

impl LevelPaths for LevelData {
    fn path_for(&self, level: usize) -> Option<Arc<dyn PathFunction>> {
        let keys = self.levels.get(level)?.path.clone();
        WaypointPath::new(keys).map(|p| Arc::new(p) as Arc<dyn PathFunction>)
    }
}
