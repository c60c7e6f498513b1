use super::level_data::PathKey;
use glam::Vec3;
use itertools::Itertools;
use std::sync::Arc;

/// Precomputed, time indexed flight path of one level.
pub trait PathFunction: Send + Sync {
    /// Position after `elapsed_beats` beats into the level.
    fn position(&self, elapsed_beats: f64) -> Vec3;
    /// Travel direction after `elapsed_beats` beats into the level.
    fn forward(&self, elapsed_beats: f64) -> Vec3;
}

/// Supplies the path of each level.
pub trait LevelPaths: Send + Sync {
    fn path_for(&self, level: usize) -> Option<Arc<dyn PathFunction>>;
}

/// Piecewise linear path through beat stamped keyframes.
#[derive(Debug, Clone)]
pub struct WaypointPath {
    keys: Vec<PathKey>,
}

impl WaypointPath {
    /// Builds a path through `keys`, sorted by beat.
    ///
    /// # Arguments
    /// * `keys` - Beat stamped keyframes in any order.
    ///
    /// # Returns
    /// `None` for an empty key list.
    pub fn new(mut keys: Vec<PathKey>) -> Option<Self> {
        if keys.is_empty() {
            return None;
        }
        keys.sort_by(|a, b| a.beat.total_cmp(&b.beat));
        Some(Self { keys })
    }

    /// The keyframe pair around `beat` and the interpolation factor between them.
    #[allow(clippy::cast_possible_truncation)]
    fn segment(&self, beat: f64) -> (&PathKey, &PathKey, f32) {
        let first = &self.keys[0];
        let last = &self.keys[self.keys.len() - 1];
        if beat <= first.beat {
            return match self.keys.get(1) {
                Some(next) => (first, next, 0.0),
                None => (first, first, 0.0),
            };
        }
        self.keys
            .iter()
            .tuple_windows()
            .find(|(_, b)| beat <= b.beat)
            .map_or_else(
                || match self.keys.len() {
                    1 => (last, last, 0.0),
                    n => (&self.keys[n - 2], last, 1.0),
                },
                |(a, b)| {
                    let span = b.beat - a.beat;
                    let t = if span > 0.0 { (beat - a.beat) / span } else { 1.0 };
                    (a, b, t as f32)
                },
            )
    }
}

impl PathFunction for WaypointPath {
    fn position(&self, elapsed_beats: f64) -> Vec3 {
        let (a, b, t) = self.segment(elapsed_beats);
        a.position().lerp(b.position(), t)
    }

    fn forward(&self, elapsed_beats: f64) -> Vec3 {
        let (a, b, _) = self.segment(elapsed_beats);
        let dir = (b.position() - a.position()).normalize_or_zero();
        if dir == Vec3::ZERO { Vec3::Z } else { dir }
    }
}
