use super::airframe::Airframe;
use crate::level::Gate;
use strum_macros::Display;

/// What the glider ran into.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CollisionTag {
    Floor,
    Gate,
    Other,
}

impl From<&str> for CollisionTag {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "floor" => CollisionTag::Floor,
            "gate" | "hoop" => CollisionTag::Gate,
            _ => CollisionTag::Other,
        }
    }
}

/// Stand-in for the physics engine's contact events: reports touching the
/// ground plane and passing through gates, each gate once.
#[derive(Debug, Clone)]
pub struct CollisionProbe {
    ground_level: f32,
    gates: Vec<Gate>,
    cleared: Vec<bool>,
}

impl CollisionProbe {
    pub fn new(ground_level: f32, gates: Vec<Gate>) -> Self {
        let cleared = vec![false; gates.len()];
        Self { ground_level, gates, cleared }
    }

    /// Swaps in the gates of a new level.
    pub fn load_gates(&mut self, gates: Vec<Gate>) {
        self.cleared = vec![false; gates.len()];
        self.gates = gates;
    }

    pub fn detect(&mut self, airframe: &Airframe) -> Vec<CollisionTag> {
        if !airframe.is_alive() {
            return Vec::new();
        }
        let pos = airframe.position();
        let mut hits = Vec::new();
        for (gate, cleared) in self.gates.iter().zip(self.cleared.iter_mut()) {
            if !*cleared && pos.distance(gate.center()) <= gate.radius {
                *cleared = true;
                hits.push(CollisionTag::Gate);
            }
        }
        if pos.y <= self.ground_level {
            hits.push(CollisionTag::Floor);
        }
        hits
    }
}
