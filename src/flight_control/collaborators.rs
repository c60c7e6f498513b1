use glam::Vec3;
use std::sync::Arc;

/// Owner of scene and level transitions.
pub trait SceneManager: Send + Sync {
    /// The run was lost.
    fn end_game(&self);
    /// Visual feedback at the crash site.
    fn spawn_failure_effect(&self, at: Vec3);
}

/// Plays the note the player has to match before take-off.
pub trait ReferenceTone: Send + Sync {
    fn start_note(&self, note: f32);
    fn stop_note(&self);
}

/// On-screen instruction text.
pub trait InstructionDisplay: Send + Sync {
    fn show(&self, text: &str);
    fn hide(&self);
}

/// The external systems the controller notifies.
#[derive(Clone)]
pub struct Collaborators {
    scene: Arc<dyn SceneManager>,
    tone: Arc<dyn ReferenceTone>,
    display: Arc<dyn InstructionDisplay>,
}

impl Collaborators {
    pub fn new(
        scene: Arc<dyn SceneManager>,
        tone: Arc<dyn ReferenceTone>,
        display: Arc<dyn InstructionDisplay>,
    ) -> Self {
        Self { scene, tone, display }
    }

    pub fn scene(&self) -> &Arc<dyn SceneManager> { &self.scene }
    pub fn tone(&self) -> &Arc<dyn ReferenceTone> { &self.tone }
    pub fn display(&self) -> &Arc<dyn InstructionDisplay> { &self.display }
}
