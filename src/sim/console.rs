use crate::flight_control::{InstructionDisplay, ReferenceTone};
use crate::{info, log};
use std::sync::Mutex;

/// Reference tone that announces the note on the console instead of playing it.
#[derive(Debug, Default)]
pub struct ConsoleTone {
    playing: Mutex<Option<f32>>,
}

impl ConsoleTone {
    pub fn playing(&self) -> Option<f32> { self.playing.lock().map_or(None, |p| *p) }
}

impl ReferenceTone for ConsoleTone {
    fn start_note(&self, note: f32) {
        if let Ok(mut playing) = self.playing.lock() {
            *playing = Some(note);
        }
        info!("Playing reference note {note}");
    }

    fn stop_note(&self) {
        let stopped = self.playing.lock().ok().and_then(|mut p| p.take());
        if let Some(note) = stopped {
            log!("Stopped reference note {note}");
        }
    }
}

/// Instruction text printed to the console.
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    shown: Mutex<Option<String>>,
}

impl ConsoleDisplay {
    pub fn text(&self) -> Option<String> { self.shown.lock().map_or(None, |s| s.clone()) }
}

impl InstructionDisplay for ConsoleDisplay {
    fn show(&self, text: &str) {
        if let Ok(mut shown) = self.shown.lock() {
            *shown = Some(text.to_string());
        }
        info!(">> {text}");
    }

    fn hide(&self) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.take();
        }
    }
}
