use super::{
    frame::AudioFrame,
    microphone::Microphone,
    pitch_detector::{DetectorConfig, DetectorError, PitchDetector},
};
use crate::settings::{GameSettings, clamp_pitch};
use crate::{error, info, warn};

/// Anything the flight controller can pull a per-frame pitch from.
pub trait PitchSource {
    /// Recomputes the estimate if new audio is available and returns the held value.
    fn refresh(&mut self) -> f32;
    /// The last held value without touching the input.
    fn current(&self) -> f32;
}

/// Rolling microphone buffer plus the opaque detector.
///
/// Without a microphone the estimator stays usable: `capture` yields nothing
/// and the held pitch never changes.
pub struct PitchEstimator {
    mic: Option<Microphone>,
    detector: Box<dyn PitchDetector>,
    buffer_size: usize,
    height_offset: f32,
    last_pitch: f32,
    running: bool,
}

impl PitchEstimator {
    /// Opens the default microphone and initialises the detector.
    ///
    /// A missing microphone is logged and tolerated, a detector that fails to
    /// initialise is returned as an error.
    ///
    /// # Arguments
    /// * `settings` - Buffer size, sample rate, height offset and initial pitch.
    /// * `detector` - The DSP that turns a frame into a raw pitch.
    ///
    /// # Returns
    /// A running [`PitchEstimator`], or the [`DetectorError`] of `detector.initialize`.
    pub fn start(
        settings: &GameSettings,
        detector: Box<dyn PitchDetector>,
    ) -> Result<Self, DetectorError> {
        let mic = match Microphone::open_default(settings.buffer_size) {
            Ok(mic) => Some(mic),
            Err(e) => {
                error!("No microphone available ({e}), pitch control disabled!");
                None
            }
        };
        Self::with_microphone(mic, settings, detector)
    }

    pub fn with_microphone(
        mic: Option<Microphone>,
        settings: &GameSettings,
        mut detector: Box<dyn PitchDetector>,
    ) -> Result<Self, DetectorError> {
        let sample_rate = mic.as_ref().map_or(settings.sample_rate, Microphone::sample_rate);
        if sample_rate != settings.sample_rate {
            warn!("Microphone runs at {sample_rate} Hz instead of {} Hz", settings.sample_rate);
        }
        detector.initialize(&DetectorConfig {
            buffer_size: settings.buffer_size,
            hop_size: settings.hop_size(),
            sample_rate,
        })?;
        info!("Pitch detector ready: {} samples at {sample_rate} Hz", settings.buffer_size);
        Ok(Self {
            mic,
            detector,
            buffer_size: settings.buffer_size,
            height_offset: settings.height_offset,
            last_pitch: settings.initial_pitch,
            running: true,
        })
    }

    pub fn has_microphone(&self) -> bool { self.mic.is_some() }

    /// The newest full buffer, `None` if the microphone has not advanced far enough
    /// or there is no microphone.
    pub fn capture(&mut self) -> Option<AudioFrame> {
        self.mic.as_mut()?.latest_frame(self.buffer_size)
    }

    /// Raw detector result mapped into the game range: `clamp(raw + heightOffset, 0, 150)`.
    pub fn estimate(&mut self, frame: &AudioFrame) -> f32 {
        let raw = self.detector.detect(frame);
        clamp_pitch(raw + self.height_offset)
    }

    /// Releases the microphone and the detector. Idempotent.
    pub fn stop(&mut self) {
        if let Some(mut mic) = self.mic.take() {
            mic.release();
        }
        if self.running {
            self.detector.cleanup();
            self.running = false;
            info!("Pitch estimator stopped");
        }
    }
}

impl PitchSource for PitchEstimator {
    fn refresh(&mut self) -> f32 {
        if let Some(frame) = self.capture() {
            let pitch = self.estimate(&frame);
            // NaN survives clamping, keep the previous value instead
            if pitch.is_finite() {
                self.last_pitch = pitch;
            }
        }
        self.last_pitch
    }

    fn current(&self) -> f32 { self.last_pitch }
}

impl Drop for PitchEstimator {
    fn drop(&mut self) { self.stop(); }
}
