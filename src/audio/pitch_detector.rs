use super::frame::AudioFrame;

/// Parameters a detector is initialised with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorConfig {
    pub buffer_size: usize,
    pub hop_size: usize,
    pub sample_rate: u32,
}

#[derive(Debug, strum_macros::Display)]
pub enum DetectorError {
    InvalidBufferSize,
    InvalidHopSize,
    InvalidSampleRate,
}

impl DetectorConfig {
    pub const MIN_BUFFER_SIZE: usize = 64;

    pub fn validate(&self) -> Result<(), DetectorError> {
        if self.buffer_size < Self::MIN_BUFFER_SIZE {
            return Err(DetectorError::InvalidBufferSize);
        }
        if self.hop_size == 0 || self.hop_size > self.buffer_size {
            return Err(DetectorError::InvalidHopSize);
        }
        if self.sample_rate == 0 {
            return Err(DetectorError::InvalidSampleRate);
        }
        Ok(())
    }
}

/// Opaque pitch extraction: one audio buffer in, one raw pitch (MIDI note) out.
///
/// `initialize` and `cleanup` bracket the lifetime of the owning estimator.
pub trait PitchDetector {
    fn initialize(&mut self, config: &DetectorConfig) -> Result<(), DetectorError> {
        config.validate()
    }

    fn detect(&mut self, frame: &AudioFrame) -> f32;

    fn cleanup(&mut self) {}
}

impl<F> PitchDetector for F
where
    F: FnMut(&AudioFrame) -> f32,
{
    fn detect(&mut self, frame: &AudioFrame) -> f32 { self(frame) }
}
