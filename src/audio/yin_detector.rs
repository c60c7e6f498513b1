use super::{
    frame::AudioFrame,
    pitch_detector::{DetectorConfig, DetectorError, PitchDetector},
};

/// YIN fundamental frequency estimator reporting MIDI note numbers.
///
/// Returns `0.0` for silence or unvoiced input, like the DSP library the
/// levels were tuned with.
#[derive(Debug)]
pub struct YinDetector {
    threshold: f32,
    sample_rate: u32,
    cmnd: Vec<f32>,
}

impl Default for YinDetector {
    fn default() -> Self { Self::new(Self::DEF_THRESHOLD) }
}

impl YinDetector {
    const DEF_THRESHOLD: f32 = 0.15;
    const SILENCE_RMS: f32 = 1e-4;

    pub fn new(threshold: f32) -> Self { Self { threshold, sample_rate: 0, cmnd: Vec::new() } }

    pub fn is_initialized(&self) -> bool { self.sample_rate > 0 }

    /// Converts a frequency in Hz to a (fractional) MIDI note.
    pub fn hz_to_midi(freq: f32) -> f32 { 69.0 + 12.0 * (freq / 440.0).log2() }

    /// Estimates the period in (fractional) samples, `None` if nothing periodic was found.
    #[allow(clippy::cast_precision_loss)]
    fn estimate_period(&mut self, samples: &[f32]) -> Option<f32> {
        let window = samples.len() / 2;
        if window < 3 {
            return None;
        }
        self.cmnd.clear();
        self.cmnd.resize(window, 1.0);

        // difference function with cumulative mean normalisation in one pass
        let mut running_sum = 0.0_f32;
        for tau in 1..window {
            let d: f32 = (0..window)
                .map(|j| {
                    let delta = samples[j] - samples[j + tau];
                    delta * delta
                })
                .sum();
            running_sum += d;
            self.cmnd[tau] =
                if running_sum > f32::EPSILON { d * tau as f32 / running_sum } else { 1.0 };
        }

        let mut tau = 2;
        while tau < window {
            if self.cmnd[tau] < self.threshold {
                while tau + 1 < window && self.cmnd[tau + 1] < self.cmnd[tau] {
                    tau += 1;
                }
                return Some(self.refine(tau));
            }
            tau += 1;
        }
        None
    }

    /// Parabolic interpolation around the chosen lag.
    #[allow(clippy::cast_precision_loss)]
    fn refine(&self, tau: usize) -> f32 {
        if tau == 0 || tau + 1 >= self.cmnd.len() {
            return tau as f32;
        }
        let (s0, s1, s2) = (self.cmnd[tau - 1], self.cmnd[tau], self.cmnd[tau + 1]);
        let denom = 2.0 * (2.0 * s1 - s2 - s0);
        if denom.abs() < f32::EPSILON {
            tau as f32
        } else {
            tau as f32 + (s2 - s0) / denom
        }
    }
}

impl PitchDetector for YinDetector {
    fn initialize(&mut self, config: &DetectorConfig) -> Result<(), DetectorError> {
        config.validate()?;
        self.sample_rate = config.sample_rate;
        self.cmnd = Vec::with_capacity(config.buffer_size / 2);
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn detect(&mut self, frame: &AudioFrame) -> f32 {
        if !self.is_initialized() || frame.is_empty() {
            return 0.0;
        }
        let samples = frame.samples();
        let rms = (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt();
        if rms < Self::SILENCE_RMS {
            return 0.0;
        }
        match self.estimate_period(samples) {
            Some(period) if period > 0.0 => {
                Self::hz_to_midi(self.sample_rate as f32 / period).max(0.0)
            }
            _ => 0.0,
        }
    }

    fn cleanup(&mut self) {
        self.sample_rate = 0;
        self.cmnd = Vec::new();
    }
}
