//! Voice input: microphone capture into a rolling buffer and the pitch pipeline
//! that turns the newest buffer into a clamped pitch estimate once per frame.
//!
//! The cpal callback only ever pushes into a lock-free SPSC queue; the frame
//! loop drains it synchronously and never waits for samples.

mod frame;
mod microphone;
mod pitch_detector;
mod pitch_estimator;
mod yin_detector;

pub use frame::{AudioFrame, SampleRing};
pub use microphone::{Microphone, MicrophoneError};
pub use pitch_detector::{DetectorConfig, DetectorError, PitchDetector};
pub use pitch_estimator::{PitchEstimator, PitchSource};
pub use yin_detector::YinDetector;
