use super::frame::{AudioFrame, SampleRing};
use crate::{error, info};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use rtrb::{Consumer, Producer, RingBuffer};

#[derive(Debug, strum_macros::Display)]
pub enum MicrophoneError {
    NoInputDevice,
    UnsupportedConfig,
    UnsupportedSampleFormat,
    StreamBuild,
    StreamPlay,
}

/// Live microphone feed.
///
/// The cpal stream pushes the first channel of every callback into an SPSC
/// queue; [`Microphone::latest_frame`] drains it into the history ring on the
/// frame loop. Dropping the microphone stops the stream.
pub struct Microphone {
    stream: Option<Stream>,
    consumer: Consumer<f32>,
    ring: SampleRing,
    sample_rate: u32,
    device_name: String,
}

impl Microphone {
    /// Opens the default input device with its default configuration.
    ///
    /// `history` is the number of samples kept for [`Microphone::latest_frame`].
    pub fn open_default(history: usize) -> Result<Self, MicrophoneError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(MicrophoneError::NoInputDevice)?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        let supported =
            device.default_input_config().map_err(|_| MicrophoneError::UnsupportedConfig)?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.config();
        let sample_rate = config.sample_rate.0;

        // one second of slack between callback and frame loop
        let (producer, consumer) = RingBuffer::<f32>::new(sample_rate.max(1) as usize);
        let stream = match sample_format {
            SampleFormat::F32 => build_input::<f32>(&device, &config, producer),
            SampleFormat::I16 => build_input::<i16>(&device, &config, producer),
            SampleFormat::U16 => build_input::<u16>(&device, &config, producer),
            SampleFormat::I32 => build_input::<i32>(&device, &config, producer),
            _ => Err(MicrophoneError::UnsupportedSampleFormat),
        }?;
        stream.play().map_err(|_| MicrophoneError::StreamPlay)?;
        info!("Microphone started: {device_name} ({sample_rate} Hz, {sample_format:?})");

        Ok(Self {
            stream: Some(stream),
            consumer,
            ring: SampleRing::new(history),
            sample_rate,
            device_name,
        })
    }

    /// A microphone fed by an arbitrary producer instead of a device stream.
    pub fn from_consumer(consumer: Consumer<f32>, sample_rate: u32, history: usize) -> Self {
        Self {
            stream: None,
            consumer,
            ring: SampleRing::new(history),
            sample_rate,
            device_name: "detached".to_string(),
        }
    }

    pub fn sample_rate(&self) -> u32 { self.sample_rate }

    pub fn device_name(&self) -> &str { &self.device_name }

    /// Total number of samples that reached the history ring so far.
    pub fn position(&self) -> u64 { self.ring.total_written() }

    /// Drains pending samples and returns the newest `len` of them.
    ///
    /// Never blocks: `None` until at least `len` samples have been recorded.
    pub fn latest_frame(&mut self, len: usize) -> Option<AudioFrame> {
        while let Ok(sample) = self.consumer.pop() {
            self.ring.push(sample);
        }
        self.ring.latest(len)
    }

    /// Stops the device stream. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                error!("Failed to pause microphone stream: {e}");
            }
            info!("Microphone released: {}", self.device_name);
        }
    }
}

impl Drop for Microphone {
    fn drop(&mut self) { self.release(); }
}

fn build_input<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut producer: Producer<f32>,
) -> Result<Stream, MicrophoneError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = usize::from(config.channels.max(1));
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                for frame in data.chunks(channels) {
                    if let Some(&first) = frame.first() {
                        // a full queue drops samples, the frame loop only wants the newest ones
                        let _ = producer.push(f32::from_sample(first));
                    }
                }
            },
            |err| error!("Microphone stream error: {err}"),
            None,
        )
        .map_err(|_| MicrophoneError::StreamBuild)
}
