/// One fixed-length window of mono samples, rebuilt every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame(Vec<f32>);

impl AudioFrame {
    pub fn new(samples: Vec<f32>) -> Self { Self(samples) }
    pub fn samples(&self) -> &[f32] { &self.0 }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

/// Fixed capacity circular sample history remembering how much was ever written.
#[derive(Debug)]
pub struct SampleRing {
    buf: Vec<f32>,
    write_pos: usize,
    total_written: u64,
}

impl SampleRing {
    pub fn new(capacity: usize) -> Self {
        Self { buf: vec![0.0; capacity.max(1)], write_pos: 0, total_written: 0 }
    }

    pub fn capacity(&self) -> usize { self.buf.len() }

    pub fn total_written(&self) -> u64 { self.total_written }

    pub fn push(&mut self, sample: f32) {
        self.buf[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buf.len();
        self.total_written += 1;
    }

    pub fn extend_from_slice(&mut self, samples: &[f32]) {
        for &s in samples {
            self.push(s);
        }
    }

    /// The newest `len` samples, oldest first. `None` until `len` samples were written.
    pub fn latest(&self, len: usize) -> Option<AudioFrame> {
        if len > self.buf.len() || self.total_written < len as u64 {
            return None;
        }
        let cap = self.buf.len();
        let start = (self.write_pos + cap - len) % cap;
        let samples = (0..len).map(|i| self.buf[(start + i) % cap]).collect();
        Some(AudioFrame::new(samples))
    }
}
