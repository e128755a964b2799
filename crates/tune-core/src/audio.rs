/// Interleaved f32 samples in [-1, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct AudioClip { pub sample_rate: u32, pub channels: u16, pub samples: Vec<f32> }

impl AudioClip {
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self { sample_rate, channels: 1, samples }
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        if self.channels == 0 { 0 } else { self.samples.len() / self.channels as usize }
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 { 0.0 } else { self.frames() as f32 / self.sample_rate as f32 }
    }

    /// Root-mean-square over all samples.
    pub fn rms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
        (sum / self.samples.len() as f64).sqrt() as f32
    }
}
