//! Analysis tap — keeps the most recent output samples for visualization.

/// Samples held by the tap (WebAudio `fftSize`).
pub const FFT_SIZE: usize = 2048;
/// Samples handed to the visualizer per frame (`frequencyBinCount`).
pub const FRAME_SIZE: usize = FFT_SIZE / 2;

/// A fixed-size ring buffer written by the render path.
#[derive(Debug, Clone)]
pub struct AnalyserTap {
    ring: Vec<f32>,
    write_pos: usize,
}

impl AnalyserTap {
    pub fn new() -> Self {
        AnalyserTap {
            ring: vec![0.0; FFT_SIZE],
            write_pos: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.ring[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % FFT_SIZE;
    }

    /// The newest `out.len()` samples, oldest first.
    pub fn time_domain(&self, out: &mut [f32]) {
        let n = out.len().min(FFT_SIZE);
        let start = (self.write_pos + FFT_SIZE - n) % FFT_SIZE;
        for (i, slot) in out.iter_mut().take(n).enumerate() {
            *slot = self.ring[(start + i) % FFT_SIZE];
        }
    }

    /// The newest [`FRAME_SIZE`] samples as bytes centred on 128, like
    /// `AnalyserNode.getByteTimeDomainData`.
    pub fn byte_time_domain(&self) -> Vec<u8> {
        let mut samples = [0.0f32; FRAME_SIZE];
        self.time_domain(&mut samples);
        samples.iter().map(|&s| to_byte(s)).collect()
    }
}

impl Default for AnalyserTap {
    fn default() -> Self {
        Self::new()
    }
}

fn to_byte(sample: f32) -> u8 {
    (128.0 + 128.0 * sample).clamp(0.0, 255.0) as u8
}
