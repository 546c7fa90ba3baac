//! Low-frequency sine oscillator driving the tremolo.

use std::f64::consts::PI;

/// A phase-accumulating sine oscillator.
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f64,
    sample_rate: f64,
}

impl Lfo {
    pub fn new(sample_rate: f64) -> Self {
        Lfo {
            phase: 0.0,
            sample_rate,
        }
    }

    /// Generate the next sample at `frequency` Hz, in [-1, 1].
    ///
    /// Frequency is passed per sample so it can follow a smoothed parameter.
    #[inline]
    pub fn next_sample(&mut self, frequency: f64) -> f64 {
        let sample = (2.0 * PI * self.phase).sin();

        self.phase += frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        sample
    }
}
