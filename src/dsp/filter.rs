//! Biquad low/high-pass with WebAudio `BiquadFilterNode` coefficients.

use std::f64::consts::PI;

/// Q used by both the low-cut and the high-cut stage, in dB as WebAudio
/// reads it for lowpass and highpass.
pub const CUT_Q: f64 = 0.7;

/// Filter type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterType {
    Lowpass,
    Highpass,
}

/// A biquad IIR filter (2nd order).
///
/// Implements the standard Direct Form II Transposed structure.
/// Coefficient formulas from the Audio EQ Cookbook (Robert Bristow-Johnson),
/// with Q taken in dB: `alpha = sin(w0) / (2 * 10^(Q/20))`.
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    pub filter_type: FilterType,
    frequency: f64,
    q_db: f64,

    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,

    z1: f64,
    z2: f64,

    sample_rate: f64,
}

impl BiquadFilter {
    pub fn new(filter_type: FilterType, frequency: f64, sample_rate: f64) -> Self {
        let mut f = BiquadFilter {
            filter_type,
            frequency,
            q_db: CUT_Q,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
            sample_rate,
        };
        f.update_coefficients();
        f
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Set the cutoff and recompute coefficients if it changed.
    pub fn set_frequency(&mut self, freq: f64) {
        if freq != self.frequency {
            self.frequency = freq;
            self.update_coefficients();
        }
    }

    fn update_coefficients(&mut self) {
        // Keep the cutoff strictly inside (0, nyquist) so w0 stays well-formed.
        let nyquist = self.sample_rate / 2.0;
        let freq = self.frequency.clamp(1.0, nyquist * 0.999);

        let w0 = 2.0 * PI * freq / self.sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * 10f64.powf(self.q_db / 20.0));

        let (b0, b1, b2) = match self.filter_type {
            FilterType::Lowpass => {
                let b1 = 1.0 - cos_w0;
                (b1 / 2.0, b1, b1 / 2.0)
            }
            FilterType::Highpass => {
                let b0 = (1.0 + cos_w0) / 2.0;
                (b0, -(1.0 + cos_w0), b0)
            }
        };
        let a0 = 1.0 + alpha;

        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = -2.0 * cos_w0 / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    /// Process a single sample through the filter.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_amplitude(f: &mut BiquadFilter, freq: f64, sr: f64) -> f64 {
        let mut max_out = 0.0_f64;
        for i in 0..(sr as usize / 5) {
            let t = i as f64 / sr;
            let out = f.process((2.0 * PI * freq * t).sin());
            if i > 2000 {
                max_out = max_out.max(out.abs());
            }
        }
        max_out
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut f = BiquadFilter::new(FilterType::Lowpass, 5000.0, 44100.0);
        let mut output = 0.0;
        for _ in 0..1000 {
            output = f.process(1.0);
        }
        assert!((output - 1.0).abs() < 0.001, "Lowpass should pass DC, got {output}");
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut f = BiquadFilter::new(FilterType::Highpass, 1000.0, 44100.0);
        let mut output = 0.0;
        for _ in 0..1000 {
            output = f.process(1.0);
        }
        assert!(output.abs() < 0.001, "Highpass should block DC, got {output}");
    }

    #[test]
    fn low_cut_at_20hz_is_transparent_for_mids() {
        let mut f = BiquadFilter::new(FilterType::Highpass, 20.0, 44100.0);
        let amp = sine_amplitude(&mut f, 1000.0, 44100.0);
        assert!((amp - 1.0).abs() < 0.01, "1 kHz through 20 Hz low-cut: {amp}");
    }

    #[test]
    fn high_cut_attenuates_above_cutoff() {
        let mut f = BiquadFilter::new(FilterType::Lowpass, 500.0, 44100.0);
        let amp = sine_amplitude(&mut f, 8000.0, 44100.0);
        assert!(amp < 0.01, "8 kHz through 500 Hz high-cut: {amp}");
    }

    #[test]
    fn cutoff_above_nyquist_stays_stable() {
        // 20 kHz default high-cut on a 22.05 kHz context.
        let mut f = BiquadFilter::new(FilterType::Lowpass, 20000.0, 22050.0);
        for i in 0..10000 {
            let input = if i % 50 == 0 { 1.0 } else { -0.5 };
            let out = f.process(input);
            assert!(out.is_finite(), "Filter output not finite at sample {i}");
        }
    }

    #[test]
    fn q_is_read_in_decibels() {
        // 0.7 dB resonance: |H| at the cutoff is 10^(0.7/20), not 0.7.
        let sr = 44100.0;
        let mut f = BiquadFilter::new(FilterType::Lowpass, 1000.0, sr);
        let amp = sine_amplitude(&mut f, 1000.0, sr);
        let expected = 10f64.powf(CUT_Q / 20.0);
        assert!((amp - expected).abs() < 0.01, "gain at cutoff {amp}, expected {expected}");
    }

    #[test]
    fn set_frequency_recomputes() {
        let mut f = BiquadFilter::new(FilterType::Lowpass, 20000.0, 44100.0);
        f.set_frequency(300.0);
        assert_eq!(f.frequency(), 300.0);
        let amp = sine_amplitude(&mut f, 6000.0, 44100.0);
        assert!(amp < 0.02, "retuned lowpass should cut 6 kHz: {amp}");
    }
}
