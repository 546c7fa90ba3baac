//! Noise buffer factory — one seamless-loop buffer per noise color.
//!
//! Every generator is a pure function of the buffer length and a uniform
//! random source: the same seeded source always yields a bit-identical
//! buffer. White samples are drawn as `u * 2 - 1` with `u` uniform in [0, 1).

use std::sync::Arc;

use rand::Rng;
use rand::distributions::{Distribution, Standard};

use crate::color::NoiseColor;

/// Length of every generated buffer, in seconds.
pub const BUFFER_SECONDS: usize = 2;

/// Output scaling of the Kellet pink filter.
pub const PINK_GAIN: f64 = 0.11;
/// Makeup gain after the brown integrator's leak.
pub const BROWN_GAIN: f64 = 3.5;
/// Peak level blue noise is normalized to.
pub const BLUE_PEAK: f32 = 0.7;
/// Peak level violet noise is normalized to.
pub const VIOLET_PEAK: f32 = 0.5;

/// An immutable block of looping noise samples in [-1, 1].
#[derive(Debug, Clone)]
pub struct NoiseBuffer {
    pub color: NoiseColor,
    pub sample_rate: u32,
    /// Always true: buffers are played as seamless loops.
    pub looped: bool,
    samples: Arc<[f32]>,
}

impl NoiseBuffer {
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// A shared handle to the sample data, for the loop players.
    pub fn shared(&self) -> Arc<[f32]> {
        Arc::clone(&self.samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        peak(&self.samples)
    }
}

/// Number of samples in a buffer generated at `sample_rate`.
pub fn buffer_len(sample_rate: u32) -> usize {
    BUFFER_SECONDS * sample_rate as usize
}

/// Generate the looped buffer for one color.
pub fn generate<R: Rng + ?Sized>(color: NoiseColor, sample_rate: u32, rng: &mut R) -> NoiseBuffer {
    let mut samples = vec![0.0f32; buffer_len(sample_rate)];
    fill(color, &mut samples, rng);
    NoiseBuffer {
        color,
        sample_rate,
        looped: true,
        samples: samples.into(),
    }
}

/// Generate one buffer per color, in [`NoiseColor::ALL`] order.
pub fn generate_all<R: Rng + ?Sized>(sample_rate: u32, rng: &mut R) -> [NoiseBuffer; 5] {
    NoiseColor::ALL.map(|color| generate(color, sample_rate, rng))
}

/// Fill `out` with noise of the given color. The length of `out` is the
/// duration.
pub fn fill<R: Rng + ?Sized>(color: NoiseColor, out: &mut [f32], rng: &mut R) {
    match color {
        NoiseColor::White => fill_white(out, rng),
        NoiseColor::Pink => fill_pink(out, rng),
        NoiseColor::Brown => fill_brown(out, rng),
        NoiseColor::Blue => fill_blue(out, rng),
        NoiseColor::Violet => fill_violet(out, rng),
    }
}

#[inline]
fn white_sample<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u: f64 = Standard.sample(rng);
    u * 2.0 - 1.0
}

/// Flat spectrum: independent uniform draws.
pub fn fill_white<R: Rng + ?Sized>(out: &mut [f32], rng: &mut R) {
    for sample in out.iter_mut() {
        *sample = white_sample(rng) as f32;
    }
}

/// -3 dB/octave via Paul Kellet's refined pink filter.
pub fn fill_pink<R: Rng + ?Sized>(out: &mut [f32], rng: &mut R) {
    let mut b = [0.0f64; 7];

    for sample in out.iter_mut() {
        let white = white_sample(rng);

        b[0] = 0.99886 * b[0] + white * 0.0555179;
        b[1] = 0.99332 * b[1] + white * 0.0750759;
        b[2] = 0.96900 * b[2] + white * 0.1538520;
        b[3] = 0.86650 * b[3] + white * 0.3104856;
        b[4] = 0.55000 * b[4] + white * 0.5329522;
        b[5] = -0.7616 * b[5] - white * 0.0168980;

        let pink = (b.iter().sum::<f64>() + white * 0.5362) * PINK_GAIN;
        b[6] = white * 0.115926;

        *sample = pink.clamp(-1.0, 1.0) as f32;
    }
}

/// -6 dB/octave via a leaky integrator.
pub fn fill_brown<R: Rng + ?Sized>(out: &mut [f32], rng: &mut R) {
    let mut last = 0.0f64;

    for sample in out.iter_mut() {
        let white = white_sample(rng);
        last = (last + 0.02 * white) / 1.02;
        // The leak keeps |last| <= 1, but the 3.5x makeup gain does not.
        *sample = (last * BROWN_GAIN).clamp(-1.0, 1.0) as f32;
    }
}

/// +3 dB/octave: smoothed first difference, normalized to [`BLUE_PEAK`].
pub fn fill_blue<R: Rng + ?Sized>(out: &mut [f32], rng: &mut R) {
    let mut last_white = 0.0f64;
    let mut last = 0.0f64;

    for sample in out.iter_mut() {
        let white = white_sample(rng);
        let diff = white - last_white;
        last_white = white;
        last = 0.7 * diff + 0.3 * last;
        *sample = last as f32;
    }

    normalize_peak(out, BLUE_PEAK);
}

/// +6 dB/octave: pure first difference, normalized to [`VIOLET_PEAK`].
pub fn fill_violet<R: Rng + ?Sized>(out: &mut [f32], rng: &mut R) {
    let mut last_white = 0.0f64;

    for sample in out.iter_mut() {
        let white = white_sample(rng);
        *sample = (white - last_white) as f32;
        last_white = white;
    }

    normalize_peak(out, VIOLET_PEAK);
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

/// Scale so the largest absolute sample equals `target`. All-zero input is
/// left untouched.
fn normalize_peak(samples: &mut [f32], target: f32) {
    let peak = peak(samples);
    if peak <= 0.0 {
        return;
    }
    for s in samples.iter_mut() {
        *s = *s / peak * target;
    }
}
