//! Signal graph — the fixed noise → gain → master → filters → analyser chain.
//!
//! ```text
//! white  ─ gain ─┐
//! pink   ─ gain ─┤
//! brown  ─ gain ─┼─ master gain ─ low-cut ─ high-cut ─ analyser ─ out
//! blue   ─ gain ─┤      ▲
//! violet ─ gain ─┘      └─ lfo ─ lfo gain (tremolo)
//! ```
//!
//! The topology is wired once in [`SignalGraph::new`]; afterwards only
//! parameter targets change, and every change is an exponential ramp.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use crate::color::NoiseColor;
use crate::settings::{self, MixSettings};

use super::analyser::AnalyserTap;
use super::filter::{BiquadFilter, FilterType};
use super::noise::{self, NoiseBuffer};
use super::oscillator::Lfo;
use super::ramp::{SMOOTHING_TIME, SmoothedParam};

/// Frames per block; filter cutoffs update once per block.
pub const RENDER_QUANTUM: usize = 128;

/// Largest tremolo swing on the master gain (depth 1.0).
pub const MAX_MODULATION: f64 = 0.5;

/// Plays a shared buffer on repeat from offset 0.
#[derive(Debug, Clone)]
pub struct LoopPlayer {
    samples: Arc<[f32]>,
    position: usize,
}

impl LoopPlayer {
    pub fn new(samples: Arc<[f32]>) -> Self {
        LoopPlayer {
            samples,
            position: 0,
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sample = self.samples[self.position];
        self.position += 1;
        if self.position == self.samples.len() {
            self.position = 0;
        }
        sample as f64
    }

    pub fn samples(&self) -> &Arc<[f32]> {
        &self.samples
    }
}

/// One noise source and its level.
#[derive(Debug, Clone)]
struct ColorChannel {
    player: LoopPlayer,
    gain: SmoothedParam,
}

#[derive(Debug, Clone)]
pub struct SignalGraph {
    sample_rate: u32,
    channels: [ColorChannel; 5],
    master: SmoothedParam,

    lfo: Lfo,
    lfo_rate: SmoothedParam,
    lfo_gain: SmoothedParam,

    low_cut: SmoothedParam,
    low_cut_filter: BiquadFilter,
    high_cut: SmoothedParam,
    high_cut_filter: BiquadFilter,

    analyser: AnalyserTap,
}

impl SignalGraph {
    /// Generate the five buffers and wire the graph.
    pub fn build<R: Rng + ?Sized>(sample_rate: u32, settings: &MixSettings, rng: &mut R) -> Self {
        SignalGraph::new(noise::generate_all(sample_rate, rng), settings)
    }

    /// Wire the graph around already generated buffers. Color gains start
    /// at 0; master, filters and modulation start at the settings' values.
    pub fn new(buffers: [NoiseBuffer; 5], settings: &MixSettings) -> Self {
        let sample_rate = buffers[0].sample_rate;
        let sr = sample_rate as f64;
        let param = |value: f64| SmoothedParam::new(value, SMOOTHING_TIME, sr);

        let channels = buffers.map(|buffer| ColorChannel {
            player: LoopPlayer::new(buffer.shared()),
            gain: param(0.0),
        });

        debug!(sample_rate, buffer_len = noise::buffer_len(sample_rate), "signal graph wired");

        SignalGraph {
            sample_rate,
            channels,
            master: param(settings.master_volume),
            lfo: Lfo::new(sr),
            lfo_rate: param(settings.modulation_rate),
            lfo_gain: param(settings.modulation_depth * MAX_MODULATION),
            low_cut: param(settings.low_cut),
            low_cut_filter: BiquadFilter::new(FilterType::Highpass, settings.low_cut, sr),
            high_cut: param(settings.high_cut),
            high_cut_filter: BiquadFilter::new(FilterType::Lowpass, settings.high_cut, sr),
            analyser: AnalyserTap::new(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn set_color_level(&mut self, color: NoiseColor, value: f64) {
        self.channels[color.index()].gain.set_target(value.clamp(0.0, 1.0));
    }

    pub fn set_master_volume(&mut self, value: f64) {
        self.master.set_target(value.clamp(0.0, 1.0));
    }

    pub fn set_low_cut(&mut self, freq: f64) {
        self.low_cut.set_target(settings::clamp_cutoff(freq));
    }

    pub fn set_high_cut(&mut self, freq: f64) {
        self.high_cut.set_target(settings::clamp_cutoff(freq));
    }

    pub fn set_modulation_depth(&mut self, depth: f64) {
        self.lfo_gain.set_target(depth.clamp(0.0, 1.0) * MAX_MODULATION);
    }

    pub fn set_modulation_rate(&mut self, hz: f64) {
        self.lfo_rate.set_target(settings::clamp_rate(hz));
    }

    pub fn color_gain(&self, color: NoiseColor) -> &SmoothedParam {
        &self.channels[color.index()].gain
    }

    pub fn master_gain(&self) -> &SmoothedParam {
        &self.master
    }

    pub fn low_cut(&self) -> &SmoothedParam {
        &self.low_cut
    }

    pub fn high_cut(&self) -> &SmoothedParam {
        &self.high_cut
    }

    /// Tremolo amplitude on the master gain (depth × 0.5).
    pub fn modulation_gain(&self) -> &SmoothedParam {
        &self.lfo_gain
    }

    pub fn modulation_rate(&self) -> &SmoothedParam {
        &self.lfo_rate
    }

    /// The looped sample data behind a color's player.
    pub fn source(&self, color: NoiseColor) -> &Arc<[f32]> {
        self.channels[color.index()].player.samples()
    }

    pub fn analyser(&self) -> &AnalyserTap {
        &self.analyser
    }

    /// Render the next `out.len()` mono frames.
    pub fn process(&mut self, out: &mut [f32]) {
        for block in out.chunks_mut(RENDER_QUANTUM) {
            self.low_cut_filter.set_frequency(self.low_cut.value());
            self.high_cut_filter.set_frequency(self.high_cut.value());
            self.low_cut.advance(block.len());
            self.high_cut.advance(block.len());

            for slot in block.iter_mut() {
                let mut mix = 0.0;
                for channel in self.channels.iter_mut() {
                    let gain = channel.gain.next_value();
                    mix += channel.player.next_sample() * gain;
                }

                let rate = self.lfo_rate.next_value();
                let tremolo = self.lfo_gain.next_value() * self.lfo.next_sample(rate);
                let master = (self.master.next_value() + tremolo).clamp(0.0, 1.0);

                let filtered = self.low_cut_filter.process(mix * master);
                let filtered = self.high_cut_filter.process(filtered) as f32;

                self.analyser.push(filtered);
                *slot = filtered;
            }
        }
    }
}
