//! Mix settings — the parameter store the controller reads and writes.
//!
//! Values here are targets: they are what the graph ramps toward, and what
//! `play()` applies when the graph is (re)started. All setters clamp.

use serde::{Deserialize, Serialize};

use crate::color::{ColorLevels, NoiseColor};
use crate::error::{NoiseError, ensure_finite};

/// Lowest cutoff either filter accepts, in Hz.
pub const MIN_CUTOFF: f64 = 20.0;
/// Highest cutoff either filter accepts, in Hz.
pub const MAX_CUTOFF: f64 = 20000.0;
/// Smallest distance kept between the low-cut and the high-cut.
pub const MIN_CUTOFF_GAP: f64 = 1.0;
/// Slowest tremolo rate, in Hz.
pub const MIN_RATE: f64 = 0.01;
/// Fastest tremolo rate, in Hz.
pub const MAX_RATE: f64 = 20.0;

pub fn clamp_cutoff(freq: f64) -> f64 {
    freq.clamp(MIN_CUTOFF, MAX_CUTOFF)
}

pub fn clamp_rate(hz: f64) -> f64 {
    hz.clamp(MIN_RATE, MAX_RATE)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MixSettings {
    /// Target level per color [0, 1].
    pub levels: ColorLevels,
    /// Master volume [0, 1].
    pub master_volume: f64,
    /// Highpass cutoff in Hz.
    pub low_cut: f64,
    /// Lowpass cutoff in Hz.
    pub high_cut: f64,
    /// Tremolo depth [0, 1]; 1.0 swings the master gain by ±0.5.
    pub modulation_depth: f64,
    /// Tremolo rate in Hz.
    pub modulation_rate: f64,
}

impl Default for MixSettings {
    fn default() -> Self {
        Self {
            levels: ColorLevels::default(),
            master_volume: 0.5,
            low_cut: MIN_CUTOFF,
            high_cut: MAX_CUTOFF,
            modulation_depth: 0.0,
            modulation_rate: 0.1,
        }
    }
}

impl MixSettings {
    /// Parse settings JSON; missing fields take their defaults and every
    /// value is brought back into range.
    pub fn from_json(json: &str) -> Result<Self, NoiseError> {
        let mut settings: MixSettings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, NoiseError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn set_level(&mut self, color: NoiseColor, value: f64) -> Result<f64, NoiseError> {
        let value = ensure_finite(color.name(), value)?;
        self.levels.set(color, value);
        Ok(self.levels.get(color))
    }

    pub fn set_master_volume(&mut self, value: f64) -> Result<f64, NoiseError> {
        self.master_volume = ensure_finite("masterVolume", value)?.clamp(0.0, 1.0);
        Ok(self.master_volume)
    }

    /// Clamp into the cutoff range and below the high-cut.
    pub fn set_low_cut(&mut self, freq: f64) -> Result<f64, NoiseError> {
        let freq = ensure_finite("lowCut", freq)?;
        self.low_cut = freq.min(self.high_cut - MIN_CUTOFF_GAP).max(MIN_CUTOFF);
        Ok(self.low_cut)
    }

    /// Clamp into the cutoff range and above the low-cut.
    pub fn set_high_cut(&mut self, freq: f64) -> Result<f64, NoiseError> {
        let freq = ensure_finite("highCut", freq)?;
        self.high_cut = freq.max(self.low_cut + MIN_CUTOFF_GAP).min(MAX_CUTOFF);
        Ok(self.high_cut)
    }

    pub fn set_modulation_depth(&mut self, depth: f64) -> Result<f64, NoiseError> {
        self.modulation_depth = ensure_finite("modulationDepth", depth)?.clamp(0.0, 1.0);
        Ok(self.modulation_depth)
    }

    pub fn set_modulation_rate(&mut self, hz: f64) -> Result<f64, NoiseError> {
        self.modulation_rate = clamp_rate(ensure_finite("modulationRate", hz)?);
        Ok(self.modulation_rate)
    }

    /// Bring every field back into range. Non-finite values fall back to
    /// their defaults and the cutoffs are reordered if they cross.
    pub fn sanitize(&mut self) {
        let defaults = MixSettings::default();
        let finite_or = |value: f64, fallback: f64| if value.is_finite() { value } else { fallback };

        for color in NoiseColor::ALL {
            let value = finite_or(self.levels.get(color), 0.0);
            self.levels.set(color, value);
        }
        self.master_volume = finite_or(self.master_volume, defaults.master_volume).clamp(0.0, 1.0);
        self.modulation_depth =
            finite_or(self.modulation_depth, defaults.modulation_depth).clamp(0.0, 1.0);
        self.modulation_rate = clamp_rate(finite_or(self.modulation_rate, defaults.modulation_rate));

        let low = finite_or(self.low_cut, defaults.low_cut);
        self.high_cut = clamp_cutoff(finite_or(self.high_cut, defaults.high_cut))
            .max(MIN_CUTOFF + MIN_CUTOFF_GAP);
        self.low_cut = low.min(self.high_cut - MIN_CUTOFF_GAP).max(MIN_CUTOFF);
    }
}
