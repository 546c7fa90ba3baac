//! User-saved presets: a bounded, name-keyed collection persisted as JSON.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{ColorLevels, NoiseColor};
use crate::error::NoiseError;

/// Key the page stores the JSON array under.
pub const STORAGE_KEY: &str = "noise-generator-presets";

/// Most presets kept; saving one more evicts the oldest.
pub const MAX_SAVED_PRESETS: usize = 10;

/// Levels as whole percentages (0–100), the way the sliders show them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PercentLevels {
    pub white: u8,
    pub pink: u8,
    pub brown: u8,
    pub blue: u8,
    pub violet: u8,
}

impl PercentLevels {
    pub fn get(&self, color: NoiseColor) -> u8 {
        match color {
            NoiseColor::White => self.white,
            NoiseColor::Pink => self.pink,
            NoiseColor::Brown => self.brown,
            NoiseColor::Blue => self.blue,
            NoiseColor::Violet => self.violet,
        }
    }

    pub fn set(&mut self, color: NoiseColor, percent: u8) {
        let percent = percent.min(100);
        match color {
            NoiseColor::White => self.white = percent,
            NoiseColor::Pink => self.pink = percent,
            NoiseColor::Brown => self.brown = percent,
            NoiseColor::Blue => self.blue = percent,
            NoiseColor::Violet => self.violet = percent,
        }
    }
}

impl From<&ColorLevels> for PercentLevels {
    fn from(levels: &ColorLevels) -> Self {
        let mut out = PercentLevels::default();
        for (color, value) in levels.iter() {
            out.set(color, to_percent(value));
        }
        out
    }
}

impl From<&PercentLevels> for ColorLevels {
    fn from(levels: &PercentLevels) -> Self {
        let mut out = ColorLevels::default();
        for color in NoiseColor::ALL {
            out.set(color, from_percent(levels.get(color)));
        }
        out
    }
}

/// Fraction [0, 1] to a whole percentage.
pub fn to_percent(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Whole percentage to a fraction [0, 1].
pub fn from_percent(percent: u8) -> f64 {
    percent.min(100) as f64 / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPreset {
    pub name: String,
    pub levels: PercentLevels,
    pub master_volume: u8,
    /// Milliseconds since the Unix epoch, supplied by the host clock.
    pub created_at: u64,
}

impl SavedPreset {
    pub fn from_mix(name: &str, levels: &ColorLevels, master_volume: f64, created_at: u64) -> Self {
        SavedPreset {
            name: name.trim().to_string(),
            levels: levels.into(),
            master_volume: to_percent(master_volume),
            created_at,
        }
    }

    pub fn color_levels(&self) -> ColorLevels {
        (&self.levels).into()
    }

    pub fn master_volume_fraction(&self) -> f64 {
        from_percent(self.master_volume)
    }
}

/// Saved presets, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetStore {
    presets: Vec<SavedPreset>,
}

impl PresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SavedPreset> {
        self.presets.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&SavedPreset> {
        self.presets.iter().find(|p| p.name == name.trim())
    }

    /// Save a preset. A preset with the same name is overwritten in place;
    /// otherwise it is appended and, past capacity, the oldest is evicted
    /// and returned.
    pub fn save(&mut self, preset: SavedPreset) -> Result<Option<SavedPreset>, NoiseError> {
        if preset.name.trim().is_empty() {
            return Err(NoiseError::invalid_parameter("name", "\"\""));
        }

        if let Some(existing) = self.presets.iter_mut().find(|p| p.name == preset.name) {
            *existing = preset;
            return Ok(None);
        }

        self.presets.push(preset);
        if self.presets.len() > MAX_SAVED_PRESETS {
            let evicted = self.presets.remove(0);
            debug!(preset = %evicted.name, "evicted oldest saved preset");
            return Ok(Some(evicted));
        }
        Ok(None)
    }

    pub fn remove(&mut self, name: &str) -> Result<SavedPreset, NoiseError> {
        let index = self
            .presets
            .iter()
            .position(|p| p.name == name.trim())
            .ok_or_else(|| NoiseError::PresetNotFound {
                name: name.to_string(),
            })?;
        Ok(self.presets.remove(index))
    }

    pub fn to_json(&self) -> Result<String, NoiseError> {
        Ok(serde_json::to_string(&self.presets)?)
    }

    /// Load a stored JSON array. Entries are replayed through `save`, so
    /// duplicates collapse and only the newest ten survive.
    pub fn from_json(json: &str) -> Result<Self, NoiseError> {
        let entries: Vec<SavedPreset> = serde_json::from_str(json)?;
        let mut store = PresetStore::new();
        for mut entry in entries {
            entry.master_volume = entry.master_volume.min(100);
            entry.levels = (&ColorLevels::from(&entry.levels)).into();
            if entry.name.trim().is_empty() {
                continue;
            }
            store.save(entry)?;
        }
        Ok(store)
    }
}
