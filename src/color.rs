//! Noise colors and per-color level tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NoiseError;

/// The five noise colors, named by the slope of their power spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseColor {
    White,
    Pink,
    Brown,
    Blue,
    Violet,
}

impl NoiseColor {
    /// All colors in graph order.
    pub const ALL: [NoiseColor; 5] = [
        NoiseColor::White,
        NoiseColor::Pink,
        NoiseColor::Brown,
        NoiseColor::Blue,
        NoiseColor::Violet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NoiseColor::White => "white",
            NoiseColor::Pink => "pink",
            NoiseColor::Brown => "brown",
            NoiseColor::Blue => "blue",
            NoiseColor::Violet => "violet",
        }
    }

    /// Position in [`NoiseColor::ALL`], used to index per-color arrays.
    pub fn index(self) -> usize {
        match self {
            NoiseColor::White => 0,
            NoiseColor::Pink => 1,
            NoiseColor::Brown => 2,
            NoiseColor::Blue => 3,
            NoiseColor::Violet => 4,
        }
    }
}

impl fmt::Display for NoiseColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NoiseColor {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(NoiseColor::White),
            "pink" => Ok(NoiseColor::Pink),
            "brown" | "brownian" | "red" => Ok(NoiseColor::Brown),
            "blue" => Ok(NoiseColor::Blue),
            "violet" | "purple" => Ok(NoiseColor::Violet),
            _ => Err(NoiseError::UnknownColor { name: s.to_string() }),
        }
    }
}

/// One level per color, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorLevels {
    pub white: f64,
    pub pink: f64,
    pub brown: f64,
    pub blue: f64,
    pub violet: f64,
}

impl ColorLevels {
    pub fn get(&self, color: NoiseColor) -> f64 {
        match color {
            NoiseColor::White => self.white,
            NoiseColor::Pink => self.pink,
            NoiseColor::Brown => self.brown,
            NoiseColor::Blue => self.blue,
            NoiseColor::Violet => self.violet,
        }
    }

    /// Set a level, clamped into [0, 1].
    pub fn set(&mut self, color: NoiseColor, value: f64) {
        let value = value.clamp(0.0, 1.0);
        match color {
            NoiseColor::White => self.white = value,
            NoiseColor::Pink => self.pink = value,
            NoiseColor::Brown => self.brown = value,
            NoiseColor::Blue => self.blue = value,
            NoiseColor::Violet => self.violet = value,
        }
    }

    /// Build from a partial list; colors not listed are 0.
    pub fn from_pairs(pairs: &[(NoiseColor, f64)]) -> Self {
        let mut levels = ColorLevels::default();
        for &(color, value) in pairs {
            levels.set(color, value);
        }
        levels
    }

    pub fn iter(&self) -> impl Iterator<Item = (NoiseColor, f64)> + '_ {
        NoiseColor::ALL.iter().map(move |&c| (c, self.get(c)))
    }
}
