//! Built-in presets. Each lists only the colors it uses; the rest are 0.

use crate::color::{ColorLevels, NoiseColor};

use crate::color::NoiseColor::{Blue, Brown, Pink, Violet, White};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuiltinPreset {
    pub name: &'static str,
    levels: &'static [(NoiseColor, f64)],
}

impl BuiltinPreset {
    /// Full level table, zero-filled for colors the preset omits.
    pub fn levels(&self) -> ColorLevels {
        ColorLevels::from_pairs(self.levels)
    }
}

pub const BUILTIN_PRESETS: [BuiltinPreset; 10] = [
    BuiltinPreset {
        name: "sleep",
        levels: &[(Pink, 0.3), (Brown, 0.7)],
    },
    BuiltinPreset {
        name: "focus",
        levels: &[(White, 0.2), (Pink, 0.6), (Brown, 0.2)],
    },
    BuiltinPreset {
        name: "relax",
        levels: &[(Pink, 0.5), (Brown, 0.5)],
    },
    BuiltinPreset {
        name: "rain",
        levels: &[(White, 0.1), (Pink, 0.5), (Blue, 0.2)],
    },
    BuiltinPreset {
        name: "ocean",
        levels: &[(Pink, 0.3), (Brown, 0.6), (Violet, 0.05)],
    },
    BuiltinPreset {
        name: "white",
        levels: &[(White, 1.0)],
    },
    BuiltinPreset {
        name: "pink",
        levels: &[(Pink, 1.0)],
    },
    BuiltinPreset {
        name: "brown",
        levels: &[(Brown, 1.0)],
    },
    BuiltinPreset {
        name: "blue",
        levels: &[(Blue, 1.0)],
    },
    BuiltinPreset {
        name: "violet",
        levels: &[(Violet, 1.0)],
    },
];

/// Look up a built-in preset by name, ignoring case.
pub fn builtin(name: &str) -> Option<&'static BuiltinPreset> {
    let name = name.trim();
    BUILTIN_PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_PRESETS.iter().map(|p| p.name)
}
