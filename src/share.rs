//! Share links — a mix encoded as a query string.
//!
//! `?pink=30&brown=70&volume=50`: one key per color plus `volume`, each a
//! whole percentage. Missing colors mean 0; a missing volume means 50.

use crate::color::{ColorLevels, NoiseColor};
use crate::error::{NoiseError, ensure_finite};
use crate::preset::{from_percent, to_percent};

/// Query key for master volume.
pub const VOLUME_KEY: &str = "volume";
/// Volume used when a link does not carry one.
pub const DEFAULT_VOLUME_PERCENT: u8 = 50;

/// A mix decoded from a share link.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedMix {
    pub levels: ColorLevels,
    pub master_volume: f64,
}

/// Encode a mix. Silent colors are left out.
pub fn encode(levels: &ColorLevels, master_volume: f64) -> String {
    let mut pairs: Vec<String> = levels
        .iter()
        .filter_map(|(color, value)| match to_percent(value) {
            0 => None,
            percent => Some(format!("{color}={percent}")),
        })
        .collect();
    pairs.push(format!("{VOLUME_KEY}={}", to_percent(master_volume)));
    pairs.join("&")
}

/// Decode a query string, with or without the leading `?`. Unknown keys
/// are ignored; values are clamped to 0–100.
pub fn decode(query: &str) -> Result<SharedMix, NoiseError> {
    let mut levels = ColorLevels::default();
    let mut volume = DEFAULT_VOLUME_PERCENT;

    for pair in query.trim().trim_start_matches('?').split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.eq_ignore_ascii_case(VOLUME_KEY) {
            volume = parse_percent(key, value)?;
        } else if let Ok(color) = key.parse::<NoiseColor>() {
            levels.set(color, from_percent(parse_percent(key, value)?));
        }
    }

    Ok(SharedMix {
        levels,
        master_volume: from_percent(volume),
    })
}

fn parse_percent(key: &str, value: &str) -> Result<u8, NoiseError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| NoiseError::invalid_parameter(key, value))?;
    let parsed = ensure_finite(key, parsed)?;
    Ok(parsed.clamp(0.0, 100.0).round() as u8)
}
