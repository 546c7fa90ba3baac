pub mod color;
pub mod controller;
pub mod dsp;
pub mod error;
pub mod preset;
pub mod settings;
pub mod share;
pub mod timer;
pub mod visualizer;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

use crate::color::NoiseColor;
use crate::controller::{ContextState, HostOutput, MixController};
use crate::error::NoiseError;
use crate::preset::PresetStore;
use crate::settings::MixSettings;
use crate::visualizer::Frame;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn js_error(e: NoiseError) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

/// WASM-exposed: return the core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: generate one looped noise buffer (2 s of mono f32) for
/// filling an `AudioBuffer` directly.
#[wasm_bindgen]
pub fn noise_buffer(color: &str, sample_rate: u32) -> Result<Vec<f32>, JsValue> {
    let color: NoiseColor = color.parse().map_err(js_error)?;
    let buffer = dsp::noise::generate(color, sample_rate, &mut StdRng::from_entropy());
    Ok(buffer.samples().to_vec())
}

/// WASM-exposed player: one controller per page, plus the saved presets.
///
/// The page owns the `AudioContext` and an AudioWorklet that pulls blocks
/// through [`NoisePlayer::render`]; everything else is parameter plumbing.
#[wasm_bindgen]
pub struct NoisePlayer {
    controller: MixController<HostOutput>,
    presets: PresetStore,
}

#[wasm_bindgen]
impl NoisePlayer {
    #[wasm_bindgen(constructor)]
    pub fn new(sample_rate: u32) -> NoisePlayer {
        NoisePlayer {
            controller: MixController::new(HostOutput::new(sample_rate), MixSettings::default()),
            presets: PresetStore::new(),
        }
    }

    /// Start from settings JSON (camelCase `MixSettings`).
    pub fn with_settings(sample_rate: u32, settings_json: &str) -> Result<NoisePlayer, JsValue> {
        let settings = MixSettings::from_json(settings_json).map_err(js_error)?;
        Ok(NoisePlayer {
            controller: MixController::new(HostOutput::new(sample_rate), settings),
            presets: PresetStore::new(),
        })
    }

    pub fn play(&mut self) -> Result<(), JsValue> {
        self.controller.play().map_err(js_error)
    }

    pub fn stop(&mut self) {
        self.controller.stop();
    }

    /// Returns whether the player is now playing.
    pub fn toggle(&mut self) -> Result<bool, JsValue> {
        self.controller.toggle().map_err(js_error)?;
        Ok(self.controller.is_playing())
    }

    pub fn is_playing(&self) -> bool {
        self.controller.is_playing()
    }

    pub fn status_text(&self) -> String {
        self.controller.status_text().to_string()
    }

    pub fn status_class(&self) -> String {
        self.controller.state().css_class().to_string()
    }

    /// `suspended`, `running` or `closed`, mirrored from the page's context.
    pub fn set_context_state(&mut self, state: &str) -> Result<(), JsValue> {
        let state = match state {
            "suspended" => ContextState::Suspended,
            "running" => ContextState::Running,
            "closed" => ContextState::Closed,
            other => return Err(js_error(NoiseError::invalid_parameter("contextState", other))),
        };
        self.controller.output_mut().set_state(state);
        Ok(())
    }

    pub fn set_level(&mut self, color: &str, value: f64) -> Result<(), JsValue> {
        let color: NoiseColor = color.parse().map_err(js_error)?;
        self.controller.set_level(color, value).map_err(js_error)
    }

    pub fn level(&self, color: &str) -> Result<f64, JsValue> {
        let color: NoiseColor = color.parse().map_err(js_error)?;
        Ok(self.controller.level(color))
    }

    pub fn set_master_volume(&mut self, value: f64) -> Result<(), JsValue> {
        self.controller.set_master_volume(value).map_err(js_error)
    }

    pub fn set_low_cut(&mut self, freq: f64) -> Result<(), JsValue> {
        self.controller.set_low_cut(freq).map_err(js_error)
    }

    pub fn set_high_cut(&mut self, freq: f64) -> Result<(), JsValue> {
        self.controller.set_high_cut(freq).map_err(js_error)
    }

    pub fn set_modulation_depth(&mut self, depth: f64) -> Result<(), JsValue> {
        self.controller.set_modulation_depth(depth).map_err(js_error)
    }

    pub fn set_modulation_rate(&mut self, hz: f64) -> Result<(), JsValue> {
        self.controller.set_modulation_rate(hz).map_err(js_error)
    }

    /// Current settings as a JS object.
    pub fn settings(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.controller.settings())
            .map_err(|e| JsValue::from_str(&format!("{e}")))
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.controller.settings().to_json().map_err(js_error)
    }

    pub fn builtin_presets() -> Vec<String> {
        preset::builtin_names().map(str::to_string).collect()
    }

    pub fn apply_preset(&mut self, name: &str) -> Result<(), JsValue> {
        self.controller.apply_preset(name).map_err(js_error)
    }

    /// Save the current mix; returns the name of an evicted preset, if any.
    /// `created_at` is `Date.now()`.
    pub fn save_preset(&mut self, name: &str, created_at: f64) -> Result<Option<String>, JsValue> {
        let snapshot = self.controller.snapshot(name, created_at.max(0.0) as u64);
        let evicted = self.presets.save(snapshot).map_err(js_error)?;
        Ok(evicted.map(|p| p.name))
    }

    pub fn delete_preset(&mut self, name: &str) -> Result<(), JsValue> {
        self.presets.remove(name).map(|_| ()).map_err(js_error)
    }

    pub fn apply_saved_preset(&mut self, name: &str) -> Result<(), JsValue> {
        let saved = self
            .presets
            .get(name)
            .cloned()
            .ok_or_else(|| js_error(NoiseError::PresetNotFound { name: name.to_string() }))?;
        self.controller.apply_saved(&saved).map_err(js_error)
    }

    pub fn saved_preset_names(&self) -> Vec<String> {
        self.presets.names().into_iter().map(str::to_string).collect()
    }

    /// Storage key for [`NoisePlayer::presets_json`].
    pub fn storage_key() -> String {
        preset::STORAGE_KEY.to_string()
    }

    pub fn presets_json(&self) -> Result<String, JsValue> {
        self.presets.to_json().map_err(js_error)
    }

    pub fn load_presets_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.presets = PresetStore::from_json(json).map_err(js_error)?;
        Ok(())
    }

    pub fn share_query(&self) -> String {
        let settings = self.controller.settings();
        share::encode(&settings.levels, settings.master_volume)
    }

    pub fn load_share_query(&mut self, query: &str) -> Result<(), JsValue> {
        let mix = share::decode(query).map_err(js_error)?;
        for (color, value) in mix.levels.iter() {
            self.controller.set_level(color, value).map_err(js_error)?;
        }
        self.controller.set_master_volume(mix.master_volume).map_err(js_error)
    }

    /// Render `frames` mono samples for the AudioWorklet.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; frames];
        self.controller.render(&mut out);
        out
    }

    /// Next waveform frame: bytes while playing, an empty array for the
    /// baseline after a stop, `undefined` once the loop has ended.
    pub fn waveform(&mut self) -> Option<Vec<u8>> {
        self.controller.next_frame().map(|frame| match frame {
            Frame::Trace(bytes) => bytes,
            Frame::Baseline => Vec::new(),
        })
    }

    pub fn start_timer(&mut self, minutes: u32) {
        self.controller.start_timer(minutes);
    }

    pub fn cancel_timer(&mut self) {
        self.controller.cancel_timer();
    }

    /// Call once per second. Returns true when the timer just stopped
    /// playback.
    pub fn tick_timer(&mut self) -> bool {
        self.controller.tick_timer() == timer::TimerTick::Expired
    }

    pub fn timer_display(&self) -> String {
        self.controller.timer().display()
    }
}
