//! Mix controller — playback state machine and parameter front door.
//!
//! The controller owns the mix settings, the lazily built signal graph, the
//! visualizer state and the sleep timer. The graph is only constructed on
//! the first `play()` (browsers refuse to start audio before a user
//! gesture) and is kept afterwards, so stop/play cycles are cheap.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::color::{ColorLevels, NoiseColor};
use crate::dsp::graph::SignalGraph;
use crate::error::NoiseError;
use crate::preset::{self, SavedPreset};
use crate::settings::MixSettings;
use crate::timer::{SleepTimer, TimerTick};
use crate::visualizer::{Frame, Visualizer};

/// Lowest sample rate WebAudio allows for a context.
pub const MIN_SAMPLE_RATE: u32 = 3000;
/// Highest sample rate WebAudio allows for a context.
pub const MAX_SAMPLE_RATE: u32 = 768_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

impl PlaybackState {
    /// Badge text shown next to the play button.
    pub fn status_text(self) -> &'static str {
        match self {
            PlaybackState::Stopped => "Ready",
            PlaybackState::Playing => "Playing",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            PlaybackState::Stopped => "ready",
            PlaybackState::Playing => "playing",
        }
    }
}

/// The device or context the rendered audio goes to.
pub trait AudioOutput {
    /// Acquire the output and report its sample rate.
    fn open(&mut self) -> Result<u32, NoiseError>;

    /// Fail if the output can no longer play, e.g. its context was closed.
    fn ensure_available(&self) -> Result<(), NoiseError>;

    fn is_suspended(&self) -> bool;

    fn resume(&mut self) -> Result<(), NoiseError>;
}

/// State of a host-owned audio context (the page's `AudioContext`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Suspended,
    Running,
    Closed,
}

/// An output whose context lives in the host; the host reports its state.
#[derive(Debug, Clone)]
pub struct HostOutput {
    sample_rate: u32,
    state: ContextState,
}

impl HostOutput {
    /// Contexts start suspended until a user gesture resumes them.
    pub fn new(sample_rate: u32) -> Self {
        HostOutput {
            sample_rate,
            state: ContextState::Suspended,
        }
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn set_state(&mut self, state: ContextState) {
        self.state = state;
    }
}

impl AudioOutput for HostOutput {
    fn open(&mut self) -> Result<u32, NoiseError> {
        self.ensure_available()?;
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(NoiseError::audio_unavailable(format!(
                "unsupported sample rate {} Hz",
                self.sample_rate
            )));
        }
        Ok(self.sample_rate)
    }

    fn ensure_available(&self) -> Result<(), NoiseError> {
        match self.state {
            ContextState::Closed => Err(NoiseError::audio_unavailable("audio context is closed")),
            _ => Ok(()),
        }
    }

    fn is_suspended(&self) -> bool {
        self.state == ContextState::Suspended
    }

    fn resume(&mut self) -> Result<(), NoiseError> {
        match self.state {
            ContextState::Closed => Err(NoiseError::audio_unavailable("audio context is closed")),
            _ => {
                self.state = ContextState::Running;
                Ok(())
            }
        }
    }
}

pub struct MixController<O: AudioOutput> {
    output: O,
    settings: MixSettings,
    state: PlaybackState,
    graph: Option<SignalGraph>,
    rng: StdRng,
    visualizer: Visualizer,
    timer: SleepTimer,
}

impl<O: AudioOutput> MixController<O> {
    pub fn new(output: O, settings: MixSettings) -> Self {
        Self::with_rng(output, settings, StdRng::from_entropy())
    }

    /// Use a specific random source for buffer generation.
    pub fn with_rng(output: O, mut settings: MixSettings, rng: StdRng) -> Self {
        settings.sanitize();
        MixController {
            output,
            settings,
            state: PlaybackState::Stopped,
            graph: None,
            rng,
            visualizer: Visualizer::new(),
            timer: SleepTimer::new(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn status_text(&self) -> &'static str {
        self.state.status_text()
    }

    pub fn settings(&self) -> &MixSettings {
        &self.settings
    }

    /// The signal graph, once the first `play()` has built it.
    pub fn graph(&self) -> Option<&SignalGraph> {
        self.graph.as_ref()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Target level of a color, whether or not audio is running.
    pub fn level(&self, color: NoiseColor) -> f64 {
        self.settings.levels.get(color)
    }

    /// `Stopped → Playing`. Builds the graph on first use, resumes a
    /// suspended output and fades every color up to its target level.
    /// On failure the controller stays `Stopped` with no colors faded in.
    pub fn play(&mut self) -> Result<(), NoiseError> {
        if self.graph.is_some() {
            self.output.ensure_available().inspect_err(|e| {
                warn!(error = %e, "audio output is gone");
            })?;
        } else {
            let sample_rate = self.output.open().inspect_err(|e| {
                warn!(error = %e, "cannot open audio output");
            })?;
            info!(sample_rate, "building signal graph");
            self.graph = Some(SignalGraph::build(sample_rate, &self.settings, &mut self.rng));
        }

        if self.output.is_suspended() {
            self.output.resume().inspect_err(|e| {
                warn!(error = %e, "cannot resume audio output");
            })?;
        }

        if let Some(graph) = self.graph.as_mut() {
            for (color, level) in self.settings.levels.iter() {
                graph.set_color_level(color, level);
            }
        }

        self.state = PlaybackState::Playing;
        self.visualizer.start();
        info!("playback started");
        Ok(())
    }

    /// `Playing → Stopped`. Fades every color to 0 and keeps the graph.
    pub fn stop(&mut self) {
        let Some(graph) = self.graph.as_mut() else {
            return;
        };
        for color in NoiseColor::ALL {
            graph.set_color_level(color, 0.0);
        }

        if self.state == PlaybackState::Playing {
            info!("playback stopped");
        }
        self.state = PlaybackState::Stopped;
        self.visualizer.stop();
    }

    /// Flip between playing and stopped, returning the new state.
    pub fn toggle(&mut self) -> Result<PlaybackState, NoiseError> {
        match self.state {
            PlaybackState::Playing => self.stop(),
            PlaybackState::Stopped => self.play()?,
        }
        Ok(self.state)
    }

    /// Set a color's target level. While playing the gain ramps to it;
    /// while stopped it is applied by the next `play()`.
    pub fn set_level(&mut self, color: NoiseColor, value: f64) -> Result<(), NoiseError> {
        let value = self.settings.set_level(color, value)?;
        if self.is_playing() {
            if let Some(graph) = self.graph.as_mut() {
                graph.set_color_level(color, value);
            }
        }
        Ok(())
    }

    pub fn set_master_volume(&mut self, value: f64) -> Result<(), NoiseError> {
        let value = self.settings.set_master_volume(value)?;
        if let Some(graph) = self.graph.as_mut() {
            graph.set_master_volume(value);
        }
        Ok(())
    }

    pub fn set_low_cut(&mut self, freq: f64) -> Result<(), NoiseError> {
        let freq = self.settings.set_low_cut(freq)?;
        if let Some(graph) = self.graph.as_mut() {
            graph.set_low_cut(freq);
        }
        Ok(())
    }

    pub fn set_high_cut(&mut self, freq: f64) -> Result<(), NoiseError> {
        let freq = self.settings.set_high_cut(freq)?;
        if let Some(graph) = self.graph.as_mut() {
            graph.set_high_cut(freq);
        }
        Ok(())
    }

    pub fn set_modulation_depth(&mut self, depth: f64) -> Result<(), NoiseError> {
        let depth = self.settings.set_modulation_depth(depth)?;
        if let Some(graph) = self.graph.as_mut() {
            graph.set_modulation_depth(depth);
        }
        Ok(())
    }

    pub fn set_modulation_rate(&mut self, hz: f64) -> Result<(), NoiseError> {
        let hz = self.settings.set_modulation_rate(hz)?;
        if let Some(graph) = self.graph.as_mut() {
            graph.set_modulation_rate(hz);
        }
        Ok(())
    }

    /// Apply a built-in preset's levels; colors it omits go to 0. Play
    /// state is unchanged.
    pub fn apply_preset(&mut self, name: &str) -> Result<(), NoiseError> {
        let builtin = preset::builtin(name).ok_or_else(|| NoiseError::PresetNotFound {
            name: name.to_string(),
        })?;
        debug!(preset = builtin.name, "applying built-in preset");
        self.apply_levels(builtin.levels())
    }

    /// Apply a saved preset: all five levels plus master volume.
    pub fn apply_saved(&mut self, saved: &SavedPreset) -> Result<(), NoiseError> {
        debug!(preset = %saved.name, "applying saved preset");
        self.apply_levels(saved.color_levels())?;
        self.set_master_volume(saved.master_volume_fraction())
    }

    fn apply_levels(&mut self, levels: ColorLevels) -> Result<(), NoiseError> {
        for (color, value) in levels.iter() {
            self.set_level(color, value)?;
        }
        Ok(())
    }

    /// Snapshot the current mix as a saved preset.
    pub fn snapshot(&self, name: &str, created_at: u64) -> SavedPreset {
        SavedPreset::from_mix(name, &self.settings.levels, self.settings.master_volume, created_at)
    }

    /// Render the next block of output. Silence until the graph exists.
    pub fn render(&mut self, out: &mut [f32]) {
        match self.graph.as_mut() {
            Some(graph) => graph.process(out),
            None => out.fill(0.0),
        }
    }

    /// Pull the next visualization frame; `None` once the trace loop has
    /// ended.
    pub fn next_frame(&mut self) -> Option<Frame> {
        let tap = self.graph.as_ref().map(|g| g.analyser());
        self.visualizer.next_frame(tap)
    }

    pub fn timer(&self) -> &SleepTimer {
        &self.timer
    }

    pub fn start_timer(&mut self, minutes: u32) {
        self.timer.start(minutes);
    }

    pub fn cancel_timer(&mut self) {
        self.timer.cancel();
    }

    /// Advance the sleep timer by one second; stops playback on expiry.
    pub fn tick_timer(&mut self) -> TimerTick {
        let tick = self.timer.tick();
        if tick == TimerTick::Expired {
            info!("sleep timer expired");
            self.stop();
        }
        tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Output that can be told to fail.
    struct TestOutput {
        sample_rate: u32,
        fail_open: bool,
        fail_resume: bool,
        closed: bool,
        suspended: bool,
        opens: usize,
    }

    impl TestOutput {
        fn new(sample_rate: u32) -> Self {
            TestOutput {
                sample_rate,
                fail_open: false,
                fail_resume: false,
                closed: false,
                suspended: true,
                opens: 0,
            }
        }
    }

    impl AudioOutput for TestOutput {
        fn open(&mut self) -> Result<u32, NoiseError> {
            self.opens += 1;
            if self.fail_open {
                Err(NoiseError::audio_unavailable("no device"))
            } else {
                Ok(self.sample_rate)
            }
        }

        fn ensure_available(&self) -> Result<(), NoiseError> {
            if self.closed {
                Err(NoiseError::audio_unavailable("closed"))
            } else {
                Ok(())
            }
        }

        fn is_suspended(&self) -> bool {
            self.suspended
        }

        fn resume(&mut self) -> Result<(), NoiseError> {
            if self.fail_resume {
                return Err(NoiseError::audio_unavailable("resume refused"));
            }
            self.suspended = false;
            Ok(())
        }
    }

    fn controller(settings: MixSettings) -> MixController<TestOutput> {
        MixController::with_rng(TestOutput::new(8000), settings, StdRng::seed_from_u64(1))
    }

    #[test]
    fn replay_after_output_closed_stays_stopped() {
        let mut c = controller(MixSettings {
            levels: ColorLevels::from_pairs(&[(NoiseColor::Pink, 0.6)]),
            ..MixSettings::default()
        });
        c.play().unwrap();
        c.output_mut().closed = true;
        c.stop();

        let err = c.play().unwrap_err();
        assert!(matches!(err, NoiseError::AudioUnavailable { .. }));
        assert_eq!(c.state(), PlaybackState::Stopped);
        let graph = c.graph().unwrap();
        assert_eq!(graph.color_gain(NoiseColor::Pink).target(), 0.0);
    }

    #[test]
    fn closed_host_context_refuses_replay() {
        let mut c = MixController::with_rng(
            HostOutput::new(44100),
            MixSettings::default(),
            StdRng::seed_from_u64(3),
        );
        c.play().unwrap();
        assert_eq!(c.output().state(), ContextState::Running);

        c.output_mut().set_state(ContextState::Closed);
        c.stop();
        assert!(matches!(c.play(), Err(NoiseError::AudioUnavailable { .. })));
        assert!(!c.is_playing());
        assert_eq!(c.status_text(), "Ready");
    }

    #[test]
    fn crossed_cutoffs_are_repaired_on_construction() {
        let mut c = controller(MixSettings {
            high_cut: 10.0,
            ..MixSettings::default()
        });
        assert!(c.settings().low_cut < c.settings().high_cut);

        let low = c.settings().low_cut;
        c.set_low_cut(100.0).unwrap();
        assert_eq!(c.settings().low_cut, low);
        assert!(c.settings().low_cut < c.settings().high_cut);
    }

    #[test]
    fn starts_stopped_without_graph() {
        let c = controller(MixSettings::default());
        assert_eq!(c.state(), PlaybackState::Stopped);
        assert!(c.graph().is_none());
        assert_eq!(c.status_text(), "Ready");
    }

    #[test]
    fn play_applies_current_levels_as_targets() {
        let mut settings = MixSettings::default();
        settings.levels = ColorLevels::from_pairs(&[
            (NoiseColor::Pink, 0.3),
            (NoiseColor::Brown, 0.7),
        ]);
        let mut c = controller(settings);
        c.play().unwrap();

        assert_eq!(c.state(), PlaybackState::Playing);
        assert_eq!(c.status_text(), "Playing");
        assert!(!c.output().suspended, "play should resume the output");

        let graph = c.graph().expect("graph built on play");
        let expected = [
            (NoiseColor::White, 0.0),
            (NoiseColor::Pink, 0.3),
            (NoiseColor::Brown, 0.7),
            (NoiseColor::Blue, 0.0),
            (NoiseColor::Violet, 0.0),
        ];
        for (color, level) in expected {
            assert_eq!(graph.color_gain(color).target(), level, "{color}");
            assert_eq!(graph.color_gain(color).value(), 0.0, "{color} must fade in");
        }
    }

    #[test]
    fn set_level_is_visible_in_any_state() {
        let mut c = controller(MixSettings::default());
        c.set_level(NoiseColor::Blue, 0.4).unwrap();
        assert_eq!(c.level(NoiseColor::Blue), 0.4);

        c.play().unwrap();
        c.set_level(NoiseColor::Blue, 0.9).unwrap();
        assert_eq!(c.level(NoiseColor::Blue), 0.9);
        assert_eq!(c.graph().unwrap().color_gain(NoiseColor::Blue).target(), 0.9);

        c.stop();
        c.set_level(NoiseColor::Blue, 0.2).unwrap();
        assert_eq!(c.level(NoiseColor::Blue), 0.2);
        assert_eq!(
            c.graph().unwrap().color_gain(NoiseColor::Blue).target(),
            0.0,
            "stopped graph must stay silent"
        );
    }

    #[test]
    fn stop_fades_out_but_keeps_graph() {
        let mut settings = MixSettings::default();
        settings.levels.white = 1.0;
        let mut c = controller(settings);
        c.play().unwrap();
        let mut block = vec![0.0f32; 4000];
        c.render(&mut block);

        c.stop();
        assert_eq!(c.state(), PlaybackState::Stopped);
        let graph = c.graph().expect("graph kept after stop");
        let white = graph.color_gain(NoiseColor::White);
        assert_eq!(white.target(), 0.0);
        assert!(white.value() > 0.0, "stop must fade, not cut");
        assert_eq!(c.level(NoiseColor::White), 1.0, "stop keeps the mix");

        c.play().unwrap();
        assert_eq!(c.output().opens, 1, "graph is built only once");
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut c = controller(MixSettings::default());
        let original = c.state();
        assert_eq!(c.toggle().unwrap(), PlaybackState::Playing);
        assert_eq!(c.toggle().unwrap(), original);

        c.play().unwrap();
        c.toggle().unwrap();
        c.toggle().unwrap();
        assert_eq!(c.state(), PlaybackState::Playing);
    }

    #[test]
    fn stop_before_play_is_noop() {
        let mut c = controller(MixSettings::default());
        c.stop();
        assert_eq!(c.state(), PlaybackState::Stopped);
        assert!(c.graph().is_none());
    }

    #[test]
    fn setters_before_play_do_not_build_graph() {
        let mut c = controller(MixSettings::default());
        c.set_master_volume(0.9).unwrap();
        c.set_low_cut(200.0).unwrap();
        c.set_modulation_depth(0.5).unwrap();
        assert!(c.graph().is_none());
        assert_eq!(c.output().opens, 0);

        c.play().unwrap();
        let graph = c.graph().unwrap();
        assert_eq!(graph.master_gain().value(), 0.9);
        assert_eq!(graph.low_cut().value(), 200.0);
        assert_eq!(graph.modulation_gain().value(), 0.25);
    }

    #[test]
    fn unavailable_output_leaves_controller_stopped() {
        let mut output = TestOutput::new(8000);
        output.fail_open = true;
        let mut c = MixController::with_rng(output, MixSettings::default(), StdRng::seed_from_u64(1));

        let err = c.play().unwrap_err();
        assert!(matches!(err, NoiseError::AudioUnavailable { .. }));
        assert_eq!(c.state(), PlaybackState::Stopped);
        assert!(c.graph().is_none());
        assert!(c.toggle().is_err());
        assert_eq!(c.output().opens, 2, "each play retries only when asked");
    }

    #[test]
    fn failed_resume_fades_nothing_in() {
        let mut output = TestOutput::new(8000);
        output.fail_resume = true;
        let mut settings = MixSettings::default();
        settings.levels.pink = 0.8;
        let mut c = MixController::with_rng(output, settings, StdRng::seed_from_u64(1));

        assert!(c.play().is_err());
        assert_eq!(c.state(), PlaybackState::Stopped);
        let graph = c.graph().expect("graph survives a failed resume");
        for color in NoiseColor::ALL {
            assert_eq!(graph.color_gain(color).target(), 0.0);
        }
    }

    #[test]
    fn builtin_white_preset_is_exact() {
        let mut c = controller(MixSettings::default());
        c.set_level(NoiseColor::Pink, 0.6).unwrap();
        c.apply_preset("white").unwrap();
        assert_eq!(c.level(NoiseColor::White), 1.0);
        for color in [NoiseColor::Pink, NoiseColor::Brown, NoiseColor::Blue, NoiseColor::Violet] {
            assert_eq!(c.level(color), 0.0, "{color}");
        }
        assert_eq!(c.state(), PlaybackState::Stopped, "presets do not start playback");
    }

    #[test]
    fn unknown_preset_changes_nothing() {
        let mut c = controller(MixSettings::default());
        c.set_level(NoiseColor::Brown, 0.4).unwrap();
        let err = c.apply_preset("lullaby").unwrap_err();
        assert_eq!(err, NoiseError::PresetNotFound { name: "lullaby".to_string() });
        assert_eq!(c.level(NoiseColor::Brown), 0.4);
    }

    #[test]
    fn saved_preset_sets_master_volume() {
        let mut c = controller(MixSettings::default());
        c.set_level(NoiseColor::Violet, 0.3).unwrap();
        c.set_master_volume(0.8).unwrap();
        let saved = c.snapshot("night", 1);

        let mut other = controller(MixSettings::default());
        other.apply_saved(&saved).unwrap();
        assert_eq!(other.level(NoiseColor::Violet), 0.3);
        assert_eq!(other.settings().master_volume, 0.8);
    }

    #[test]
    fn render_is_silent_before_play() {
        let mut c = controller(MixSettings::default());
        let mut block = vec![0.5f32; 256];
        c.render(&mut block);
        assert!(block.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn frames_follow_play_state() {
        let mut settings = MixSettings::default();
        settings.levels.brown = 1.0;
        let mut c = controller(settings);
        assert_eq!(c.next_frame(), None);

        c.play().unwrap();
        let mut block = vec![0.0f32; 2048];
        c.render(&mut block);
        assert!(matches!(c.next_frame(), Some(Frame::Trace(_))));
        assert!(matches!(c.next_frame(), Some(Frame::Trace(_))));

        c.stop();
        assert_eq!(c.next_frame(), Some(Frame::Baseline));
        assert_eq!(c.next_frame(), None);

        c.play().unwrap();
        assert!(matches!(c.next_frame(), Some(Frame::Trace(_))), "trace restarts");
    }

    #[test]
    fn timer_expiry_stops_playback() {
        let mut c = controller(MixSettings::default());
        c.play().unwrap();
        c.start_timer(1);
        for _ in 0..59 {
            assert!(matches!(c.tick_timer(), TimerTick::Running { .. }));
        }
        assert_eq!(c.state(), PlaybackState::Playing);
        assert_eq!(c.tick_timer(), TimerTick::Expired);
        assert_eq!(c.state(), PlaybackState::Stopped);
        assert_eq!(c.tick_timer(), TimerTick::Idle);
    }

    #[test]
    fn host_output_reports_closed_context() {
        let mut output = HostOutput::new(44100);
        output.set_state(ContextState::Closed);
        assert!(output.open().is_err());

        let mut output = HostOutput::new(100);
        assert!(output.open().is_err(), "sample rate below WebAudio's range");

        let mut output = HostOutput::new(48000);
        assert_eq!(output.open().unwrap(), 48000);
        assert!(output.is_suspended());
        output.resume().unwrap();
        assert_eq!(output.state(), ContextState::Running);
    }
}
