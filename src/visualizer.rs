//! Waveform visualizer — turns the analysis tap into display frames.
//!
//! The host asks for one frame per display refresh. While playing every
//! request yields a fresh trace; after a stop the next request yields a
//! single baseline frame and then the loop ends until playback restarts.

use crate::dsp::analyser::{AnalyserTap, FRAME_SIZE};

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Byte-scaled time-domain samples, 128 = silence.
    Trace(Vec<u8>),
    /// The flat centre line drawn while stopped.
    Baseline,
}

impl Frame {
    /// Polyline vertices for a `width` × `height` canvas.
    pub fn points(&self, width: f32, height: f32) -> Vec<(f32, f32)> {
        let centre = height / 2.0;
        match self {
            Frame::Baseline => vec![(0.0, centre), (width, centre)],
            Frame::Trace(bytes) => {
                let slice_width = width / bytes.len().max(1) as f32;
                let mut points: Vec<(f32, f32)> = bytes
                    .iter()
                    .enumerate()
                    .map(|(i, &b)| (i as f32 * slice_width, (b as f32 / 128.0) * height / 2.0))
                    .collect();
                points.push((width, centre));
                points
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Visualizer {
    active: bool,
    baseline_pending: bool,
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.active = true;
        self.baseline_pending = false;
    }

    pub fn stop(&mut self) {
        if self.active {
            self.baseline_pending = true;
        }
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The next frame, or `None` when there is nothing left to draw.
    pub fn next_frame(&mut self, tap: Option<&AnalyserTap>) -> Option<Frame> {
        if self.active {
            let bytes = match tap {
                Some(tap) => tap.byte_time_domain(),
                None => vec![128; FRAME_SIZE],
            };
            return Some(Frame::Trace(bytes));
        }
        if self.baseline_pending {
            self.baseline_pending = false;
            return Some(Frame::Baseline);
        }
        None
    }
}
