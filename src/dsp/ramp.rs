//! Exponential-approach parameter smoothing.
//!
//! Same curve as WebAudio's `AudioParam.setTargetAtTime`: after a new target
//! is set the value moves as `target + (start - target) * e^(-t / tau)`.

/// Time constant used for every user-facing parameter change, in seconds.
pub const SMOOTHING_TIME: f64 = 0.1;

/// Differences below this snap to the target so a settled ramp reports the
/// exact target value.
const SETTLE_EPSILON: f64 = 1e-9;

/// A parameter that approaches its target exponentially, one sample at a time.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    value: f64,
    target: f64,
    /// Per-sample decay factor `e^(-1 / (tau * fs))`.
    coeff: f64,
}

impl SmoothedParam {
    pub fn new(value: f64, time_constant: f64, sample_rate: f64) -> Self {
        SmoothedParam {
            value,
            target: value,
            coeff: decay_coeff(time_constant, sample_rate),
        }
    }

    /// Start approaching `target` from wherever the value is now.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Jump straight to `value`, cancelling any ramp in progress.
    pub fn set_immediate(&mut self, value: f64) {
        self.value = value;
        self.target = value;
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_settled(&self) -> bool {
        self.value == self.target
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn next_value(&mut self) -> f64 {
        if !self.is_settled() {
            self.value = self.target + (self.value - self.target) * self.coeff;
            self.snap();
        }
        self.value
    }

    /// Advance `samples` samples at once (closed form) and return the value.
    pub fn advance(&mut self, samples: usize) -> f64 {
        if !self.is_settled() {
            let decay = self.coeff.powi(samples as i32);
            self.value = self.target + (self.value - self.target) * decay;
            self.snap();
        }
        self.value
    }

    fn snap(&mut self) {
        if (self.value - self.target).abs() < SETTLE_EPSILON {
            self.value = self.target;
        }
    }
}

fn decay_coeff(time_constant: f64, sample_rate: f64) -> f64 {
    if time_constant <= 0.0 || sample_rate <= 0.0 {
        0.0
    } else {
        (-1.0 / (time_constant * sample_rate)).exp()
    }
}
