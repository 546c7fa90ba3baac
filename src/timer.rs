//! Sleep timer — a one-per-second countdown that ends playback.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// No countdown running.
    Idle,
    /// Counting down; seconds left.
    Running { remaining: u32 },
    /// The countdown just reached zero.
    Expired,
}

#[derive(Debug, Clone, Default)]
pub struct SleepTimer {
    remaining: Option<u32>,
}

impl SleepTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start the countdown. Zero minutes cancels it.
    pub fn start(&mut self, minutes: u32) {
        self.remaining = match minutes {
            0 => None,
            m => Some(m.saturating_mul(60)),
        };
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Count one second down.
    pub fn tick(&mut self) -> TimerTick {
        match self.remaining {
            None => TimerTick::Idle,
            Some(secs) if secs <= 1 => {
                self.remaining = None;
                TimerTick::Expired
            }
            Some(secs) => {
                self.remaining = Some(secs - 1);
                TimerTick::Running { remaining: secs - 1 }
            }
        }
    }

    /// `MM:SS`, or `--:--` when idle.
    pub fn display(&self) -> String {
        match self.remaining {
            None => "--:--".to_string(),
            Some(secs) => format!("{:02}:{:02}", secs / 60, secs % 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_display() {
        let t = SleepTimer::new();
        assert_eq!(t.display(), "--:--");
        assert!(!t.is_running());
    }

    #[test]
    fn counts_down_and_expires() {
        let mut t = SleepTimer::new();
        t.start(2);
        assert_eq!(t.display(), "02:00");
        assert_eq!(t.tick(), TimerTick::Running { remaining: 119 });
        assert_eq!(t.display(), "01:59");
        for _ in 0..118 {
            t.tick();
        }
        assert_eq!(t.display(), "00:01");
        assert_eq!(t.tick(), TimerTick::Expired);
        assert_eq!(t.tick(), TimerTick::Idle);
        assert_eq!(t.display(), "--:--");
    }

    #[test]
    fn restart_replaces_countdown() {
        let mut t = SleepTimer::new();
        t.start(30);
        t.tick();
        t.start(5);
        assert_eq!(t.remaining(), Some(300));
        t.start(0);
        assert!(!t.is_running());
    }

    #[test]
    fn long_timers_format_minutes_past_an_hour() {
        let mut t = SleepTimer::new();
        t.start(90);
        assert_eq!(t.display(), "90:00");
        t.cancel();
        assert_eq!(t.tick(), TimerTick::Idle);
    }
}
