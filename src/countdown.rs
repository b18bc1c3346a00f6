/// Outcome of a countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still running; carries the seconds left to display.
    Updated(u32),
    /// The tick after `0:00`. The tick source must be stopped and the break ended.
    Expired,
}

/// Seconds remaining in the current break.
///
/// The tick source itself lives with the controller; this type only does
/// the arithmetic so it stays the same under any scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    running: bool,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.running = true;
    }

    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Expired;
        }
        match self.remaining.checked_sub(1) {
            Some(left) => {
                self.remaining = left;
                Tick::Updated(left)
            }
            None => {
                self.running = false;
                Tick::Expired
            }
        }
    }

    /// Adds time. A countdown that already expired starts running again.
    pub fn extend(&mut self, seconds: u32) {
        self.remaining = self.remaining.saturating_add(seconds);
        self.running = true;
    }

    pub fn reset(&mut self) {
        self.remaining = 0;
        self.running = false;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Milliseconds until the break should end, measured from now.
    pub fn deadline_ms(&self) -> u32 {
        self.remaining.saturating_mul(1000)
    }

    pub fn label(&self) -> String {
        format_clock(self.remaining)
    }
}

/// Formats seconds as `m:ss`. Minutes are not padded or capped.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(5), "0:05");
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(120), "2:00");
    }

    #[test]
    fn long_durations_do_not_wrap() {
        assert_eq!(format_clock(3600), "60:00");
        assert_eq!(format_clock(6001), "100:01");
    }

    #[test]
    fn ticks_down_then_expires_once_past_zero() {
        let mut countdown = Countdown::new();
        countdown.start(2);
        assert_eq!(countdown.tick(), Tick::Updated(1));
        assert_eq!(countdown.tick(), Tick::Updated(0));
        assert_eq!(countdown.label(), "0:00");
        assert_eq!(countdown.tick(), Tick::Expired);
        assert!(!countdown.is_running());
    }

    #[test]
    fn extend_adds_to_remaining() {
        let mut countdown = Countdown::new();
        countdown.start(60);
        for _ in 0..15 {
            countdown.tick();
        }
        countdown.extend(60);
        assert_eq!(countdown.remaining(), 105);
        assert_eq!(countdown.deadline_ms(), 105_000);
    }

    #[test]
    fn extend_after_expiry_resumes() {
        let mut countdown = Countdown::new();
        countdown.start(0);
        assert_eq!(countdown.tick(), Tick::Expired);
        countdown.extend(60);
        assert!(countdown.is_running());
        assert_eq!(countdown.tick(), Tick::Updated(59));
    }

    #[test]
    fn reset_clears_everything() {
        let mut countdown = Countdown::new();
        countdown.start(30);
        countdown.reset();
        assert_eq!(countdown, Countdown::default());
        assert_eq!(countdown.tick(), Tick::Expired);
    }
}
