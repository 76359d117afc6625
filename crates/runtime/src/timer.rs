/// One-shot millisecond timer driven by frame deltas.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Countdown {
    remaining_ms: Option<f64>,
}

impl Countdown {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, delay_ms: f64) {
        self.remaining_ms = Some(delay_ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining_ms.is_some()
    }

    pub fn remaining_ms(&self) -> Option<f64> {
        self.remaining_ms
    }

    /// Advances by `dt_ms`; returns `true` exactly once, when the delay elapses.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        let Some(remaining) = self.remaining_ms else {
            return false;
        };
        let remaining = remaining - dt_ms.max(0.0);
        if remaining <= 0.0 {
            self.remaining_ms = None;
            true
        } else {
            self.remaining_ms = Some(remaining);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Countdown;

    #[test]
    fn fires_once_after_delay() {
        let mut c = Countdown::idle();
        assert!(!c.tick(1000.0));

        c.arm(50.0);
        assert!(!c.tick(16.0));
        assert!(!c.tick(16.0));
        assert!(!c.tick(16.0));
        assert!(c.tick(16.0));
        assert!(!c.is_armed());
        assert!(!c.tick(16.0));
    }

    #[test]
    fn zero_delay_fires_on_next_tick() {
        let mut c = Countdown::idle();
        c.arm(0.0);
        assert!(c.tick(0.0));
    }

    #[test]
    fn cancel_disarms() {
        let mut c = Countdown::idle();
        c.arm(10.0);
        c.cancel();
        assert!(!c.tick(100.0));
        assert_eq!(c.remaining_ms(), None);
    }
}
