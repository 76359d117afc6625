/// Frame-counted progress, advanced once per paint callback.
///
/// A tween is running while `current <= total`, so it spends `total + 1`
/// frames and its last running frame reports a progress of exactly 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameTween {
    current: u32,
    total: u32,
}

impl FrameTween {
    pub fn new(total: u32) -> Self {
        Self {
            current: 0,
            total: total.max(1),
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        (self.current as f64 / self.total as f64).min(1.0)
    }

    pub fn is_running(&self) -> bool {
        self.current <= self.total
    }

    pub fn is_finished(&self) -> bool {
        !self.is_running()
    }

    /// True once `current` has reached `fraction` of `total`.
    pub fn reached(&self, fraction: f64) -> bool {
        self.current as f64 >= self.total as f64 * fraction
    }

    pub fn advance(&mut self) {
        self.current = self.current.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::FrameTween;

    #[test]
    fn runs_for_total_plus_one_frames() {
        let mut t = FrameTween::new(4);
        let mut frames = 0;
        while t.is_running() {
            frames += 1;
            t.advance();
        }
        assert_eq!(frames, 5);
        assert!(t.is_finished());
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn thresholds_use_the_current_frame() {
        let mut t = FrameTween::new(10);
        for _ in 0..6 {
            t.advance();
        }
        assert!(!t.reached(0.65));
        t.advance();
        assert!(t.reached(0.65));
        assert!(t.reached(0.7));
    }

    #[test]
    fn zero_total_is_promoted_and_reset_restarts() {
        let mut t = FrameTween::new(0);
        assert_eq!(t.total(), 1);
        t.advance();
        t.advance();
        assert!(t.is_finished());
        t.reset();
        assert_eq!(t.current(), 0);
        assert!(t.is_running());
    }
}
