use foundation::time::Time;

/// Largest delta a single paint callback may report.
///
/// Background tabs can deliver one huge gap on resume; capping it keeps
/// millisecond timers from firing several steps at once.
pub const MAX_FRAME_DT_S: f64 = 0.1;

/// Frame metadata for one paint callback.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time since the previous frame (seconds).
    pub dt_s: f64,
    /// Accumulated time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn dt_ms(&self) -> f64 {
        self.dt_s * 1000.0
    }
}

/// Turns paint-callback timestamps into `Frame`s.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_timestamp_ms: Option<f64>,
    index: u64,
    elapsed: Time,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a paint callback at `timestamp_ms` and returns its frame.
    ///
    /// The first callback (and the first after `pause`) reports a zero delta.
    pub fn on_paint(&mut self, timestamp_ms: f64) -> Frame {
        let dt_s = match self.last_timestamp_ms {
            Some(prev) => ((timestamp_ms - prev) / 1000.0).clamp(0.0, MAX_FRAME_DT_S),
            None => 0.0,
        };
        self.last_timestamp_ms = Some(timestamp_ms);

        let frame = Frame {
            index: self.index,
            dt_s,
            time: self.elapsed,
        };
        self.index += 1;
        self.elapsed = Time(self.elapsed.0 + dt_s);
        frame
    }

    /// Forgets the last timestamp so a resumed loop does not see the hidden gap.
    pub fn pause(&mut self) {
        self.last_timestamp_ms = None;
    }

    pub fn frames(&self) -> u64 {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameClock, MAX_FRAME_DT_S};
    use foundation::time::Time;

    #[test]
    fn clock_measures_deltas_between_paints() {
        let mut clock = FrameClock::new();
        let f0 = clock.on_paint(1000.0);
        assert_eq!(f0.index, 0);
        assert_eq!(f0.dt_s, 0.0);

        let f1 = clock.on_paint(1016.0);
        assert_eq!(f1.index, 1);
        assert!((f1.dt_ms() - 16.0).abs() < 1e-9);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn frame_time_is_the_sum_of_earlier_deltas() {
        let mut clock = FrameClock::new();
        for ts in [0.0, 20.0, 50.0] {
            clock.on_paint(ts);
        }
        let f3 = clock.on_paint(60.0);
        assert_eq!(f3.index, 3);
        assert!((f3.time.0 - 0.05).abs() < 1e-12);
        assert!(f3.time > Time(0.0));
    }

    #[test]
    fn clock_caps_long_gaps_and_resets_on_pause() {
        let mut clock = FrameClock::new();
        clock.on_paint(0.0);
        let long = clock.on_paint(5_000.0);
        assert_eq!(long.dt_s, MAX_FRAME_DT_S);

        clock.pause();
        let resumed = clock.on_paint(60_000.0);
        assert_eq!(resumed.dt_s, 0.0);
        assert_eq!(resumed.index, 2);
        assert!((resumed.time.0 - MAX_FRAME_DT_S).abs() < 1e-12);
    }
}
