use formats::{GlobePoints, LocationRole};
use foundation::easing::ease_in_out_cubic;
use foundation::math::CameraAngles;
use runtime::{Countdown, FrameTween};

use crate::camera::nearest_azimuth;

/// Walks the primary locations in data order.
///
/// `index` points at the next key to consider; it runs past the end and is
/// wrapped back to zero on the following call.
#[derive(Debug, Clone)]
pub struct FocusCycle {
    keys: Vec<String>,
    index: usize,
    starting_key: Option<String>,
}

impl FocusCycle {
    /// Starts at `starting_key`; when that key is missing the cycle starts at
    /// the first primary location instead. With neither there is no
    /// starting key and `next_primary` never yields anything.
    pub fn new(data: &GlobePoints, starting_key: &str) -> Self {
        let keys: Vec<String> = data.locations.iter().map(|l| l.key.clone()).collect();
        let start = keys
            .iter()
            .position(|k| k == starting_key)
            .or_else(|| keys.iter().position(|k| LocationRole::of(k).is_primary()));
        let index = start.unwrap_or(0);
        let starting_key = start.and_then(|i| keys.get(i).cloned());
        Self {
            keys,
            index,
            starting_key,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Key the intro focuses on, and the fallback of `next_primary`.
    pub fn starting_key(&self) -> Option<&str> {
        self.starting_key.as_deref()
    }

    /// Steps past the current key without looking at it.
    pub fn advance(&mut self) {
        self.index += 1;
    }

    /// Next primary location.
    ///
    /// When the scan reaches the end without one, falls back to the
    /// starting location; the scan restarts from the top next time.
    pub fn next_primary(&mut self) -> Option<String> {
        if self.keys.is_empty() {
            return None;
        }
        if self.index >= self.keys.len() {
            self.index = 0;
        }
        while self.index < self.keys.len() {
            let key = &self.keys[self.index];
            self.index += 1;
            if LocationRole::of(key).is_primary() {
                return Some(key.clone());
            }
        }
        self.starting_key.clone()
    }
}

/// Camera swing from one location to the next.
#[derive(Debug, Clone)]
pub struct FocusTween {
    from: CameraAngles,
    to: CameraAngles,
    tween: FrameTween,
    active: bool,
}

impl FocusTween {
    pub fn new(frames: u32) -> Self {
        Self {
            from: CameraAngles::default(),
            to: CameraAngles::default(),
            tween: FrameTween::new(frames),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn target(&self) -> CameraAngles {
        self.to
    }

    /// Starts (or restarts) a swing; the azimuth takes the shorter way round.
    pub fn start(&mut self, from: CameraAngles, to: CameraAngles) {
        self.from = from;
        self.to = CameraAngles::new(nearest_azimuth(from.azimuthal, to.azimuthal), to.polar);
        self.tween.reset();
        self.active = true;
    }

    /// Camera angles for this frame, or `Finished` once the swing completed.
    pub fn tick(&mut self) -> FocusStep {
        if !self.active {
            return FocusStep::Idle;
        }
        if self.tween.is_finished() {
            self.active = false;
            self.tween.reset();
            return FocusStep::Finished;
        }
        let eased = ease_in_out_cubic(self.tween.progress());
        self.tween.advance();
        FocusStep::Moving(self.from.lerp(self.to, eased))
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FocusStep {
    Idle,
    Moving(CameraAngles),
    Finished,
}

/// Timer that asks for the next location.
#[derive(Debug, Clone, Default)]
pub struct CycleTimer {
    countdown: Countdown,
}

impl CycleTimer {
    pub fn arm(&mut self, delay_ms: f64) {
        self.countdown.arm(delay_ms);
    }

    pub fn arm_if_idle(&mut self, delay_ms: f64) {
        if !self.countdown.is_armed() {
            self.countdown.arm(delay_ms);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.countdown.is_armed()
    }

    pub fn tick(&mut self, dt_ms: f64) -> bool {
        self.countdown.tick(dt_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{FocusCycle, FocusStep, FocusTween};
    use formats::{GlobePoints, Location};
    use foundation::math::CameraAngles;
    use pretty_assertions::assert_eq;

    fn data() -> GlobePoints {
        GlobePoints {
            locations: vec![
                Location::named("mexico", "Mexico", 310.0, 260.0),
                Location::new("mexico-connected-point-1", 560.0, 190.0),
                Location::new("hub-dummy", 900.0, 260.0),
                Location::named("india", "India", 1430.0, 330.0),
                Location::new("india-connected-point-1", 1500.0, 300.0),
                Location::named("brazil", "Brazil", 660.0, 600.0),
                Location::new("brazil-connected-point-1", 700.0, 640.0),
            ],
            points: Vec::new(),
            config: None,
        }
    }

    #[test]
    fn cycles_primary_locations_and_falls_back() {
        let mut c = FocusCycle::new(&data(), "mexico");
        assert_eq!(c.starting_key(), Some("mexico"));
        c.advance();
        let seq: Vec<String> = (0..5).map(|_| c.next_primary().unwrap()).collect();
        assert_eq!(seq, vec!["india", "brazil", "mexico", "mexico", "india"]);
    }

    #[test]
    fn starting_mid_list_wraps_to_the_top() {
        let mut c = FocusCycle::new(&data(), "india");
        assert_eq!(c.index(), 3);
        c.advance();
        assert_eq!(c.next_primary().as_deref(), Some("brazil"));
        assert_eq!(c.next_primary().as_deref(), Some("india"));
        assert_eq!(c.next_primary().as_deref(), Some("mexico"));
    }

    #[test]
    fn unknown_start_uses_first_primary() {
        let mut c = FocusCycle::new(&data(), "atlantis");
        assert_eq!(c.starting_key(), Some("mexico"));
        assert_eq!(c.index(), 0);
        c.advance();
        assert_eq!(c.next_primary().as_deref(), Some("india"));
    }

    #[test]
    fn empty_data_has_no_focus() {
        let mut c = FocusCycle::new(&GlobePoints::default(), "mexico");
        assert_eq!(c.starting_key(), None);
        assert_eq!(c.next_primary(), None);
    }

    #[test]
    fn no_primary_location_means_no_focus() {
        let data = GlobePoints {
            locations: vec![
                Location::new("hub-dummy", 900.0, 260.0),
                Location::new("x-connected-point-1", 560.0, 190.0),
            ],
            points: Vec::new(),
            config: None,
        };
        let mut c = FocusCycle::new(&data, "mexico");
        assert_eq!(c.starting_key(), None);
        c.advance();
        for _ in 0..4 {
            assert_eq!(c.next_primary(), None);
        }
    }

    #[test]
    fn focus_tween_eases_and_finishes() {
        let mut t = FocusTween::new(4);
        assert_eq!(t.tick(), FocusStep::Idle);

        let from = CameraAngles::new(0.0, 1.0);
        let to = CameraAngles::new(1.0, 2.0);
        t.start(from, to);

        let mut last = None;
        for _ in 0..5 {
            match t.tick() {
                FocusStep::Moving(a) => last = Some(a),
                other => panic!("unexpected {other:?}"),
            }
        }
        let last = last.unwrap();
        assert!((last.azimuthal - 1.0).abs() < 1e-12);
        assert!((last.polar - 2.0).abs() < 1e-12);
        assert_eq!(t.tick(), FocusStep::Finished);
        assert!(!t.is_active());
    }

    #[test]
    fn focus_tween_wraps_azimuth() {
        let mut t = FocusTween::new(2);
        t.start(
            CameraAngles::new(-3.0, 1.0),
            CameraAngles::new(3.0, 1.0),
        );
        let target = t.target();
        assert!((target.azimuthal - (3.0 - std::f64::consts::TAU)).abs() < 1e-12);
    }
}
