/// Page visibility as reported by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// What a visibility report changed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VisibilityChange {
    Unchanged,
    Paused,
    Resumed,
}

/// Decides whether the paint loop keeps scheduling itself.
///
/// The loop stops re-arming while hidden. A `Resumed` change tells the host
/// to kick the loop again, since nothing is pending at that point.
#[derive(Debug, Clone, Default)]
pub struct VisibilityGate {
    visibility: Visibility,
    forced_pause: bool,
}

impl VisibilityGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn should_schedule_next_frame(&self) -> bool {
        self.visibility == Visibility::Visible && !self.forced_pause
    }

    pub fn report(&mut self, visibility: Visibility) -> VisibilityChange {
        let was_running = self.should_schedule_next_frame();
        self.visibility = visibility;
        self.transition(was_running)
    }

    /// Host-requested pause, independent of page visibility.
    pub fn set_paused(&mut self, paused: bool) -> VisibilityChange {
        let was_running = self.should_schedule_next_frame();
        self.forced_pause = paused;
        self.transition(was_running)
    }

    fn transition(&self, was_running: bool) -> VisibilityChange {
        match (was_running, self.should_schedule_next_frame()) {
            (true, false) => VisibilityChange::Paused,
            (false, true) => VisibilityChange::Resumed,
            _ => VisibilityChange::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Visibility, VisibilityChange, VisibilityGate};

    #[test]
    fn hide_then_show_pauses_and_resumes() {
        let mut gate = VisibilityGate::new();
        assert!(gate.should_schedule_next_frame());

        assert_eq!(gate.report(Visibility::Hidden), VisibilityChange::Paused);
        assert!(!gate.should_schedule_next_frame());
        assert_eq!(gate.report(Visibility::Hidden), VisibilityChange::Unchanged);

        assert_eq!(gate.report(Visibility::Visible), VisibilityChange::Resumed);
        assert!(gate.should_schedule_next_frame());
    }

    #[test]
    fn forced_pause_holds_across_visibility() {
        let mut gate = VisibilityGate::new();
        assert_eq!(gate.set_paused(true), VisibilityChange::Paused);
        assert_eq!(gate.report(Visibility::Hidden), VisibilityChange::Unchanged);
        assert_eq!(gate.report(Visibility::Visible), VisibilityChange::Unchanged);
        assert_eq!(gate.set_paused(false), VisibilityChange::Resumed);
    }
}
