//! The whole globe: intro sequencing and the focus cycle.
//!
//! `GlobeScene` is a pure frame-stepped model. The viewer calls `tick` once
//! per paint and draws whatever `render_snapshot` reports; nothing in here
//! touches the DOM or the GPU.

use core::f64::consts::PI;

use formats::GlobePoints;
use foundation::easing::ease_out_cubic;
use foundation::math::{CameraAngles, Vec3, camera_angles_for};
use runtime::FrameTween;

use crate::camera::OrbitCamera;
use crate::config::GlobeConfig;
use crate::connectors::{ConnectorSet, Selection};
use crate::cycle::{CycleTimer, FocusCycle, FocusStep, FocusTween};
use crate::error::SceneError;
use crate::globe_dots::GlobeDots;
use crate::labels::{LabelPlacement, Labels};
use crate::line_dots::LineDots;

/// Where the camera starts before swinging onto the first location.
const INTRO_CAMERA_START: CameraAngles = CameraAngles::new(-PI, 0.0);

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct RenderSnapshot<'a> {
    pub globe_opacity: f64,
    pub globe_body_radius: f64,
    /// Rotation of the globe group around +Y.
    pub rotation_y: f64,
    pub globe_dots: &'a [Vec3],
    /// Visible connector paths with their opacity.
    pub lines: Vec<(&'a [Vec3], f64)>,
    pub line_dots: Vec<Vec3>,
    pub view_proj: [[f32; 4]; 4],
}

#[derive(Debug, Clone)]
pub struct GlobeScene {
    config: GlobeConfig,
    data: GlobePoints,
    globe_dots: GlobeDots,
    connectors: ConnectorSet,
    line_dots: LineDots,
    labels: Labels,
    camera: OrbitCamera,
    cycle: FocusCycle,
    focus: FocusTween,
    timer: CycleTimer,
    selection: Selection,
    intro_target: CameraAngles,
    globe_fade: FrameTween,
    globe_opacity: f64,
    lines_opacity: f64,
    rotation_y: f64,
    finished_intro: bool,
    viewport: (f64, f64),
}

impl GlobeScene {
    /// Builds the scene; `seed` drives the travelling dots.
    pub fn new(data: GlobePoints, config: GlobeConfig, seed: u64) -> Result<Self, SceneError> {
        config.validate()?;

        let map = config.map_size;
        let radius = config.globe_radius;
        let globe_dots = GlobeDots::build(&data, map, radius, config.intro.dots_frames);
        let mut connectors = ConnectorSet::build(&data, map, radius);
        let labels = Labels::build(&data, &connectors, map, radius);
        let line_dots = LineDots::new(config.dots_amount, config.line_dot_spawn_chance, seed);

        let cycle = FocusCycle::new(&data, &config.starting_location);
        if cycle.starting_key() != Some(config.starting_location.as_str()) {
            tracing::warn!(
                starting_location = %config.starting_location,
                fallback = ?cycle.starting_key(),
                "starting location not in data"
            );
        }

        // The first selection is shown from the start and fades in with the globe.
        let mut selection = Selection::default();
        let mut intro_target = INTRO_CAMERA_START;
        if let Some(key) = cycle.starting_key() {
            selection = connectors.select(key, &config.featured_groups);
            connectors.set_visible(&selection, true);
            connectors.set_opacity(&selection, 0.0);
            if let Some(loc) = data.location(key) {
                intro_target = camera_angles_for(map, loc.record.x, loc.record.y);
            }
        }

        let mut camera = OrbitCamera::from_config(&config);
        camera.set_angles(INTRO_CAMERA_START);

        tracing::debug!(
            globe_dots = globe_dots.len(),
            connectors = connectors.connectors().len(),
            labels = labels.labels().len(),
            "globe scene built"
        );

        Ok(Self {
            focus: FocusTween::new(config.cycle.focus_frames),
            globe_fade: FrameTween::new(config.intro.globe_frames),
            config,
            data,
            globe_dots,
            connectors,
            line_dots,
            labels,
            camera,
            cycle,
            timer: CycleTimer::default(),
            selection,
            intro_target,
            globe_opacity: 0.0,
            lines_opacity: 0.0,
            rotation_y: 0.0,
            finished_intro: false,
            viewport: (1.0, 1.0),
        })
    }

    /// Advances one paint; `dt_ms` feeds the cycle timer only, animations
    /// are frame-counted.
    pub fn tick(&mut self, dt_ms: f64) {
        if self.timer.tick(dt_ms) {
            self.show_next_location();
        }

        self.step_intro();

        if self.finished_intro {
            self.line_dots.tick(&self.selection, &self.connectors);
        }

        match self.focus.tick() {
            FocusStep::Idle => {}
            FocusStep::Moving(angles) => {
                self.camera.set_angles(angles);
                self.rotation_y += self.config.cycle.spin_rad_per_frame;
            }
            FocusStep::Finished => self.timer.arm_if_idle(self.config.cycle.dwell_ms),
        }
    }

    fn step_intro(&mut self) {
        if let Some(progress) = self.globe_dots.tick() {
            if !self.focus.is_active() {
                self.camera
                    .set_angles(INTRO_CAMERA_START.lerp(self.intro_target, progress));
            }
        }

        let fade_at = self.config.intro.globe_fade_at;
        let labels_at = self.config.intro.labels_at;
        let dots = *self.globe_dots.tween();

        if dots.reached(fade_at) && self.globe_fade.is_running() {
            let eased = ease_out_cubic(self.globe_fade.progress());
            self.globe_opacity = self.config.alphas.globe * eased;
            self.lines_opacity = self.config.alphas.lines * eased;
            self.connectors.set_opacity(&self.selection, self.lines_opacity);
            self.globe_fade.advance();
        }

        if dots.reached(labels_at) && !self.labels.is_visible() {
            self.labels.show();
            if let Some(key) = self.cycle.starting_key().map(str::to_string) {
                self.change(&key, true);
            }
        }

        if self.labels.is_visible() && !self.finished_intro {
            self.finished_intro = true;
            self.cycle.advance();
            self.timer.arm(self.config.cycle.first_delay_ms);
            tracing::debug!("intro finished");
        }
    }

    /// Focuses the next primary location in the cycle.
    pub fn show_next_location(&mut self) {
        if let Some(key) = self.cycle.next_primary() {
            self.change(&key, false);
        }
    }

    /// Focuses `key`. With `init` the camera stays put and travelling dots
    /// keep their lines.
    pub fn change_location(&mut self, key: &str, init: bool) -> Result<(), SceneError> {
        if self.data.location(key).is_none() {
            return Err(SceneError::UnknownLocation {
                key: key.to_string(),
            });
        }
        self.change(key, init);
        Ok(())
    }

    fn change(&mut self, key: &str, init: bool) {
        self.connectors.set_visible(&self.selection, false);

        let extra: &[String] = if key == self.config.starting_location {
            &self.config.featured_groups
        } else {
            &[]
        };
        let selection = self.connectors.select(key, extra);
        self.connectors.set_visible(&selection, true);
        self.connectors.set_opacity(&selection, self.lines_opacity);
        self.labels.set_active(key);

        if !init {
            if let Some(loc) = self.data.location(key) {
                // Aim where the location will be once the flight lands; the
                // globe spins on every moving frame, `focus_frames + 1` of them.
                let spin = self.config.cycle.spin_rad_per_frame;
                let landing_rotation =
                    self.rotation_y + spin * (f64::from(self.config.cycle.focus_frames) + 1.0);
                let mut target = camera_angles_for(self.config.map_size, loc.record.x, loc.record.y);
                target.azimuthal += landing_rotation;
                self.focus.start(self.camera.angles(), target);
            }
            self.line_dots.reassign(&selection, &self.connectors);
        }

        tracing::debug!(
            key,
            init,
            connectors = selection.connectors.len(),
            "focus changed"
        );
        self.selection = selection;
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
        self.camera.set_viewport(width, height);
    }

    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn data(&self) -> &GlobePoints {
        &self.data
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn connectors(&self) -> &ConnectorSet {
        &self.connectors
    }

    pub fn globe_dots(&self) -> &GlobeDots {
        &self.globe_dots
    }

    pub fn line_dots(&self) -> &LineDots {
        &self.line_dots
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Key of the location currently in focus.
    pub fn focused_key(&self) -> Option<&str> {
        self.labels.active().map(|l| l.key.as_str())
    }

    pub fn is_intro_finished(&self) -> bool {
        self.finished_intro
    }

    pub fn is_focusing(&self) -> bool {
        self.focus.is_active()
    }

    pub fn globe_opacity(&self) -> f64 {
        self.globe_opacity
    }

    pub fn rotation_y(&self) -> f64 {
        self.rotation_y
    }

    /// Label positions for the current viewport; empty until labels show.
    pub fn label_placements(&self) -> Vec<LabelPlacement> {
        if !self.labels.is_visible() {
            return Vec::new();
        }
        let (w, h) = self.viewport;
        self.labels.placements(&self.camera, self.rotation_y, w, h)
    }

    pub fn render_snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            globe_opacity: self.globe_opacity,
            globe_body_radius: self.config.globe_body_radius(),
            rotation_y: self.rotation_y,
            globe_dots: self.globe_dots.positions(),
            lines: self.connectors.visible_paths().collect(),
            line_dots: self.line_dots.visible_positions().collect(),
            view_proj: self.camera.view_proj_f32(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GlobeScene;
    use crate::config::GlobeConfig;
    use crate::error::SceneError;
    use core::f64::consts::TAU;
    use formats::{GlobePoints, Location};
    use foundation::math::{MapSize, camera_angles_for};

    fn data() -> GlobePoints {
        GlobePoints {
            locations: vec![
                Location::named("mexico", "Mexico", 310.0, 260.0),
                Location::new("mexico-connected-point-1", 560.0, 190.0),
                Location::named("india", "India", 1430.0, 330.0),
                Location::new("india-connected-point-1", 1500.0, 300.0),
            ],
            points: Vec::new(),
            config: None,
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = GlobeConfig::default();
        config.globe_radius = 0.0;
        assert!(matches!(
            GlobeScene::new(data(), config, 1),
            Err(SceneError::InvalidConfig { field: "globe_radius", .. })
        ));
    }

    #[test]
    fn starting_selection_is_visible_but_transparent() {
        let scene = GlobeScene::new(data(), GlobeConfig::default(), 1).unwrap();
        let snap = scene.render_snapshot();
        assert_eq!(snap.lines.len(), 1);
        assert_eq!(snap.lines[0].1, 0.0);
        assert_eq!(snap.globe_opacity, 0.0);
        assert!(scene.label_placements().is_empty());
    }

    fn quick_config() -> GlobeConfig {
        let mut config = GlobeConfig::default();
        config.dots_amount = 10;
        config.line_dot_spawn_chance = 1.0;
        config.intro.dots_frames = 10;
        config.intro.globe_frames = 4;
        config.cycle.focus_frames = 5;
        config.cycle.first_delay_ms = 100.0;
        config.cycle.dwell_ms = 50.0;
        config
    }

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn intro_fades_globe_then_shows_labels() {
        let mut scene = GlobeScene::new(data(), GlobeConfig::default(), 1).unwrap();
        scene.set_viewport(1280.0, 720.0);

        for _ in 0..111 {
            scene.tick(16.0);
        }
        assert_eq!(scene.globe_opacity(), 0.0);
        scene.tick(16.0);
        assert!(scene.globe_opacity() > 0.0);

        for _ in 112..118 {
            scene.tick(16.0);
        }
        assert!(!scene.is_intro_finished());
        assert_eq!(scene.focused_key(), None);

        scene.tick(16.0);
        assert!(scene.is_intro_finished());
        assert_eq!(scene.focused_key(), Some("mexico"));
        assert!(!scene.label_placements().is_empty());
        assert!(!scene.is_focusing());
    }

    #[test]
    fn intro_camera_lands_on_starting_location() {
        let mut scene = GlobeScene::new(data(), GlobeConfig::default(), 1).unwrap();
        for _ in 0..200 {
            scene.tick(16.0);
        }
        assert!(!scene.globe_dots().is_animating());
        let target = camera_angles_for(MapSize::default(), 310.0, 260.0);
        let angles = scene.camera().angles();
        assert_close(angles.azimuthal, target.azimuthal, 1e-9);
        assert_close(angles.polar, target.polar, 1e-9);
        assert_close(scene.globe_opacity(), 1.0, 1e-12);
    }

    #[test]
    fn cycle_visits_locations_and_moves_the_camera() {
        let mut scene = GlobeScene::new(data(), quick_config(), 5).unwrap();
        let mut visited: Vec<String> = Vec::new();
        for _ in 0..60 {
            scene.tick(10.0);
            if let Some(key) = scene.focused_key() {
                if visited.last().map(String::as_str) != Some(key) {
                    visited.push(key.to_string());
                }
            }
            if visited.len() == 2 && !scene.is_focusing() {
                break;
            }
        }
        assert_eq!(visited, vec!["mexico", "india"]);

        let snap = scene.render_snapshot();
        assert_eq!(snap.lines.len(), 1);
        assert_eq!(snap.lines[0].1, 1.0);
        let india = scene.connectors().group("india").unwrap().connectors[0];
        assert_eq!(
            snap.lines[0].0,
            scene.connectors().connector(india).unwrap().path.as_slice()
        );

        let target = camera_angles_for(MapSize::default(), 1430.0, 330.0);
        let angles = scene.camera().angles();
        let wrapped = (angles.azimuthal - target.azimuthal).rem_euclid(TAU);
        assert!(wrapped < 1e-9 || TAU - wrapped < 1e-9, "azimuth off by {wrapped}");
        assert_close(angles.polar, target.polar, 1e-9);

        for _ in 0..10 {
            scene.tick(10.0);
        }
        assert_eq!(scene.focused_key(), Some("mexico"));
    }

    #[test]
    fn spinning_globe_still_lands_on_the_location() {
        let mut config = quick_config();
        config.cycle.focus_frames = 200;
        config.cycle.spin_rad_per_frame = 0.007;
        let mut scene = GlobeScene::new(data(), config, 5).unwrap();
        scene.set_viewport(1000.0, 800.0);

        let mut reached_india = false;
        for _ in 0..400 {
            scene.tick(10.0);
            if scene.focused_key() == Some("india") {
                reached_india = true;
            }
            if reached_india && !scene.is_focusing() {
                break;
            }
        }
        assert!(reached_india);
        assert!(!scene.is_focusing());
        assert_close(scene.rotation_y(), 0.007 * 201.0, 1e-9);

        // Relative to the turned globe the camera faces India.
        let target = camera_angles_for(MapSize::default(), 1430.0, 330.0);
        let angles = scene.camera().angles();
        let off = (angles.azimuthal - scene.rotation_y() - target.azimuthal).rem_euclid(TAU);
        assert!(off < 1e-9 || TAU - off < 1e-9, "azimuth off by {off}");

        let placements = scene.label_placements();
        let india = placements.iter().find(|p| p.key == "india").unwrap();
        assert!(india.active && india.facing);
        assert!((india.x - 500.0).abs() < 80.0, "india label at x = {}", india.x);
    }

    #[test]
    fn dummy_hub_is_labelled_but_never_focused() {
        let mut data = data();
        data.locations.insert(2, Location::new("hub-dummy", 900.0, 260.0));
        let mut scene = GlobeScene::new(data, quick_config(), 3).unwrap();

        let keys: Vec<&str> = scene.labels().labels().iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, vec!["mexico", "hub-dummy", "india"]);

        let mut focused: Vec<String> = Vec::new();
        for _ in 0..300 {
            scene.tick(10.0);
            if let Some(key) = scene.focused_key() {
                if focused.last().map(String::as_str) != Some(key) {
                    focused.push(key.to_string());
                }
            }
        }
        assert!(focused.len() >= 3, "cycle stalled: {focused:?}");
        assert!(focused.iter().all(|k| k != "hub-dummy"), "{focused:?}");
    }

    #[test]
    fn data_without_primary_locations_never_focuses() {
        let data = GlobePoints {
            locations: vec![
                Location::new("hub-dummy", 900.0, 260.0),
                Location::new("x-connected-point-1", 560.0, 190.0),
            ],
            points: Vec::new(),
            config: None,
        };
        let mut scene = GlobeScene::new(data, quick_config(), 1).unwrap();
        for _ in 0..100 {
            scene.tick(10.0);
            assert!(!scene.is_focusing());
        }
        assert!(scene.is_intro_finished());
        assert_eq!(scene.focused_key(), None);
        assert!(scene.selection().is_empty());
        assert!(scene.render_snapshot().lines.is_empty());
    }

    #[test]
    fn line_dots_start_after_the_intro() {
        let mut scene = GlobeScene::new(data(), quick_config(), 9).unwrap();
        for _ in 0..6 {
            scene.tick(10.0);
        }
        assert!(scene.render_snapshot().line_dots.is_empty());
        for _ in 0..3 {
            scene.tick(10.0);
        }
        assert!(!scene.render_snapshot().line_dots.is_empty());
    }

    #[test]
    fn featured_groups_join_the_starting_selection() {
        let mut config = GlobeConfig::default();
        config.featured_groups = vec!["india".to_string(), "missing".to_string()];
        let scene = GlobeScene::new(data(), config, 1).unwrap();
        assert_eq!(scene.selection().groups.len(), 2);
        assert_eq!(scene.render_snapshot().lines.len(), 2);
    }

    #[test]
    fn unknown_start_falls_back_to_first_primary() {
        let mut config = GlobeConfig::default();
        config.starting_location = "atlantis".to_string();
        let mut scene = GlobeScene::new(data(), config, 1).unwrap();
        for _ in 0..119 {
            scene.tick(16.0);
        }
        assert_eq!(scene.focused_key(), Some("mexico"));
    }

    #[test]
    fn unknown_location_is_an_error() {
        let mut scene = GlobeScene::new(data(), GlobeConfig::default(), 1).unwrap();
        assert!(matches!(
            scene.change_location("atlantis", false),
            Err(SceneError::UnknownLocation { .. })
        ));
        assert!(scene.change_location("india", true).is_ok());
        assert_eq!(scene.focused_key(), Some("india"));
        assert!(!scene.is_focusing());
    }
}
