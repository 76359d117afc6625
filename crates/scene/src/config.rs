use foundation::math::MapSize;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SceneError;

/// An sRGB colour written as `#rrggbb` in configuration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color(pub [f32; 3]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0]);

    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]))
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn with_alpha(self, alpha: f32) -> [f32; 4] {
        [self.0[0], self.0[1], self.0[2], alpha]
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex colour {s:?}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub globe: Color,
    pub globe_dots: Color,
    pub lines: Color,
    pub line_dots: Color,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            globe: Color::BLACK,
            globe_dots: Color([0.0, 132.0 / 255.0, 240.0 / 255.0]),
            lines: Color::WHITE,
            line_dots: Color::WHITE,
        }
    }
}

/// Target opacities the intro fades towards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alphas {
    pub globe: f64,
    pub lines: f64,
}

impl Default for Alphas {
    fn default() -> Self {
        Self {
            globe: 1.0,
            lines: 1.0,
        }
    }
}

/// Frame counts and thresholds of the introduction sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroTiming {
    /// Frames the globe dots take to fly out to the surface.
    pub dots_frames: u32,
    /// Frames of the globe/line fade-in.
    pub globe_frames: u32,
    /// Fraction of `dots_frames` after which the fade-in starts.
    pub globe_fade_at: f64,
    /// Fraction of `dots_frames` after which labels appear.
    pub labels_at: f64,
}

impl Default for IntroTiming {
    fn default() -> Self {
        Self {
            dots_frames: 170,
            globe_frames: 80,
            globe_fade_at: 0.65,
            labels_at: 0.7,
        }
    }
}

/// Focus cycle between primary locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleTiming {
    /// Frames the camera takes to swing to a new location.
    pub focus_frames: u32,
    /// Delay before the second location is shown.
    pub first_delay_ms: f64,
    /// Pause on each location once the camera has arrived.
    pub dwell_ms: f64,
    /// Globe spin applied while the camera is moving.
    pub spin_rad_per_frame: f64,
}

impl Default for CycleTiming {
    fn default() -> Self {
        Self {
            focus_frames: 200,
            first_delay_ms: 2000.0,
            dwell_ms: 500.0,
            spin_rad_per_frame: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    /// Camera distance as a multiple of the globe radius.
    pub distance_radii: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 60.0,
            near: 1.0,
            far: 10_000.0,
            distance_radii: 2.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub map_size: MapSize,
    pub globe_radius: f64,
    /// Size of the travelling dot pool.
    pub dots_amount: usize,
    /// Per-frame chance an idle travelling dot starts a new trip.
    pub line_dot_spawn_chance: f64,
    /// Location the intro turns to and the cycle starts from.
    pub starting_location: String,
    /// Connector groups shown together with the starting location.
    pub featured_groups: Vec<String>,
    pub intro: IntroTiming,
    pub cycle: CycleTiming,
    pub camera: CameraConfig,
    pub colors: Colors,
    pub alphas: Alphas,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            map_size: MapSize::default(),
            globe_radius: 800.0,
            dots_amount: 300,
            line_dot_spawn_chance: 0.01,
            starting_location: "mexico".to_string(),
            featured_groups: Vec::new(),
            intro: IntroTiming::default(),
            cycle: CycleTiming::default(),
            camera: CameraConfig::default(),
            colors: Colors::default(),
            alphas: Alphas::default(),
        }
    }
}

impl GlobeConfig {
    pub fn from_json_str(text: &str) -> Result<Self, SceneError> {
        let config: GlobeConfig = serde_json::from_str(text).map_err(SceneError::ConfigJson)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, SceneError> {
        let config: GlobeConfig = serde_json::from_value(value).map_err(SceneError::ConfigJson)?;
        config.validate()?;
        Ok(config)
    }

    /// Radius of the opaque globe body, slightly inside the dot shell.
    pub fn globe_body_radius(&self) -> f64 {
        self.globe_radius - self.globe_radius * 0.02
    }

    /// World-space diameter of a globe dot sprite.
    pub fn globe_dot_size(&self) -> f64 {
        self.globe_radius / 120.0
    }

    /// World-space radius of a travelling dot.
    pub fn line_dot_radius(&self) -> f64 {
        self.globe_radius / 250.0
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        fn invalid(field: &'static str, reason: &str) -> Result<(), SceneError> {
            Err(SceneError::InvalidConfig {
                field,
                reason: reason.to_string(),
            })
        }

        if !self.map_size.is_valid() {
            return invalid("map_size", "width and height must be positive");
        }
        if !(self.globe_radius.is_finite() && self.globe_radius > 0.0) {
            return invalid("globe_radius", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.line_dot_spawn_chance) {
            return invalid("line_dot_spawn_chance", "must be within [0, 1]");
        }
        if self.intro.dots_frames == 0 || self.intro.globe_frames == 0 {
            return invalid("intro", "frame counts must be non-zero");
        }
        if self.cycle.focus_frames == 0 {
            return invalid("cycle.focus_frames", "must be non-zero");
        }
        if self.cycle.first_delay_ms < 0.0 || self.cycle.dwell_ms < 0.0 {
            return invalid("cycle", "delays must not be negative");
        }
        let cam = &self.camera;
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return invalid("camera", "expected 0 < near < far");
        }
        if !(cam.fov_y_deg > 0.0 && cam.fov_y_deg < 180.0) {
            return invalid("camera.fov_y_deg", "must be within (0, 180)");
        }
        if cam.distance_radii <= 1.0 {
            return invalid("camera.distance_radii", "camera must sit outside the globe");
        }
        Ok(())
    }
}
