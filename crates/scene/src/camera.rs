//! Orbit camera looking at the globe centre.
//!
//! Angles follow the usual orbit-control convention: `polar` is measured from
//! the +Y pole and `azimuthal` turns around +Y starting at +Z.

use core::f64::consts::{PI, TAU};

use foundation::math::{CameraAngles, Vec3};

use crate::config::GlobeConfig;

/// Keeps the eye off the exact poles, where the look-at basis degenerates.
const POLAR_EPS: f64 = 1e-6;

/// Column-major 4x4 matrix (WGSL layout): `m[col][row]`.
pub type Mat4 = [[f64; 4]; 4];

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    angles: CameraAngles,
    pub distance: f64,
    pub fov_y_rad: f64,
    pub near: f64,
    pub far: f64,
    pub aspect: f64,
    pub target: Vec3,
}

impl OrbitCamera {
    pub fn from_config(config: &GlobeConfig) -> Self {
        let cam = &config.camera;
        Self {
            angles: CameraAngles::new(0.0, PI / 2.0),
            distance: config.globe_radius * cam.distance_radii,
            fov_y_rad: cam.fov_y_deg.to_radians(),
            near: cam.near,
            far: cam.far,
            aspect: 1.0,
            target: Vec3::ZERO,
        }
    }

    pub fn angles(&self) -> CameraAngles {
        self.angles
    }

    /// Sets the orbit angles; `polar` is clamped to `[0, π]`.
    pub fn set_angles(&mut self, angles: CameraAngles) {
        self.angles = CameraAngles::new(angles.azimuthal, angles.polar.clamp(0.0, PI));
    }

    /// Mirrors a canvas resize.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.aspect = if height <= 0.0 {
            1.0
        } else {
            (width / height).max(1e-6)
        };
    }

    pub fn eye(&self) -> Vec3 {
        let phi = self.angles.polar.clamp(POLAR_EPS, PI - POLAR_EPS);
        let theta = self.angles.azimuthal;
        let offset = Vec3::new(
            phi.sin() * theta.sin(),
            phi.cos(),
            phi.sin() * theta.cos(),
        ) * self.distance;
        self.target + offset
    }

    /// Camera right and up vectors in world space.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let f = (self.target - self.eye()).normalize_or_zero();
        let right = f.cross(Vec3::new(0.0, 1.0, 0.0)).normalize_or_zero();
        let up = right.cross(f);
        (right, up)
    }

    pub fn view_proj(&self) -> Mat4 {
        let view = mat4_look_at_rh(self.eye(), self.target, Vec3::new(0.0, 1.0, 0.0));
        let proj = mat4_perspective_rh_z0(self.fov_y_rad, self.aspect, self.near, self.far);
        mat4_mul(proj, view)
    }

    pub fn view_proj_f32(&self) -> [[f32; 4]; 4] {
        mat4_to_f32(self.view_proj())
    }

    /// Projects a world point to CSS pixels with the origin at the top left.
    ///
    /// Returns `None` for points behind the camera.
    pub fn project_to_screen(&self, p: Vec3, width: f64, height: f64) -> Option<(f64, f64)> {
        let clip = mat4_mul_vec4(self.view_proj(), [p.x, p.y, p.z, 1.0]);
        if !(clip[3].is_finite() && clip[3] > 1e-9) {
            return None;
        }
        let ndc_x = clip[0] / clip[3];
        let ndc_y = clip[1] / clip[3];
        if !(ndc_x.is_finite() && ndc_y.is_finite()) {
            return None;
        }
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Some((ndc_x * half_w + half_w, -(ndc_y * half_h) + half_h))
    }

    /// Whether `p` on a sphere around the target faces the eye.
    pub fn faces(&self, p: Vec3) -> bool {
        (p - self.target).dot(self.eye() - p) > 0.0
    }
}

/// Shifts `target` by whole turns so it lies within half a turn of `current`.
pub fn nearest_azimuth(current: f64, target: f64) -> f64 {
    let delta = (target - current + PI).rem_euclid(TAU) - PI;
    current + delta
}

pub fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    // Column-major matrix multiply: c = a * b
    let mut c = [[0.0f64; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

pub fn mat4_mul_vec4(m: Mat4, v: [f64; 4]) -> [f64; 4] {
    let mut out = [0.0f64; 4];
    for (row, o) in out.iter_mut().enumerate() {
        *o = m[0][row] * v[0] + m[1][row] * v[1] + m[2][row] * v[2] + m[3][row] * v[3];
    }
    out
}

/// Rotation around +Y, matching `Vec3::rotate_y`.
pub fn mat4_rotation_y(angle_rad: f64) -> Mat4 {
    let (s, c) = angle_rad.sin_cos();
    [
        [c, 0.0, -s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

pub fn mat4_to_f32(m: Mat4) -> [[f32; 4]; 4] {
    m.map(|col| col.map(|v| v as f32))
}

fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_rad).tan();

    // Column-major perspective matrix, RH, depth range [0, 1]:
    // [ f/aspect, 0,  0,            0           ]
    // [ 0,        f,  0,            0           ]
    // [ 0,        0,  far/(n-f),    n*f/(n-f)   ]
    // [ 0,        0, -1,            0           ]
    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, far / (near - far), -1.0],
        [0.0, 0.0, (near * far) / (near - far), 0.0],
    ]
}

fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalize_or_zero();
    let s = f.cross(up).normalize_or_zero();
    let u = s.cross(f);

    [
        [s.x, u.x, -f.x, 0.0],
        [s.y, u.y, -f.y, 0.0],
        [s.z, u.z, -f.z, 0.0],
        [-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0],
    ]
}
