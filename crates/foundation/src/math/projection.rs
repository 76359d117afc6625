//! Map-pixel to sphere projection.
//!
//! Source coordinates are pixels on an equirectangular map of `MapSize`. The
//! map centre sits on the +X axis, the top edge on the +Y pole, and
//! increasing `x` turns towards -Z.

use core::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use super::Vec3;

/// Azimuthal offset applied to camera targets so lines are never viewed edge-on.
pub const CAMERA_AZIMUTH_OFFSET_RAD: f64 = 0.1;

/// Half-extent of the source map in pixels.
///
/// The projection treats `(width, height)` as the map centre, so the full
/// source image is `2 * width` by `2 * height` pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSize {
    pub width: f64,
    pub height: f64,
}

impl MapSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for MapSize {
    fn default() -> Self {
        Self::new(2048.0 / 2.0, 1024.0 / 2.0)
    }
}

/// Longitude/latitude in degrees for a map pixel.
///
/// Longitude spans ±180 and latitude ±90; both are sign-flipped so the map's
/// left/top edges land on positive angles.
pub fn map_to_lon_lat_deg(map: MapSize, x: f64, y: f64) -> (f64, f64) {
    let lon = ((x - map.width) / map.width) * -180.0;
    let lat = ((y - map.height) / map.height) * -90.0;
    (lon, lat)
}

/// Projects a map pixel onto a sphere of `radius` centred on the origin.
pub fn map_to_sphere(map: MapSize, x: f64, y: f64, radius: f64) -> Vec3 {
    let (lon, lat) = map_to_lon_lat_deg(map, x, y);
    lon_lat_deg_to_sphere(lon, lat, radius)
}

pub fn lon_lat_deg_to_sphere(lon_deg: f64, lat_deg: f64, radius: f64) -> Vec3 {
    let lon = lon_deg.to_radians();
    let lat = lat_deg.to_radians();
    let ring = lat.cos() * radius;
    Vec3::new(lon.cos() * ring, lat.sin() * radius, lon.sin() * ring)
}

/// Orbit angles (radians) that face a map pixel.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraAngles {
    /// Rotation around +Y.
    pub azimuthal: f64,
    /// Angle from the +Y pole.
    pub polar: f64,
}

impl CameraAngles {
    pub const fn new(azimuthal: f64, polar: f64) -> Self {
        Self { azimuthal, polar }
    }

    /// Linear blend from `self` towards `target`.
    pub fn lerp(self, target: Self, t: f64) -> Self {
        Self::new(
            self.azimuthal - (self.azimuthal - target.azimuthal) * t,
            self.polar - (self.polar - target.polar) * t,
        )
    }
}

pub fn camera_angles_for(map: MapSize, x: f64, y: f64) -> CameraAngles {
    let azimuthal = ((x - map.width) / map.width) * PI + FRAC_PI_2 + CAMERA_AZIMUTH_OFFSET_RAD;
    let polar = (y / (map.height * 2.0)) * PI;
    CameraAngles::new(azimuthal, polar)
}

#[cfg(test)]
mod tests {
    use super::{CameraAngles, MapSize, camera_angles_for, map_to_lon_lat_deg, map_to_sphere};
    use core::f64::consts::{FRAC_PI_2, PI};

    const R: f64 = 800.0;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn map_centre_projects_onto_plus_x() {
        let map = MapSize::default();
        let p = map_to_sphere(map, map.width, map.height, R);
        assert_close(p.x, R, 1e-9);
        assert_close(p.y, 0.0, 1e-9);
        assert_close(p.z, 0.0, 1e-9);
    }

    #[test]
    fn map_edges_hit_reference_axes() {
        let map = MapSize::default();

        // Left edge: lon +180.
        let west = map_to_sphere(map, 0.0, map.height, R);
        assert_close(west.x, -R, 1e-9);
        assert_close(west.z, 0.0, 1e-9);

        // Top edge: lat +90.
        let north = map_to_sphere(map, map.width, 0.0, R);
        assert_close(north.y, R, 1e-9);
        assert_close(north.x, 0.0, 1e-9);

        // Three quarters across: lon -90.
        let q = map_to_sphere(map, map.width * 1.5, map.height, R);
        assert_close(q.x, 0.0, 1e-9);
        assert_close(q.z, -R, 1e-9);
    }

    #[test]
    fn projected_points_lie_on_the_sphere() {
        let map = MapSize::default();
        for &(x, y) in &[(0.0, 0.0), (13.0, 400.0), (777.5, 12.25), (2048.0, 1024.0)] {
            let p = map_to_sphere(map, x, y, R);
            assert_close(p.length(), R, 1e-9);
        }
    }

    #[test]
    fn lon_lat_remap_is_linear() {
        let map = MapSize::new(100.0, 50.0);
        assert_eq!(map_to_lon_lat_deg(map, 100.0, 50.0), (0.0, 0.0));
        assert_eq!(map_to_lon_lat_deg(map, 150.0, 25.0), (-90.0, 45.0));
    }

    #[test]
    fn camera_angles_at_map_centre() {
        let map = MapSize::default();
        let a = camera_angles_for(map, map.width, map.height);
        assert_close(a.azimuthal, FRAC_PI_2 + 0.1, 1e-12);
        assert_close(a.polar, FRAC_PI_2, 1e-12);

        let top = camera_angles_for(map, 0.0, 0.0);
        assert_close(top.azimuthal, -PI + FRAC_PI_2 + 0.1, 1e-12);
        assert_close(top.polar, 0.0, 1e-12);
    }

    #[test]
    fn angles_lerp_reaches_target() {
        let a = CameraAngles::new(-PI, 0.0);
        let b = CameraAngles::new(1.0, 2.0);
        assert_eq!(a.lerp(b, 0.0), a);
        let end = a.lerp(b, 1.0);
        assert_close(end.azimuthal, 1.0, 1e-12);
        assert_close(end.polar, 2.0, 1e-12);
    }
}
