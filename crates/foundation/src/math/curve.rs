use super::Vec3;

/// Number of segments a connector curve is sampled into.
pub const CURVE_DIVISIONS: usize = 200;

/// How far the control point is pushed out, relative to `chord² / |mid|²`.
pub const CONNECTOR_BOW: f64 = 0.7;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadraticBezier {
    pub start: Vec3,
    pub control: Vec3,
    pub end: Vec3,
}

impl QuadraticBezier {
    pub fn new(start: Vec3, control: Vec3, end: Vec3) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    pub fn point_at(&self, t: f64) -> Vec3 {
        let u = 1.0 - t;
        self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
    }

    /// Evenly spaced (in `t`) samples, `divisions + 1` points including both ends.
    pub fn sample(&self, divisions: usize) -> Vec<Vec3> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|i| self.point_at(i as f64 / divisions as f64))
            .collect()
    }
}

/// Builds the arc between two points on a sphere centred at the origin.
///
/// The control point is the chord midpoint scaled away from the centre by
/// `1 + 0.7 * chord² / |mid|²`, so longer chords bow out further. When the
/// midpoint sits on the centre (antipodal inputs) no direction exists and the
/// control point stays on the midpoint.
pub fn connector_curve(start: Vec3, end: Vec3) -> QuadraticBezier {
    let mid = start.midpoint(end);
    let chord_sq = start.distance(end).powi(2);
    let mid_sq = mid.length_squared();

    let bow = if mid_sq > f64::EPSILON {
        CONNECTOR_BOW * chord_sq / mid_sq
    } else {
        0.0
    };

    QuadraticBezier::new(start, mid + mid * bow, end)
}

#[cfg(test)]
mod tests {
    use super::{CURVE_DIVISIONS, QuadraticBezier, connector_curve};
    use crate::math::{MapSize, Vec3, map_to_sphere};

    const R: f64 = 800.0;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn control_point_bows_outward() {
        let map = MapSize::default();
        let pairs = [
            ((310.0, 260.0), (1150.0, 300.0)),
            ((512.0, 100.0), (520.0, 110.0)),
            ((0.0, 512.0), (900.0, 700.0)),
            ((1500.0, 80.0), (1600.0, 950.0)),
        ];
        for ((ax, ay), (bx, by)) in pairs {
            let a = map_to_sphere(map, ax, ay, R);
            let b = map_to_sphere(map, bx, by, R);
            let curve = connector_curve(a, b);
            let mid = a.midpoint(b);
            assert!(
                curve.control.length() > mid.length(),
                "control {:?} not outside midpoint {:?}",
                curve.control,
                mid
            );
        }
    }

    #[test]
    fn matches_closed_form_for_quarter_arc() {
        let a = Vec3::new(R, 0.0, 0.0);
        let b = Vec3::new(0.0, R, 0.0);
        let curve = connector_curve(a, b);

        // chord² = 2R², |mid|² = R²/2, bow = 0.7 * 4 = 2.8.
        assert_close(curve.control.x, 400.0 * 3.8, 1e-9);
        assert_close(curve.control.y, 400.0 * 3.8, 1e-9);
        assert_close(curve.control.z, 0.0, 1e-9);
    }

    #[test]
    fn samples_include_both_endpoints() {
        let a = Vec3::new(R, 0.0, 0.0);
        let b = Vec3::new(0.0, 0.0, R);
        let path = connector_curve(a, b).sample(CURVE_DIVISIONS);
        assert_eq!(path.len(), CURVE_DIVISIONS + 1);
        assert_eq!(path[0], a);
        assert_eq!(path[CURVE_DIVISIONS], b);
    }

    #[test]
    fn antipodal_points_stay_finite() {
        let a = Vec3::new(R, 0.0, 0.0);
        let curve = connector_curve(a, -a);
        assert!(curve.control.is_finite());
        assert!(curve.sample(8).iter().all(|p| p.is_finite()));
    }

    #[test]
    fn coincident_points_collapse() {
        let a = Vec3::new(0.0, R, 0.0);
        let curve = connector_curve(a, a);
        assert_eq!(curve.control, a);
    }

    #[test]
    fn midpoint_parameter_uses_control_weighting() {
        let curve = QuadraticBezier::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        );
        assert_eq!(curve.point_at(0.5), Vec3::new(1.0, 1.0, 0.0));
    }
}
