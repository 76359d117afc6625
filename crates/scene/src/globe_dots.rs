use formats::GlobePoints;
use foundation::easing::ease_in_out_cubic;
use foundation::math::{MapSize, Vec3, map_to_sphere};
use runtime::FrameTween;

/// The dotted globe surface and its "materialize" intro.
///
/// Every dot starts at the centre and flies out to its projected position.
/// Later dots get a head start proportional to their index, so the shell
/// fills in as a sweep instead of all at once.
#[derive(Debug, Clone)]
pub struct GlobeDots {
    targets: Vec<Vec3>,
    positions: Vec<Vec3>,
    tween: FrameTween,
}

impl GlobeDots {
    /// Unlabelled points first, then every location.
    pub fn build(data: &GlobePoints, map: MapSize, radius: f64, frames: u32) -> Self {
        let targets: Vec<Vec3> = data
            .points
            .iter()
            .map(|p| map_to_sphere(map, p.x, p.y, radius))
            .chain(
                data.locations
                    .iter()
                    .map(|l| map_to_sphere(map, l.record.x, l.record.y, radius)),
            )
            .collect();
        let positions = vec![Vec3::ZERO; targets.len()];
        Self {
            targets,
            positions,
            tween: FrameTween::new(frames),
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn targets(&self) -> &[Vec3] {
        &self.targets
    }

    pub fn tween(&self) -> &FrameTween {
        &self.tween
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_running()
    }

    /// Advances one frame; returns the eased progress of the first dot, or
    /// `None` once the intro is over.
    pub fn tick(&mut self) -> Option<f64> {
        if !self.tween.is_running() {
            return None;
        }

        let eased = ease_in_out_cubic(self.tween.progress());
        let n = self.targets.len().max(1) as f64;
        for (i, (pos, target)) in self.positions.iter_mut().zip(&self.targets).enumerate() {
            let progress = (eased + eased * (i as f64 / n)).min(1.0);
            *pos = *target * progress;
        }

        self.tween.advance();
        Some(eased)
    }
}

#[cfg(test)]
mod tests {
    use super::GlobeDots;
    use formats::{GlobePoints, Location, MapPoint};
    use foundation::math::{MapSize, Vec3};

    fn data() -> GlobePoints {
        GlobePoints {
            locations: vec![Location::named("mexico", "Mexico", 310.0, 260.0)],
            points: vec![
                MapPoint { x: 100.0, y: 100.0 },
                MapPoint { x: 900.0, y: 400.0 },
                MapPoint { x: 1200.0, y: 700.0 },
            ],
            config: None,
        }
    }

    #[test]
    fn points_then_locations_start_at_centre() {
        let dots = GlobeDots::build(&data(), MapSize::default(), 800.0, 10);
        assert_eq!(dots.len(), 4);
        assert!(dots.positions().iter().all(|p| *p == Vec3::ZERO));
        assert!((dots.targets()[3].length() - 800.0).abs() < 1e-9);
    }

    #[test]
    fn later_dots_lead_and_everything_lands() {
        let mut dots = GlobeDots::build(&data(), MapSize::default(), 800.0, 10);
        for _ in 0..4 {
            dots.tick();
        }
        let first = dots.positions()[0].length();
        let last = dots.positions()[3].length();
        assert!(last > first, "index head start missing: {first} vs {last}");

        let mut first_progress = 0.0;
        while let Some(p) = dots.tick() {
            first_progress = p;
        }
        assert_eq!(first_progress, 1.0);
        for (p, t) in dots.positions().iter().zip(dots.targets()) {
            assert_eq!(p, t);
        }
        assert!(!dots.is_animating());
    }
}
