//! Flattens a scene snapshot into the arrays the GPU buffers take.

use foundation::math::Vec3;
use scene::GlobeScene;
use scene::camera::{mat4_mul, mat4_rotation_y, mat4_to_f32};

/// Upper bounds for the per-frame vertex buffers, fixed once the data is loaded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BufferCapacities {
    pub globe_dots: u32,
    /// Line-list vertices (two per segment) if every connector were visible.
    pub line_vertices: u32,
    pub line_dots: u32,
}

impl BufferCapacities {
    pub fn for_scene(scene: &GlobeScene) -> Self {
        let line_vertices: usize = scene
            .connectors()
            .connectors()
            .iter()
            .map(|c| c.path.len().saturating_sub(1) * 2)
            .sum();
        Self {
            globe_dots: scene.globe_dots().len() as u32,
            line_vertices: line_vertices as u32,
            line_dots: scene.line_dots().dots().len() as u32,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameData {
    /// Projection * view * globe rotation.
    pub view_proj: [[f32; 4]; 4],
    /// Camera right/up in globe-local space, for billboards.
    pub camera_right: [f32; 3],
    pub camera_up: [f32; 3],
    pub globe_radius: f32,
    pub globe_color: [f32; 4],
    pub globe_dot_color: [f32; 3],
    pub globe_dot_size: f32,
    pub globe_dots: Vec<[f32; 3]>,
    pub line_color: [f32; 3],
    /// Line-list vertices: position plus opacity.
    pub lines: Vec<[f32; 4]>,
    pub line_dot_color: [f32; 3],
    pub line_dot_radius: f32,
    pub line_dots: Vec<[f32; 3]>,
}

impl FrameData {
    pub fn from_scene(scene: &GlobeScene) -> Self {
        let snap = scene.render_snapshot();
        let config = scene.config();

        let model = mat4_rotation_y(snap.rotation_y);
        let view_proj = mat4_to_f32(mat4_mul(scene.camera().view_proj(), model));

        // Billboards live in globe-local space, so undo the globe rotation.
        let (right, up) = scene.camera().basis();
        let camera_right = right.rotate_y(-snap.rotation_y).to_f32();
        let camera_up = up.rotate_y(-snap.rotation_y).to_f32();

        let mut lines = Vec::new();
        for (path, opacity) in &snap.lines {
            push_segments(&mut lines, path, *opacity as f32);
        }

        Self {
            view_proj,
            camera_right,
            camera_up,
            globe_radius: snap.globe_body_radius as f32,
            globe_color: config.colors.globe.with_alpha(snap.globe_opacity as f32),
            globe_dot_color: config.colors.globe_dots.0,
            globe_dot_size: config.globe_dot_size() as f32,
            globe_dots: snap.globe_dots.iter().map(|p| p.to_f32()).collect(),
            line_color: config.colors.lines.0,
            lines,
            line_dot_color: config.colors.line_dots.0,
            line_dot_radius: config.line_dot_radius() as f32,
            line_dots: snap.line_dots.iter().map(|p| p.to_f32()).collect(),
        }
    }
}

fn push_segments(out: &mut Vec<[f32; 4]>, path: &[Vec3], opacity: f32) {
    for pair in path.windows(2) {
        for p in pair {
            let [x, y, z] = p.to_f32();
            out.push([x, y, z, opacity]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BufferCapacities, FrameData};
    use formats::{GlobePoints, Location};
    use foundation::math::CURVE_DIVISIONS;
    use pretty_assertions::assert_eq;
    use scene::{GlobeConfig, GlobeScene};

    fn scene() -> GlobeScene {
        let data = GlobePoints {
            locations: vec![
                Location::named("mexico", "Mexico", 310.0, 260.0),
                Location::new("mexico-connected-point-1", 560.0, 190.0),
                Location::named("india", "India", 1430.0, 330.0),
                Location::new("india-connected-point-1", 1500.0, 300.0),
            ],
            points: Vec::new(),
            config: None,
        };
        GlobeScene::new(data, GlobeConfig::default(), 1).unwrap()
    }

    #[test]
    fn capacities_cover_every_connector() {
        let caps = BufferCapacities::for_scene(&scene());
        assert_eq!(
            caps,
            BufferCapacities {
                globe_dots: 4,
                line_vertices: (2 * 2 * CURVE_DIVISIONS) as u32,
                line_dots: 300,
            }
        );
    }

    #[test]
    fn visible_lines_become_segment_pairs() {
        let frame = FrameData::from_scene(&scene());
        assert_eq!(frame.lines.len(), 2 * CURVE_DIVISIONS);
        assert!(frame.lines.iter().all(|v| v[3] == 0.0));
        assert_eq!(frame.lines[1][..3], frame.lines[2][..3]);
        assert_eq!(frame.globe_dots.len(), 4);
        assert!(frame.line_dots.is_empty());
        assert_eq!(frame.globe_color[3], 0.0);
    }

    #[test]
    fn frame_fits_the_buffers() {
        let mut scene = scene();
        let caps = BufferCapacities::for_scene(&scene);
        for _ in 0..400 {
            scene.tick(16.0);
            let frame = FrameData::from_scene(&scene);
            assert!(frame.lines.len() as u32 <= caps.line_vertices);
            assert!(frame.line_dots.len() as u32 <= caps.line_dots);
            assert_eq!(frame.globe_dots.len() as u32, caps.globe_dots);
        }
    }
}
