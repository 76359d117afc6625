use formats::{GlobePoints, LocationRole};
use foundation::math::{MapSize, Vec3, map_to_sphere};
use serde::Serialize;

use crate::camera::OrbitCamera;
use crate::connectors::ConnectorSet;

/// Name tag pinned to a location.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub key: String,
    pub name: String,
    /// Unrotated world position the label follows.
    pub anchor: Vec3,
    pub active: bool,
}

/// Screen placement of one label for the current frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub key: String,
    pub x: f64,
    pub y: f64,
    pub active: bool,
    /// False when the anchor sits on the far side of the globe.
    pub facing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Labels {
    labels: Vec<Label>,
    visible: bool,
}

impl Labels {
    /// One label per location except connected points, in data order.
    /// Dummy hubs are labelled even though the cycle never focuses them.
    ///
    /// The anchor is where the location's first connector starts; locations
    /// without connectors use their own projected position.
    pub fn build(data: &GlobePoints, connectors: &ConnectorSet, map: MapSize, radius: f64) -> Self {
        let labels = data
            .locations
            .iter()
            .filter(|loc| loc.role() != LocationRole::ConnectedPoint)
            .map(|loc| {
                let anchor = connectors
                    .group(&loc.key)
                    .and_then(|g| g.connectors.first())
                    .and_then(|&ci| connectors.connector(ci))
                    .and_then(|c| c.path.first().copied())
                    .unwrap_or_else(|| map_to_sphere(map, loc.record.x, loc.record.y, radius));
                Label {
                    key: loc.key.clone(),
                    name: loc.display_name().to_string(),
                    anchor,
                    active: false,
                }
            })
            .collect();
        Self {
            labels,
            visible: false,
        }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Marks `key` active and clears every other label.
    pub fn set_active(&mut self, key: &str) {
        for label in &mut self.labels {
            label.active = label.key == key;
        }
    }

    pub fn active(&self) -> Option<&Label> {
        self.labels.iter().find(|l| l.active)
    }

    /// Screen positions for every label whose anchor projects in front of
    /// the camera. Anchors are turned with the globe first.
    pub fn placements(
        &self,
        camera: &OrbitCamera,
        rotation_y: f64,
        width: f64,
        height: f64,
    ) -> Vec<LabelPlacement> {
        self.labels
            .iter()
            .filter_map(|label| {
                let world = label.anchor.rotate_y(rotation_y);
                let (x, y) = camera.project_to_screen(world, width, height)?;
                Some(LabelPlacement {
                    key: label.key.clone(),
                    x,
                    y,
                    active: label.active,
                    facing: camera.faces(world),
                })
            })
            .collect()
    }
}
