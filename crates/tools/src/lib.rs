//! Offline reports over a `globe-points.json` file.

use formats::{GlobePoints, LocationRole};
use foundation::math::{
    CameraAngles, MapSize, QuadraticBezier, camera_angles_for, connector_curve,
    map_to_lon_lat_deg, map_to_sphere,
};
use scene::connectors::ConnectorSet;
use serde::Serialize;

/// Projection parameters shared by every report.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    pub map: MapSize,
    pub radius: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            map: MapSize::default(),
            radius: 800.0,
        }
    }
}

fn role_name(role: LocationRole) -> &'static str {
    match role {
        LocationRole::Primary => "primary",
        LocationRole::ConnectedPoint => "connected-point",
        LocationRole::Dummy => "dummy",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub locations: usize,
    pub points: usize,
    pub primary: Vec<String>,
    pub connected_points: usize,
    pub dummies: usize,
    pub connectors: usize,
    /// Locations that start no connector.
    pub isolated: Vec<String>,
    /// Connected points no location links to.
    pub orphans: Vec<String>,
    pub has_config: bool,
}

pub fn inspect(data: &GlobePoints) -> InspectReport {
    let pairs = data.connector_pairs();
    let count_role = |role: LocationRole| data.locations.iter().filter(|l| l.role() == role).count();

    let isolated = data
        .locations
        .iter()
        .enumerate()
        .filter(|(i, l)| l.role().is_primary() && !pairs.iter().any(|(s, _)| s == i))
        .map(|(_, l)| l.key.clone())
        .collect();
    let orphans = data
        .locations
        .iter()
        .enumerate()
        .filter(|(i, l)| {
            l.role() == LocationRole::ConnectedPoint && !pairs.iter().any(|(_, e)| e == i)
        })
        .map(|(_, l)| l.key.clone())
        .collect();

    InspectReport {
        locations: data.locations.len(),
        points: data.points.len(),
        primary: data.primary_locations().map(|l| l.key.clone()).collect(),
        connected_points: count_role(LocationRole::ConnectedPoint),
        dummies: count_role(LocationRole::Dummy),
        connectors: pairs.len(),
        isolated,
        orphans,
        has_config: data.config.is_some(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedLocation {
    pub key: String,
    pub name: String,
    pub role: &'static str,
    pub map: [f64; 2],
    pub lon_lat: [f64; 2],
    pub position: [f64; 3],
    pub camera: CameraAngles,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectReport {
    pub radius: f64,
    pub map: MapSize,
    pub locations: Vec<ProjectedLocation>,
    /// Unlabelled globe dots, only when asked for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<[f64; 3]>>,
}

pub fn project(data: &GlobePoints, projection: Projection, with_points: bool) -> ProjectReport {
    let Projection { map, radius } = projection;
    let locations = data
        .locations
        .iter()
        .map(|l| {
            let (x, y) = (l.record.x, l.record.y);
            let (lon, lat) = map_to_lon_lat_deg(map, x, y);
            ProjectedLocation {
                key: l.key.clone(),
                name: l.display_name().to_string(),
                role: role_name(l.role()),
                map: [x, y],
                lon_lat: [lon, lat],
                position: map_to_sphere(map, x, y, radius).as_array(),
                camera: camera_angles_for(map, x, y),
            }
        })
        .collect();
    let points = with_points.then(|| {
        data.points
            .iter()
            .map(|p| map_to_sphere(map, p.x, p.y, radius).as_array())
            .collect()
    });

    ProjectReport {
        radius,
        map,
        locations,
        points,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveReport {
    pub from: String,
    pub to: String,
    pub start: [f64; 3],
    pub control: [f64; 3],
    pub end: [f64; 3],
    /// Highest distance from the centre along the sampled path.
    pub apex: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<[f64; 3]>>,
}

/// One entry per connector, optionally restricted to the group starting at `from`.
pub fn curves(
    data: &GlobePoints,
    projection: Projection,
    from: Option<&str>,
    with_path: bool,
) -> Vec<CurveReport> {
    let set = ConnectorSet::build(data, projection.map, projection.radius);
    set.connectors()
        .iter()
        .filter(|c| from.is_none_or(|key| c.from == key))
        .map(|c| {
            let (start, end) = match (c.path.first(), c.path.last()) {
                (Some(s), Some(e)) => (*s, *e),
                _ => Default::default(),
            };
            let QuadraticBezier { control, .. } = connector_curve(start, end);
            let apex = c.path.iter().map(|p| p.length()).fold(0.0, f64::max);
            CurveReport {
                from: c.from.clone(),
                to: c.to.clone(),
                start: start.as_array(),
                control: control.as_array(),
                end: end.as_array(),
                apex,
                path: with_path.then(|| c.path.iter().map(|p| p.as_array()).collect()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Projection, curves, inspect, project};
    use formats::{GlobePoints, Location, MapPoint};
    use pretty_assertions::assert_eq;

    fn data() -> GlobePoints {
        GlobePoints {
            locations: vec![
                Location::named("mexico", "Mexico", 310.0, 260.0),
                Location::new("mexico-connected-point-1", 560.0, 190.0),
                Location::new("mexico-connected-point-2", 600.0, 170.0),
                Location::named("india", "India", 1430.0, 330.0),
                Location::new("peru-connected-point-1", 400.0, 400.0),
            ],
            points: vec![MapPoint { x: 1024.0, y: 512.0 }],
            config: None,
        }
    }

    #[test]
    fn inspect_counts_roles_and_gaps() {
        let report = inspect(&data());
        assert_eq!(report.locations, 5);
        assert_eq!(report.primary, vec!["mexico".to_string(), "india".to_string()]);
        assert_eq!(report.connected_points, 3);
        assert_eq!(report.dummies, 0);
        assert_eq!(report.connectors, 2);
        assert_eq!(report.isolated, vec!["india".to_string()]);
        assert_eq!(report.orphans, vec!["peru-connected-point-1".to_string()]);
        assert!(!report.has_config);
    }

    #[test]
    fn project_puts_map_centre_on_x_axis() {
        let report = project(&data(), Projection::default(), true);
        assert_eq!(report.locations.len(), 5);
        assert_eq!(report.locations[0].name, "Mexico");
        assert_eq!(report.locations[1].role, "connected-point");
        let points = report.points.unwrap_or_default();
        assert_eq!(points.len(), 1);
        assert!((points[0][0] - 800.0).abs() < 1e-9);
        assert!(points[0][1].abs() < 1e-9);
        assert!(points[0][2].abs() < 1e-9);
    }

    #[test]
    fn project_omits_points_unless_asked() {
        let report = project(&data(), Projection::default(), false);
        assert!(report.points.is_none());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("points").is_none());
    }

    #[test]
    fn curves_bow_above_the_surface() {
        let all = curves(&data(), Projection::default(), None, false);
        assert_eq!(all.len(), 2);
        for c in &all {
            assert_eq!(c.from, "mexico");
            assert!(c.apex > 800.0);
            assert!(c.path.is_none());
        }

        let india = curves(&data(), Projection::default(), Some("india"), true);
        assert!(india.is_empty());

        let with_path = curves(&data(), Projection::default(), Some("mexico"), true);
        let path = with_path[0].path.as_ref().unwrap();
        assert_eq!(path.first(), Some(&with_path[0].start));
        assert_eq!(path.last(), Some(&with_path[0].end));
    }
}
