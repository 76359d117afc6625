use formats::GlobePoints;
use foundation::math::{CURVE_DIVISIONS, MapSize, Vec3, connector_curve, map_to_sphere};

/// A sampled arc from one location to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub from: String,
    pub to: String,
    pub path: Vec<Vec3>,
}

/// All connectors that start at one location.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorGroup {
    pub name: String,
    /// Indices into `ConnectorSet::connectors`.
    pub connectors: Vec<usize>,
    pub visible: bool,
    pub opacity: f64,
}

/// The connectors currently on show, possibly spanning several groups.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub key: String,
    pub groups: Vec<usize>,
    pub connectors: Vec<usize>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectorSet {
    connectors: Vec<Connector>,
    groups: Vec<ConnectorGroup>,
}

impl ConnectorSet {
    /// One group per location, in data order; every group starts hidden.
    pub fn build(data: &GlobePoints, map: MapSize, radius: f64) -> Self {
        let projected: Vec<Vec3> = data
            .locations
            .iter()
            .map(|l| map_to_sphere(map, l.record.x, l.record.y, radius))
            .collect();

        let mut groups: Vec<ConnectorGroup> = data
            .locations
            .iter()
            .map(|l| ConnectorGroup {
                name: l.key.clone(),
                connectors: Vec::new(),
                visible: false,
                opacity: 1.0,
            })
            .collect();

        let mut connectors = Vec::new();
        for (start, end) in data.connector_pairs() {
            let path = connector_curve(projected[start], projected[end]).sample(CURVE_DIVISIONS);
            groups[start].connectors.push(connectors.len());
            connectors.push(Connector {
                from: data.locations[start].key.clone(),
                to: data.locations[end].key.clone(),
                path,
            });
        }

        Self { connectors, groups }
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn connector(&self, index: usize) -> Option<&Connector> {
        self.connectors.get(index)
    }

    pub fn groups(&self) -> &[ConnectorGroup] {
        &self.groups
    }

    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&ConnectorGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Selection for `key` plus any `extra` groups; unknown names are skipped
    /// and a group is never included twice.
    pub fn select(&self, key: &str, extra: &[String]) -> Selection {
        let mut selection = Selection {
            key: key.to_string(),
            ..Selection::default()
        };
        let names = std::iter::once(key).chain(extra.iter().map(String::as_str));
        for name in names {
            let Some(gi) = self.group_index(name) else {
                continue;
            };
            if selection.groups.contains(&gi) {
                continue;
            }
            selection.groups.push(gi);
            selection
                .connectors
                .extend_from_slice(&self.groups[gi].connectors);
        }
        selection
    }

    pub fn set_visible(&mut self, selection: &Selection, visible: bool) {
        for &gi in &selection.groups {
            self.groups[gi].visible = visible;
        }
    }

    pub fn set_opacity(&mut self, selection: &Selection, opacity: f64) {
        for &gi in &selection.groups {
            self.groups[gi].opacity = opacity;
        }
    }

    /// Paths of every visible group with the group's opacity.
    pub fn visible_paths(&self) -> impl Iterator<Item = (&[Vec3], f64)> {
        self.groups.iter().filter(|g| g.visible).flat_map(move |g| {
            g.connectors
                .iter()
                .map(move |&ci| (self.connectors[ci].path.as_slice(), g.opacity))
        })
    }

    /// Total sampled vertices across all connectors.
    pub fn vertex_count(&self) -> usize {
        self.connectors.iter().map(|c| c.path.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectorSet;
    use formats::{GlobePoints, Location};
    use foundation::math::{CURVE_DIVISIONS, MapSize, map_to_sphere};
    use pretty_assertions::assert_eq;

    fn data() -> GlobePoints {
        GlobePoints {
            locations: vec![
                Location::named("mexico", "Mexico", 310.0, 260.0),
                Location::new("mexico-connected-point-1", 560.0, 190.0),
                Location::new("mexico-connected-point-2", 700.0, 300.0),
                Location::named("india", "India", 1430.0, 330.0),
                Location::new("india-connected-point-1", 1500.0, 300.0),
            ],
            points: Vec::new(),
            config: None,
        }
    }

    #[test]
    fn builds_one_group_per_location() {
        let set = ConnectorSet::build(&data(), MapSize::default(), 800.0);
        assert_eq!(set.groups().len(), 5);
        assert_eq!(set.group("mexico").unwrap().connectors, vec![0, 1]);
        assert_eq!(set.group("india").unwrap().connectors, vec![2]);
        assert!(set.group("mexico-connected-point-1").unwrap().connectors.is_empty());
        assert!(set.groups().iter().all(|g| !g.visible));
        assert_eq!(set.vertex_count(), 3 * (CURVE_DIVISIONS + 1));
    }

    #[test]
    fn paths_start_at_the_origin_location() {
        let map = MapSize::default();
        let set = ConnectorSet::build(&data(), map, 800.0);
        let c = set.connector(0).unwrap();
        assert_eq!(c.from, "mexico");
        assert_eq!(c.to, "mexico-connected-point-1");
        assert_eq!(c.path[0], map_to_sphere(map, 310.0, 260.0, 800.0));
        assert_eq!(
            *c.path.last().unwrap(),
            map_to_sphere(map, 560.0, 190.0, 800.0)
        );
    }

    #[test]
    fn selection_merges_extra_groups_once() {
        let set = ConnectorSet::build(&data(), MapSize::default(), 800.0);
        let extra = vec!["india".to_string(), "nowhere".to_string(), "mexico".to_string()];
        let sel = set.select("mexico", &extra);
        assert_eq!(sel.groups, vec![0, 3]);
        assert_eq!(sel.connectors, vec![0, 1, 2]);

        let lone = set.select("nowhere", &[]);
        assert!(lone.is_empty());
    }

    #[test]
    fn only_visible_groups_are_drawn() {
        let mut set = ConnectorSet::build(&data(), MapSize::default(), 800.0);
        assert_eq!(set.visible_paths().count(), 0);

        let sel = set.select("india", &[]);
        set.set_visible(&sel, true);
        set.set_opacity(&sel, 0.25);
        let drawn: Vec<f64> = set.visible_paths().map(|(_, o)| o).collect();
        assert_eq!(drawn, vec![0.25]);
    }
}
