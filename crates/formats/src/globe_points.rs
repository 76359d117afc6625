use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Key fragment marking a location that only exists as a connector endpoint.
pub const CONNECTED_POINT_MARKER: &str = "connected-point";

/// Key fragment marking a hub that connects to every other location.
pub const DUMMY_MARKER: &str = "dummy";

/// A location entry as stored in the data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
}

/// An unlabelled dot on the map.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LocationRole {
    /// Labelled and visited by the focus cycle.
    Primary,
    /// Connector endpoint only.
    ConnectedPoint,
    /// Hub: connects to every other location, never focused.
    Dummy,
}

impl LocationRole {
    pub fn of(key: &str) -> Self {
        if key.contains(CONNECTED_POINT_MARKER) {
            LocationRole::ConnectedPoint
        } else if key.contains(DUMMY_MARKER) {
            LocationRole::Dummy
        } else {
            LocationRole::Primary
        }
    }

    pub fn is_primary(self) -> bool {
        self == LocationRole::Primary
    }
}

/// Whether the data file asks for a connector from `start` to `end`.
///
/// `end` must be named `"{start}-connected..."`, unless `start` is a dummy
/// hub, which links to everything except itself.
pub fn connects(start: &str, end: &str) -> bool {
    if start == end {
        return false;
    }
    start.contains(DUMMY_MARKER) || end.contains(&format!("{start}-connected"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub key: String,
    pub record: LocationRecord,
}

impl Location {
    pub fn new(key: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            key: key.into(),
            record: LocationRecord { name: None, x, y },
        }
    }

    pub fn named(key: impl Into<String>, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            key: key.into(),
            record: LocationRecord {
                name: Some(name.into()),
                x,
                y,
            },
        }
    }

    /// Display name, falling back to the key.
    pub fn display_name(&self) -> &str {
        self.record.name.as_deref().unwrap_or(&self.key)
    }

    pub fn role(&self) -> LocationRole {
        LocationRole::of(&self.key)
    }
}

/// Contents of `globe-points.json`.
///
/// Location order follows the document; it drives label order and the
/// focus cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobePoints {
    #[serde(
        rename = "countries",
        deserialize_with = "deserialize_ordered_locations",
        serialize_with = "serialize_ordered_locations"
    )]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub points: Vec<MapPoint>,
    /// Optional viewer configuration carried alongside the data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

#[derive(Debug)]
pub enum GlobePointsError {
    Empty,
    Json(serde_json::Error),
    NonFiniteCoordinate { what: String },
    Io { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for GlobePointsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobePointsError::Empty => write!(f, "globe points payload is empty"),
            GlobePointsError::Json(e) => write!(f, "invalid globe points json: {e}"),
            GlobePointsError::NonFiniteCoordinate { what } => {
                write!(f, "non-finite coordinate in {what}")
            }
            GlobePointsError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for GlobePointsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GlobePointsError::Json(e) => Some(e),
            GlobePointsError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl GlobePoints {
    pub fn from_json_str(text: &str) -> Result<Self, GlobePointsError> {
        if text.trim().is_empty() {
            return Err(GlobePointsError::Empty);
        }
        let data: GlobePoints = serde_json::from_str(text).map_err(GlobePointsError::Json)?;
        data.validate()?;
        Ok(data)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GlobePointsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GlobePointsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), GlobePointsError> {
        for loc in &self.locations {
            if !(loc.record.x.is_finite() && loc.record.y.is_finite()) {
                return Err(GlobePointsError::NonFiniteCoordinate {
                    what: format!("location {:?}", loc.key),
                });
            }
        }
        for (i, p) in self.points.iter().enumerate() {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(GlobePointsError::NonFiniteCoordinate {
                    what: format!("point #{i}"),
                });
            }
        }
        Ok(())
    }

    pub fn location(&self, key: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.key == key)
    }

    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.locations.iter().position(|l| l.key == key)
    }

    pub fn primary_locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter().filter(|l| l.role().is_primary())
    }

    /// Every `(start, end)` index pair that gets a connector, grouped by start
    /// in document order.
    pub fn connector_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (si, start) in self.locations.iter().enumerate() {
            for (ei, end) in self.locations.iter().enumerate() {
                if connects(&start.key, &end.key) {
                    pairs.push((si, ei));
                }
            }
        }
        pairs
    }
}

fn deserialize_ordered_locations<'de, D>(deserializer: D) -> Result<Vec<Location>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedLocations;

    impl<'de> Visitor<'de> for OrderedLocations {
        type Value = Vec<Location>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of locations keyed by id")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out: Vec<Location> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, record)) = map.next_entry::<String, LocationRecord>()? {
                // Duplicate keys: last value wins, first position is kept.
                match out.iter_mut().find(|l| l.key == key) {
                    Some(existing) => existing.record = record,
                    None => out.push(Location { key, record }),
                }
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(OrderedLocations)
}

fn serialize_ordered_locations<S>(locations: &[Location], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(locations.len()))?;
    for loc in locations {
        map.serialize_entry(&loc.key, &loc.record)?;
    }
    map.end()
}
