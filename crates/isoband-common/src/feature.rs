//! GeoJSON feature types for isogon/isoband output.
//!
//! A collection is a plain GeoJSON `FeatureCollection` with an extra
//! top-level `properties` object carrying caller metadata. Every feature is
//! a `Polygon` whose first ring is the exterior and the rest are holes:
//!
//! ```json
//! {"type": "Feature",
//!  "geometry": {"type": "Polygon", "coordinates": [[[lon, lat], ...], ...]},
//!  "properties": {"levelIndex": 0, "floor": 5.0, "ceiling": 7.5, "quadrant": "NW"}}
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Polygon, Quadrant};

/// Open key-value attributes attached by callers.
pub type Properties = serde_json::Map<String, PropertyValue>;

/// A scalar, array or object property value.
pub type PropertyValue = serde_json::Value;

/// Property value for a timestamp, as RFC 3339 with second precision.
pub fn timestamp_value(at: DateTime<Utc>) -> PropertyValue {
    PropertyValue::String(at.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// A GeoJSON FeatureCollection with collection-level properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Features in emission order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<Feature>,

    /// Caller-supplied metadata, passed through unmodified.
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Properties,
}

impl FeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self::with_properties(Properties::new())
    }

    /// Create an empty collection carrying the given properties.
    pub fn with_properties(properties: Properties) -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
            properties,
        }
    }

    /// Add a feature to the collection.
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn extend(&mut self, features: impl IntoIterator<Item = Feature>) {
        self.features.extend(features);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Drop features whose geometry is null or has no coordinates.
    /// Returns the number of features removed.
    pub fn retain_non_empty(&mut self) -> usize {
        let before = self.features.len();
        self.features.retain(|f| f.geometry.as_ref().is_some_and(|g| !g.is_empty()));
        before - self.features.len()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A single polygon feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Null when a simplification step collapsed the feature.
    #[serde(default)]
    pub geometry: Option<Geometry>,

    pub properties: FeatureProperties,
}

impl Feature {
    /// Create a polygon feature.
    pub fn polygon(polygon: &Polygon, properties: FeatureProperties) -> Self {
        Self {
            type_: "Feature".to_string(),
            geometry: Some(Geometry::polygon(polygon)),
            properties,
        }
    }
}

/// Geometry types exchanged with the isoband collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Rings as `[lon, lat]` arrays; the first ring is the exterior.
    Polygon {
        #[serde(default, deserialize_with = "null_as_default")]
        coordinates: Vec<Vec<[f64; 2]>>,
    },

    /// Accepted on input; simplification can split a polygon into parts.
    MultiPolygon {
        #[serde(default, deserialize_with = "null_as_default")]
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },

    /// GEOS-based tools write collapsed features as an empty collection.
    GeometryCollection {
        #[serde(default, deserialize_with = "null_as_default")]
        geometries: Vec<Geometry>,
    },

    /// Any other geometry type. Carries no polygon area.
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    pub fn polygon(polygon: &Polygon) -> Self {
        Geometry::Polygon {
            coordinates: polygon.to_coordinates(),
        }
    }

    /// True when there is no polygon exterior with any coordinates.
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Polygon { coordinates } => {
                coordinates.first().map_or(true, |ring| ring.is_empty())
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .all(|poly| poly.first().map_or(true, |ring| ring.is_empty())),
            Geometry::GeometryCollection { geometries } => {
                geometries.iter().all(Geometry::is_empty)
            }
            Geometry::Unsupported => true,
        }
    }
}

/// Property names owned by [`FeatureProperties`] itself.
pub const RESERVED_PROPERTY_KEYS: [&str; 5] =
    ["levelIndex", "floor", "ceiling", "quadrant", "isHole"];

/// Per-feature attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FeatureProperties {
    /// Position of the level in the generated sequence.
    #[serde(rename = "levelIndex")]
    pub level_index: usize,

    /// Inclusive lower bound of the level.
    pub floor: f64,

    /// Exclusive upper bound of the level.
    pub ceiling: f64,

    /// Quadrant the feature was clipped to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quadrant: Option<Quadrant>,

    /// Set when a hole ring is emitted as its own feature.
    #[serde(rename = "isHole", default, skip_serializing_if = "Option::is_none")]
    pub is_hole: Option<bool>,

    /// Caller-supplied attributes.
    #[serde(flatten)]
    pub extra: Properties,
}

impl FeatureProperties {
    pub fn new(level_index: usize, floor: f64, ceiling: f64) -> Self {
        Self {
            level_index,
            floor,
            ceiling,
            ..Default::default()
        }
    }

    pub fn with_quadrant(mut self, quadrant: Quadrant) -> Self {
        self.quadrant = Some(quadrant);
        self
    }

    pub fn with_hole_flag(mut self, is_hole: bool) -> Self {
        self.is_hole = Some(is_hole);
        self
    }

    /// Merge caller attributes. Existing keys are overwritten; keys the
    /// pipeline writes itself (see [`RESERVED_PROPERTY_KEYS`]) are skipped.
    pub fn with_extra(mut self, extra: &Properties) -> Self {
        for (key, value) in extra {
            if RESERVED_PROPERTY_KEYS.contains(&key.as_str()) {
                continue;
            }
            self.extra.insert(key.clone(), value.clone());
        }
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
