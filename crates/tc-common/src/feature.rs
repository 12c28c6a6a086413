//! GeoJSON-shaped feature model produced by the upstream bulletin decoder.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One name/value/unit triple from a feature's metadata list.
///
/// Values are heterogeneous: bearing ranges arrive as two-element
/// arrays, ensemble member numbers as integers, provenance fields as
/// strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub name: String,
    pub value: Value,
    #[serde(default)]
    pub units: Option<String>,
}

/// Geometry of a decoded feature (a point, or the storm-centre point
/// for radius observations).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureGeometry {
    #[serde(rename = "type")]
    pub geometry_type: String,
    pub coordinates: Value,
}

impl FeatureGeometry {
    /// Extract the (lon, lat) of a point geometry.
    pub fn point(&self) -> Option<(f64, f64)> {
        let coords = self.coordinates.as_array()?;
        let lon = coords.first()?.as_f64()?;
        let lat = coords.get(1)?.as_f64()?;
        Some((lon, lat))
    }
}

/// Properties block of one decoded observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// Semantic quantity name in the decoder's vocabulary
    pub name: String,
    /// Scalar observation value in SI units
    pub value: f64,
    pub units: String,
    /// BUFR subset index within the bulletin
    pub subset: i64,
    /// `<name>-<number><basin-letter>` storm identifier
    pub wigos_station_identifier: String,
    /// Either a bare reference instant or a `reference/valid` interval
    #[serde(rename = "phenomenonTime")]
    pub phenomenon_time: String,
    #[serde(rename = "resultTime")]
    pub result_time: String,
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

impl FeatureProperties {
    /// Find a metadata entry by name.
    pub fn metadata_entry(&self, name: &str) -> Option<&MetadataEntry> {
        self.metadata.iter().find(|m| m.name == name)
    }
}

/// One atomic decoded observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomicFeature {
    #[serde(rename = "type", default = "feature_type")]
    pub feature_type: String,
    pub properties: FeatureProperties,
    pub geometry: FeatureGeometry,
}

fn feature_type() -> String {
    "Feature".to_string()
}

/// Wrapper the decoder hands over per feature id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureItem {
    pub geojson: AtomicFeature,
}

/// One decoded bulletin: feature id to feature wrapper, kept in
/// decoder emission order.
///
/// Order matters downstream: the threshold table of an aggregated
/// record is built in observation order.
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    items: Vec<(String, FeatureItem)>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, item: FeatureItem) {
        self.items.push((id.into(), item));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureItem)> {
        self.items.iter().map(|(id, item)| (id.as_str(), item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Serialize for FeatureCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.items.iter().map(|(id, item)| (id, item)))
    }
}

impl<'de> Deserialize<'de> for FeatureCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CollectionVisitor;

        impl<'de> Visitor<'de> for CollectionVisitor {
            type Value = FeatureCollection;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of feature id to feature wrapper")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut items = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, item)) = map.next_entry::<String, FeatureItem>()? {
                    items.push((id, item));
                }
                Ok(FeatureCollection { items })
            }
        }

        deserializer.deserialize_map(CollectionVisitor)
    }
}
