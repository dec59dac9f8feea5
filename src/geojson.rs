//! The slice of GeoJSON the choropleth needs: region identity and outlines.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Longest outline kept per ring once decimated for terminal drawing.
pub const MAX_RING_POINTS: usize = 96;

#[derive(Debug, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

/// How a boundary feature identifies its country.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    /// The `ADMIN` display name.
    pub name: String,
    /// `ISO_A2`, when the dataset carries a usable one.
    pub iso_a2: Option<String>,
}

pub type Ring = Vec<(f64, f64)>;

impl FeatureCollection {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Feature {
    fn property(&self, name: &str) -> Option<&str> {
        self.properties.as_ref()?.get(name)?.as_str()
    }

    pub fn region(&self) -> Region {
        let iso_a2 = self
            .property("ISO_A2")
            .filter(|code| code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()))
            .map(str::to_uppercase);
        Region {
            name: self.property("ADMIN").unwrap_or_default().to_string(),
            iso_a2,
        }
    }

    /// Outer and inner rings as `(longitude, latitude)` pairs, decimated to at
    /// most [`MAX_RING_POINTS`] points each.
    pub fn rings(&self) -> Vec<Ring> {
        let Some(geometry) = &self.geometry else {
            return Vec::new();
        };
        let polygons: Vec<&Value> = match geometry.kind.as_str() {
            "Polygon" => vec![&geometry.coordinates],
            "MultiPolygon" => geometry
                .coordinates
                .as_array()
                .map(|polygons| polygons.iter().collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        polygons
            .into_iter()
            .filter_map(Value::as_array)
            .flatten()
            .filter_map(parse_ring)
            .map(decimate)
            .collect()
    }
}

fn parse_ring(ring: &Value) -> Option<Ring> {
    let points: Ring = ring
        .as_array()?
        .iter()
        .filter_map(|position| {
            let position = position.as_array()?;
            Some((position.first()?.as_f64()?, position.get(1)?.as_f64()?))
        })
        .collect();
    (points.len() >= 2).then_some(points)
}

fn decimate(ring: Ring) -> Ring {
    if ring.len() <= MAX_RING_POINTS {
        return ring;
    }
    let step = (ring.len() + MAX_RING_POINTS - 1) / MAX_RING_POINTS;
    let last = ring[ring.len() - 1];
    let mut kept: Ring = ring.into_iter().step_by(step).collect();
    if kept.last() != Some(&last) {
        kept.push(last);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "ADMIN": "France", "ISO_A2": "FR" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 45.0], [5.0, 45.0], [5.0, 50.0], [0.0, 45.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ADMIN": "Norway", "ISO_A2": "-99" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[5.0, 60.0], [10.0, 60.0, 12.0], [10.0, 65.0]]],
                        [[[15.0, 70.0], [20.0, 70.0], [20.0, 75.0]]]
                    ]
                }
            },
            { "type": "Feature", "properties": null, "geometry": null }
        ]
    }"#;

    #[test]
    fn reads_region_identity() {
        let collection = FeatureCollection::from_json(SAMPLE).unwrap();
        assert_eq!(collection.features.len(), 3);
        assert_eq!(
            collection.features[0].region(),
            Region {
                name: "France".to_string(),
                iso_a2: Some("FR".to_string())
            }
        );
        assert_eq!(collection.features[1].region().iso_a2, None);
        assert_eq!(collection.features[2].region().name, "");
    }

    #[test]
    fn extracts_rings_from_polygons_and_multipolygons() {
        let collection = FeatureCollection::from_json(SAMPLE).unwrap();
        assert_eq!(collection.features[0].rings().len(), 1);
        assert_eq!(collection.features[0].rings()[0][1], (5.0, 45.0));
        let norway = collection.features[1].rings();
        assert_eq!(norway.len(), 2);
        assert_eq!(norway[0][1], (10.0, 60.0));
        assert!(collection.features[2].rings().is_empty());
    }

    #[test]
    fn long_rings_are_decimated_but_keep_their_end() {
        let ring: Ring = (0..1000).map(|i| (i as f64, 0.0)).collect();
        let kept = decimate(ring);
        assert!(kept.len() <= MAX_RING_POINTS + 1);
        assert_eq!(kept.first(), Some(&(0.0, 0.0)));
        assert_eq!(kept.last(), Some(&(999.0, 0.0)));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(FeatureCollection::from_json("{ nope").is_err());
    }
}
