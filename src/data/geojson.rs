use crate::core::geo::{LatLng, LatLngBounds};
use crate::data::incident::IncidentId;
use serde::{Deserialize, Serialize};

/// A point weighted for density rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub intensity: f64,
}

impl WeightedPoint {
    pub fn new(position: LatLng, intensity: f64) -> Self {
        Self {
            longitude: position.lng,
            latitude: position.lat,
            intensity,
        }
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// GeoJSON geometry; only points are produced by the incident map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point { coordinates: [f64; 2] },
}

/// Properties carried by each density feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub intensity: f64,
    /// Source incident, absent for aggregated cells
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<IncidentId>,
    /// Number of incidents folded into this feature
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct GeoJsonFeature {
    pub geometry: GeoJsonGeometry,
    pub properties: FeatureProperties,
}

impl GeoJsonFeature {
    pub fn point(point: WeightedPoint, incident_id: Option<IncidentId>, count: u32) -> Self {
        Self {
            geometry: GeoJsonGeometry::Point {
                coordinates: point.position().to_position(),
            },
            properties: FeatureProperties {
                intensity: point.intensity,
                incident_id,
                count,
            },
        }
    }

    pub fn weighted_point(&self) -> WeightedPoint {
        let GeoJsonGeometry::Point { coordinates } = self.geometry;
        WeightedPoint::new(LatLng::from_position(coordinates), self.properties.intensity)
    }
}

/// Ordered collection of weighted point features. Always replaced wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<GeoJsonFeature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<GeoJsonFeature>) -> Self {
        Self { features }
    }

    /// The valid, zero-feature collection used to clear a source
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a GeoJSON feature collection
    pub fn from_str(geojson_str: &str) -> crate::Result<Self> {
        serde_json::from_str(geojson_str)
            .map_err(|e| crate::Error::ParseError(format!("Invalid GeoJSON: {}", e)))
    }

    pub fn to_geojson_string(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_value(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = WeightedPoint> + '_ {
        self.features.iter().map(GeoJsonFeature::weighted_point)
    }

    /// Sum of all feature intensities
    pub fn total_intensity(&self) -> f64 {
        self.points().map(|p| p.intensity).sum()
    }

    /// Gets the bounding box of all features
    pub fn bounds(&self) -> Option<LatLngBounds> {
        let mut points = self.points().map(|p| p.position());
        let first = points.next()?;
        let mut bounds = LatLngBounds::from_point(first);
        for point in points {
            bounds.extend(&point);
        }
        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection_serializes_as_geojson() {
        let json = FeatureCollection::empty().to_geojson_string().unwrap();
        assert_eq!(json, r#"{"type":"FeatureCollection","features":[]}"#);
    }

    #[test]
    fn test_feature_shape() {
        let point = WeightedPoint::new(LatLng::new(40.71, -74.0), 0.75);
        let feature = GeoJsonFeature::point(point, Some(IncidentId::new("a")), 1);
        let value = serde_json::to_value(&feature).unwrap();

        assert_eq!(value["type"], "Feature");
        assert_eq!(value["geometry"]["type"], "Point");
        assert_eq!(value["geometry"]["coordinates"][0], -74.0);
        assert_eq!(value["geometry"]["coordinates"][1], 40.71);
        assert_eq!(value["properties"]["intensity"], 0.75);
        assert_eq!(value["properties"]["incident_id"], "a");
    }

    #[test]
    fn test_parse_external_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [2.35, 48.85]},
                 "properties": {"intensity": 0.5}}
            ]
        }"#;

        let collection = FeatureCollection::from_str(json).unwrap();
        assert_eq!(collection.len(), 1);
        let feature = &collection.features[0];
        assert_eq!(feature.properties.count, 1);
        assert_eq!(feature.weighted_point().position(), LatLng::new(48.85, 2.35));
    }

    #[test]
    fn test_invalid_geojson_is_parse_error() {
        let err = FeatureCollection::from_str(r#"{"type":"Feature"}"#).unwrap_err();
        assert!(matches!(err, crate::Error::ParseError(_)));
    }

    #[test]
    fn test_bounds() {
        assert!(FeatureCollection::empty().bounds().is_none());

        let collection = FeatureCollection::new(vec![
            GeoJsonFeature::point(WeightedPoint::new(LatLng::new(40.0, -75.0), 1.0), None, 1),
            GeoJsonFeature::point(WeightedPoint::new(LatLng::new(41.0, -73.0), 1.0), None, 1),
        ]);
        let bounds = collection.bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(40.0, -75.0));
        assert_eq!(bounds.north_east, LatLng::new(41.0, -73.0));
        assert_eq!(collection.total_intensity(), 2.0);
    }
}
