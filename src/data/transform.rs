//! Incident list to density features

use crate::data::{
    geojson::{FeatureCollection, GeoJsonFeature, WeightedPoint},
    incident::Incident,
};

/// Converts incidents into one weighted point feature each.
///
/// Coordinates are copied verbatim, intensity comes from [`Severity::weight`],
/// and input order is preserved. An empty slice yields an empty collection.
///
/// [`Severity::weight`]: crate::data::incident::Severity::weight
pub fn transform(incidents: &[Incident]) -> FeatureCollection {
    let features = incidents
        .iter()
        .map(|incident| {
            let point = WeightedPoint {
                longitude: incident.longitude,
                latitude: incident.latitude,
                intensity: incident.severity.weight(),
            };
            GeoJsonFeature::point(point, Some(incident.id.clone()), 1)
        })
        .collect();

    FeatureCollection::new(features)
}
