//! Optional per-cell aggregation of density points.
//!
//! Points are bucketed into a regular lat/lng grid. Each occupied cell becomes
//! one feature positioned at the intensity-weighted centroid of its points,
//! carrying the summed intensity and the number of incidents it stands for.

use crate::data::geojson::{FeatureCollection, GeoJsonFeature, WeightedPoint};
use crate::prelude::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct CellKey {
    row: i64,
    col: i64,
}

#[derive(Debug, Clone, Copy, Default)]
struct CellAccumulator {
    first_seen: usize,
    weighted_lat: f64,
    weighted_lng: f64,
    plain_lat: f64,
    plain_lng: f64,
    intensity: f64,
    count: u32,
}

impl CellAccumulator {
    fn add(&mut self, point: &WeightedPoint) {
        self.weighted_lat += point.latitude * point.intensity;
        self.weighted_lng += point.longitude * point.intensity;
        self.plain_lat += point.latitude;
        self.plain_lng += point.longitude;
        self.intensity += point.intensity;
        self.count += 1;
    }

    fn centroid(&self) -> (f64, f64) {
        if self.intensity > 0.0 {
            (
                self.weighted_lat / self.intensity,
                self.weighted_lng / self.intensity,
            )
        } else {
            let n = self.count as f64;
            (self.plain_lat / n, self.plain_lng / n)
        }
    }
}

/// Grid aggregator with square cells measured in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityGrid {
    cell_size: f64,
}

impl DensityGrid {
    /// Returns `None` unless `cell_size_degrees` is finite and positive
    pub fn new(cell_size_degrees: f64) -> Option<Self> {
        (cell_size_degrees.is_finite() && cell_size_degrees > 0.0).then_some(Self {
            cell_size: cell_size_degrees,
        })
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    fn key(&self, point: &WeightedPoint) -> CellKey {
        CellKey {
            row: (point.latitude / self.cell_size).floor() as i64,
            col: (point.longitude / self.cell_size).floor() as i64,
        }
    }

    /// Folds the collection into one feature per occupied cell.
    ///
    /// Output cells are ordered by the first input point that landed in them,
    /// so the result is deterministic for a given input.
    pub fn aggregate(&self, collection: &FeatureCollection) -> FeatureCollection {
        let mut cells: HashMap<CellKey, CellAccumulator> = HashMap::default();

        for (index, point) in collection.points().enumerate() {
            cells
                .entry(self.key(&point))
                .or_insert_with(|| CellAccumulator {
                    first_seen: index,
                    ..Default::default()
                })
                .add(&point);
        }

        let mut ordered: Vec<_> = cells.into_values().collect();
        ordered.sort_by_key(|cell| cell.first_seen);

        let features = ordered
            .into_iter()
            .map(|cell| {
                let (latitude, longitude) = cell.centroid();
                let point = WeightedPoint {
                    longitude,
                    latitude,
                    intensity: cell.intensity,
                };
                GeoJsonFeature::point(point, None, cell.count)
            })
            .collect();

        FeatureCollection::new(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    fn collection(points: &[(f64, f64, f64)]) -> FeatureCollection {
        FeatureCollection::new(
            points
                .iter()
                .map(|&(lat, lng, w)| {
                    GeoJsonFeature::point(WeightedPoint::new(LatLng::new(lat, lng), w), None, 1)
                })
                .collect(),
        )
    }

    #[test]
    fn test_rejects_bad_cell_size() {
        assert!(DensityGrid::new(0.0).is_none());
        assert!(DensityGrid::new(-1.0).is_none());
        assert!(DensityGrid::new(f64::NAN).is_none());
        assert!(DensityGrid::new(0.01).is_some());
    }

    #[test]
    fn test_aggregate_merges_points_in_same_cell() {
        let grid = DensityGrid::new(0.1).unwrap();
        let input = collection(&[(40.71, -74.01, 0.5), (40.72, -74.02, 0.5), (41.5, -73.5, 1.0)]);

        let output = grid.aggregate(&input);
        assert_eq!(output.len(), 2);

        let merged = &output.features[0];
        assert_eq!(merged.properties.count, 2);
        assert_eq!(merged.properties.intensity, 1.0);
        let centroid = merged.weighted_point();
        assert!((centroid.latitude - 40.715).abs() < 1e-9);
        assert!((centroid.longitude + 74.015).abs() < 1e-9);

        assert_eq!(output.features[1].properties.count, 1);
    }

    #[test]
    fn test_aggregate_preserves_total_intensity() {
        let grid = DensityGrid::new(0.05).unwrap();
        let input = collection(&[(1.0, 1.0, 0.25), (1.01, 1.01, 0.75), (2.0, 2.0, 1.0)]);
        let output = grid.aggregate(&input);
        assert!((output.total_intensity() - input.total_intensity()).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_empty() {
        let grid = DensityGrid::new(1.0).unwrap();
        assert!(grid.aggregate(&FeatureCollection::empty()).is_empty());
    }
}
