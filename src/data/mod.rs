//! Incident records and their density representation.

pub mod geojson;
pub mod grid;
pub mod incident;
pub mod transform;

pub use geojson::{FeatureCollection, FeatureProperties, GeoJsonFeature, WeightedPoint};
pub use grid::DensityGrid;
pub use incident::{Category, Incident, IncidentId, Severity};
pub use transform::transform;
