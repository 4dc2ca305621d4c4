pub mod config;
pub mod constants;
pub mod geo;
pub mod map;

pub use config::{AggregationConfig, BaseStyle, ControlConfig, IncidentMapConfig, SurfaceConfig};
pub use geo::{LatLng, LatLngBounds};
pub use map::{IncidentMap, MapView};
