//! Fixed numbers shared by the incident map.
//! Keeping them in a single place makes it easier to tweak the visual contract.

/// Default map center (lower Manhattan).
pub const DEFAULT_CENTER: (f64, f64) = (40.7128, -74.0060);

/// Default zoom level when the surface is created.
pub const DEFAULT_ZOOM: f64 = 11.0;

/// Zoom range accepted by the engine.
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 22.0;

/// Id of the GeoJSON source feeding the density layer.
pub const HEATMAP_SOURCE_ID: &str = "incidents";

/// Id of the heatmap layer itself.
pub const HEATMAP_LAYER_ID: &str = "incidents-heat";

/// Feature property read by the heatmap weight expression.
pub const INTENSITY_PROPERTY: &str = "intensity";

/// Heatmap kernel radius in pixels.
pub const HEATMAP_RADIUS: f64 = 30.0;

/// Heatmap layer opacity.
pub const HEATMAP_OPACITY: f64 = 0.8;

/// Zoom level above which the heatmap stops being drawn.
pub const HEATMAP_MAX_ZOOM: f64 = 15.0;

/// Key under which the map access credential is persisted.
pub const CREDENTIAL_KEY: &str = "mapbox_token";

/// Minimum height of the rendering surface in CSS pixels.
pub const MIN_SURFACE_HEIGHT: u32 = 400;

/// Incident marker diameter in pixels.
pub const INCIDENT_MARKER_SIZE: f32 = 14.0;

/// Selection marker diameter in pixels.
pub const SELECTION_MARKER_SIZE: f32 = 20.0;
