//! Primitives of the external map engine.
//!
//! These traits mirror the engine's imperative API one call at a time. Nothing
//! here is idempotent: creating a source that exists is an error. The
//! [`MapSurface`](crate::surface::adapter::MapSurface) adapter layers the
//! upsert and lifecycle rules on top.

use crate::{
    core::geo::LatLng,
    data::geojson::FeatureCollection,
    layers::{heatmap::HeatmapLayerSpec, marker::MarkerSpec},
};
use serde::{Deserialize, Serialize};

/// Errors reported by engine primitives
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// A source or layer with this id is already registered
    #[error("'{0}' already exists")]
    AlreadyExists(String),

    /// A source, layer or marker with this id is unknown
    #[error("'{0}' not found")]
    NotFound(String),

    /// Container or credential refused at construction time
    #[error("engine rejected surface: {0}")]
    Rejected(String),

    /// Anything else raised while the surface is live
    #[error("engine runtime error: {0}")]
    Runtime(String),
}

/// Opaque id of a placed marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId(pub u64);

/// Opaque id of an attached event listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

/// Built-in controls the engine can overlay on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Navigation,
    Fullscreen,
    Geolocate,
    Scale,
}

/// Corner a control is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Host element the surface is mounted into
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    /// Height in CSS pixels; the surface enforces a minimum
    pub height: u32,
}

impl Container {
    pub fn new(id: impl Into<String>, height: u32) -> Self {
        Self {
            id: id.into(),
            height,
        }
    }
}

/// Everything the engine needs to build a surface
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceOptions {
    pub container: Container,
    pub credential: String,
    pub style_url: String,
    pub center: LatLng,
    pub zoom: f64,
}

/// Builds live engine instances
pub trait EngineFactory {
    type Engine: MapEngine;

    fn create(&self, options: &SurfaceOptions) -> Result<Self::Engine, EngineError>;
}

/// One live engine instance
pub trait MapEngine {
    /// Whether the style has finished loading
    fn is_loaded(&self) -> bool;

    fn add_control(
        &mut self,
        kind: ControlKind,
        position: ControlPosition,
    ) -> Result<(), EngineError>;

    fn has_source(&self, id: &str) -> bool;

    fn add_geojson_source(&mut self, id: &str, data: &FeatureCollection)
        -> Result<(), EngineError>;

    fn set_source_data(&mut self, id: &str, data: &FeatureCollection) -> Result<(), EngineError>;

    fn has_layer(&self, id: &str) -> bool;

    fn add_heatmap_layer(&mut self, spec: &HeatmapLayerSpec) -> Result<(), EngineError>;

    fn add_marker(&mut self, spec: &MarkerSpec) -> Result<MarkerId, EngineError>;

    fn remove_marker(&mut self, id: MarkerId) -> Result<(), EngineError>;

    fn attach_click_listener(&mut self) -> Result<ListenerId, EngineError>;

    fn detach_listener(&mut self, id: ListenerId);

    fn fly_to(&mut self, center: LatLng, zoom: Option<f64>) -> Result<(), EngineError>;

    /// Tears the instance down; releases any remaining markers, layers and sources
    fn remove(&mut self);
}
