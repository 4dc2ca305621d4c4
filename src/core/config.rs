//! Configuration for the incident map
//!
//! Every section has sensible defaults, so a config file only needs the keys
//! it wants to change. Base map styles come as presets resolved to a style URL.

use crate::{
    core::{
        constants::{CREDENTIAL_KEY, DEFAULT_CENTER, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM},
        geo::LatLng,
    },
    data::grid::DensityGrid,
    layers::{heatmap::HeatmapConfig, marker::MarkerConfig},
    surface::{
        adapter::SurfaceView,
        engine::{ControlKind, ControlPosition},
    },
    Result,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseStyle {
    #[default]
    Dark,
    Light,
    Streets,
    Satellite,
    Custom(String),
}

impl BaseStyle {
    pub fn url(&self) -> &str {
        match self {
            Self::Dark => "mapbox://styles/mapbox/dark-v11",
            Self::Light => "mapbox://styles/mapbox/light-v11",
            Self::Streets => "mapbox://styles/mapbox/streets-v12",
            Self::Satellite => "mapbox://styles/mapbox/satellite-streets-v12",
            Self::Custom(url) => url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlConfig {
    pub kind: ControlKind,
    pub position: ControlPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub center: LatLng,
    pub zoom: f64,
    pub style: BaseStyle,
    pub controls: Vec<ControlConfig>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            zoom: DEFAULT_ZOOM,
            style: BaseStyle::default(),
            controls: vec![
                ControlConfig {
                    kind: ControlKind::Navigation,
                    position: ControlPosition::TopRight,
                },
                ControlConfig {
                    kind: ControlKind::Fullscreen,
                    position: ControlPosition::TopRight,
                },
                ControlConfig {
                    kind: ControlKind::Geolocate,
                    position: ControlPosition::TopRight,
                },
            ],
        }
    }
}

impl SurfaceConfig {
    pub fn view(&self) -> SurfaceView {
        SurfaceView {
            style_url: self.style.url().to_string(),
            center: self.center,
            zoom: self.zoom,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Merge density points per square cell of this size; `None` keeps one point per incident
    pub cell_size_degrees: Option<f64>,
}

impl AggregationConfig {
    pub fn grid(&self) -> Option<DensityGrid> {
        self.cell_size_degrees.and_then(DensityGrid::new)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentMapConfig {
    pub surface: SurfaceConfig,
    pub heatmap: HeatmapConfig,
    pub markers: MarkerConfig,
    pub aggregation: AggregationConfig,
    /// Key of the credential entry in the persistent store
    pub credential_key: String,
}

impl Default for IncidentMapConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceConfig::default(),
            heatmap: HeatmapConfig::default(),
            markers: MarkerConfig::default(),
            aggregation: AggregationConfig::default(),
            credential_key: CREDENTIAL_KEY.to_string(),
        }
    }
}

impl IncidentMapConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.surface.center.is_valid() {
            return Err(crate::Error::Config(format!(
                "invalid center {}",
                self.surface.center
            )));
        }
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.surface.zoom) {
            return Err(crate::Error::Config(format!(
                "zoom must be within {}..={}, got {}",
                MIN_ZOOM, MAX_ZOOM, self.surface.zoom
            )));
        }
        if self.aggregation.cell_size_degrees.is_some() && self.aggregation.grid().is_none() {
            return Err(crate::Error::Config(
                "aggregation cell size must be positive".to_string(),
            ));
        }
        if self.credential_key.trim().is_empty() {
            return Err(crate::Error::Config(
                "credential key must not be empty".to_string(),
            ));
        }
        self.heatmap.validate()
    }
}
