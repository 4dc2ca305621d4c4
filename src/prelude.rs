//! Prelude module for common incidentmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use incidentmap::prelude::*;`

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use crate::core::{
    config::{AggregationConfig, BaseStyle, IncidentMapConfig, SurfaceConfig},
    geo::{LatLng, LatLngBounds},
    map::{IncidentMap, MapView},
};

pub use crate::data::{
    geojson::{FeatureCollection, GeoJsonFeature},
    incident::{Category, Incident, IncidentId, Severity},
    transform::transform,
};

pub use crate::layers::{
    heatmap::{HeatmapConfig, HeatmapLayerSpec},
    marker::{MarkerConfig, MarkerKind, MarkerSpec},
    sync::{LayerSynchronizer, SyncReport, SyncState},
};

pub use crate::input::{
    events::{EventHandled, SurfaceEvent},
    selection::SelectionController,
};

pub use crate::storage::{CredentialStore, FileCredentialStore, MemoryCredentialStore};

pub use crate::surface::{
    adapter::{MapSurface, UpsertOutcome},
    engine::{Container, ControlKind, ControlPosition, EngineFactory, MapEngine},
    memory::{InMemoryEngine, InMemoryEngineFactory},
};

pub use crate::{Error, MapError, Result};
