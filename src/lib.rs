//! # incidentmap
//!
//! Keeps an interactive map in step with a list of reported incidents.
//!
//! The crate renders incidents as a weighted density heatmap plus one marker
//! per incident, and offers a picking mode that turns map clicks into a
//! single selected coordinate. The concrete map engine sits behind the
//! [`MapEngine`](surface::MapEngine) trait; the
//! [`InMemoryEngine`](surface::InMemoryEngine) stands in for it in headless
//! hosts and tests.
//!
//! ```no_run
//! use incidentmap::prelude::*;
//!
//! # fn main() -> incidentmap::Result<()> {
//! let mut map = IncidentMap::new(
//!     InMemoryEngineFactory::new(),
//!     MemoryCredentialStore::new(),
//!     IncidentMapConfig::default(),
//! )?;
//! map.mount(Container::new("map", 480))?;
//! map.submit_credential("pk.example")?;
//! map.handle_event(SurfaceEvent::Loaded);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod storage;
pub mod surface;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::IncidentMapConfig,
    geo::{LatLng, LatLngBounds},
    map::{IncidentMap, MapView},
};

pub use data::{
    geojson::FeatureCollection,
    incident::{Category, Incident, IncidentId, Severity},
    transform::transform,
};

pub use layers::{
    heatmap::HeatmapLayerSpec,
    sync::{LayerSynchronizer, SyncState},
};

pub use input::{
    events::{EventHandled, SurfaceEvent},
    selection::SelectionController,
};

pub use storage::CredentialStore;

pub use surface::{
    adapter::MapSurface,
    engine::{EngineError, EngineFactory, MapEngine},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("map access credential is missing")]
    CredentialMissing,

    #[error("map surface could not be created: {0}")]
    SurfaceInit(String),

    #[error("map surface has been destroyed")]
    SurfaceDestroyed,

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;
