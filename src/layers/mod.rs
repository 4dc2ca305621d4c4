pub mod heatmap;
pub mod marker;
pub mod sync;

pub use heatmap::{HeatmapConfig, HeatmapLayerSpec};
pub use marker::{MarkerConfig, MarkerKind, MarkerSpec};
pub use sync::{LayerSynchronizer, SyncReport, SyncState};
