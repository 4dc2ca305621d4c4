//! Layer Synchronizer.
//!
//! Reconciles the current incident list against a [`MapSurface`]. Driven by
//! two triggers, "surface ready" and "incidents changed"; work only happens in
//! [`SyncState::Ready`] and always starts from the current list, so a change
//! that arrives early is simply picked up by the ready pass.

use crate::{
    data::{grid::DensityGrid, incident::Incident, transform::transform},
    layers::{
        heatmap::HeatmapLayerSpec,
        marker::{MarkerConfig, MarkerSpec},
    },
    surface::{
        adapter::{MapSurface, UpsertOutcome},
        engine::{MapEngine, MarkerId},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No surface exists
    Uninitialized,
    /// Surface created, waiting for it to become interactive
    AwaitingSurface,
    /// Incident changes are applied as they arrive
    Ready,
}

/// What a single reconciliation pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub features: usize,
    pub source: Option<UpsertOutcome>,
    pub layer: Option<UpsertOutcome>,
    pub markers_removed: usize,
    /// Old markers the engine refused to remove; retried on the next pass
    pub markers_retained: usize,
    pub markers_placed: usize,
    pub markers_failed: usize,
}

#[derive(Debug)]
pub struct LayerSynchronizer {
    state: SyncState,
    layer_spec: HeatmapLayerSpec,
    marker_config: MarkerConfig,
    grid: Option<DensityGrid>,
    layer_created: bool,
    heatmap_disabled: bool,
    incident_markers: Vec<MarkerId>,
}

impl LayerSynchronizer {
    pub fn new(layer_spec: HeatmapLayerSpec, marker_config: MarkerConfig) -> Self {
        Self {
            state: SyncState::Uninitialized,
            layer_spec,
            marker_config,
            grid: None,
            layer_created: false,
            heatmap_disabled: false,
            incident_markers: Vec::new(),
        }
    }

    /// Aggregate density points per grid cell before uploading them
    pub fn with_grid(mut self, grid: Option<DensityGrid>) -> Self {
        self.grid = grid;
        self
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Whether heatmap rendering was given up for this surface lifetime
    pub fn heatmap_disabled(&self) -> bool {
        self.heatmap_disabled
    }

    pub fn incident_marker_count(&self) -> usize {
        self.incident_markers.len()
    }

    /// A new surface exists; per-surface bookkeeping starts over
    pub fn surface_created(&mut self) {
        self.reset();
        self.state = SyncState::AwaitingSurface;
    }

    /// The surface is gone. Its `destroy` already released markers and layers.
    pub fn surface_destroyed(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.state = SyncState::Uninitialized;
        self.layer_created = false;
        self.heatmap_disabled = false;
        self.incident_markers.clear();
    }

    /// Handles "surface became ready". Safe to call more than once.
    pub fn on_surface_ready<E: MapEngine>(
        &mut self,
        surface: &mut MapSurface<E>,
        incidents: &[Incident],
    ) -> SyncReport {
        self.state = SyncState::Ready;
        self.reconcile(surface, incidents)
    }

    /// Handles "incident list changed"; returns `None` while the surface is not ready
    pub fn on_incidents_changed<E: MapEngine>(
        &mut self,
        surface: &mut MapSurface<E>,
        incidents: &[Incident],
    ) -> Option<SyncReport> {
        if self.state != SyncState::Ready {
            log::debug!(
                "deferring sync of {} incidents until surface is ready",
                incidents.len()
            );
            return None;
        }
        Some(self.reconcile(surface, incidents))
    }

    fn reconcile<E: MapEngine>(
        &mut self,
        surface: &mut MapSurface<E>,
        incidents: &[Incident],
    ) -> SyncReport {
        let mut report = SyncReport::default();

        let mut features = transform(incidents);
        if let Some(grid) = &self.grid {
            features = grid.aggregate(&features);
        }
        report.features = features.len();

        match surface.upsert_source(&self.layer_spec.source_id, &features) {
            Ok(outcome) => report.source = Some(outcome),
            Err(e) => log::warn!(
                "failed to upload density source '{}': {}",
                self.layer_spec.source_id,
                e
            ),
        }

        if report.source.is_some() && !self.layer_created && !self.heatmap_disabled {
            match surface.upsert_heatmap_layer(&self.layer_spec) {
                Ok(outcome) => {
                    self.layer_created = true;
                    report.layer = Some(outcome);
                }
                Err(e) => {
                    log::warn!("heatmap layer unavailable, continuing without it: {}", e);
                    self.heatmap_disabled = true;
                }
            }
        }

        let mut retained = Vec::new();
        for id in self.incident_markers.drain(..) {
            match surface.remove_marker(id) {
                Ok(()) => report.markers_removed += 1,
                Err(e) => {
                    log::warn!("failed to remove marker {:?}: {}", id, e);
                    retained.push(id);
                }
            }
        }
        report.markers_retained = retained.len();
        self.incident_markers = retained;

        for incident in incidents {
            let spec = MarkerSpec::incident(incident, &self.marker_config);
            match surface.place_marker(&spec) {
                Ok(id) => {
                    self.incident_markers.push(id);
                    report.markers_placed += 1;
                }
                Err(e) => {
                    log::warn!("skipping marker for incident {}: {}", incident.id, e);
                    report.markers_failed += 1;
                }
            }
        }

        log::debug!(
            "synced {} features, {} markers ({} failed)",
            report.features,
            report.markers_placed,
            report.markers_failed
        );
        report
    }
}
