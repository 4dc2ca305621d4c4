//! Headless engine that keeps its state in memory.
//!
//! Every primitive call is recorded as an [`EngineOp`], so hosts without a
//! renderer (tests, the demo binary, server-side previews) can drive the whole
//! incident map and inspect what a real engine would have been asked to do.
//! Faults can be injected through the factory.

use crate::{
    core::geo::LatLng,
    data::{geojson::FeatureCollection, incident::IncidentId},
    layers::{
        heatmap::HeatmapLayerSpec,
        marker::{MarkerKind, MarkerSpec},
    },
    prelude::{HashMap, HashSet},
    surface::engine::{
        ControlKind, ControlPosition, EngineError, EngineFactory, ListenerId, MapEngine, MarkerId,
        SurfaceOptions,
    },
};
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

/// One recorded primitive call
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOp {
    AddControl(ControlKind, ControlPosition),
    AddSource(String),
    SetSourceData(String, usize),
    AddHeatmapLayer(String),
    AddMarker(MarkerId),
    RemoveMarker(MarkerId),
    AttachClickListener(ListenerId),
    DetachListener(ListenerId),
    FlyTo(LatLng, Option<f64>),
    Remove,
}

/// Counters shared between a factory and every engine it built
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub created: usize,
    pub removed: usize,
    pub live_markers: usize,
    pub live_listeners: usize,
}

#[derive(Debug, Clone, Default)]
struct FaultPlan {
    rejected_credentials: HashSet<String>,
    fail_layers: bool,
    fail_markers_for: HashSet<IncidentId>,
    fail_removals: usize,
    stale_existence_checks: bool,
}

/// Builds [`InMemoryEngine`]s
#[derive(Debug, Clone, Default)]
pub struct InMemoryEngineFactory {
    faults: FaultPlan,
    loaded_on_create: bool,
    stats: Rc<RefCell<EngineStats>>,
}

impl InMemoryEngineFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engines report loaded straight away instead of waiting for a ready event
    pub fn loaded_on_create(mut self) -> Self {
        self.loaded_on_create = true;
        self
    }

    pub fn reject_credential(mut self, credential: impl Into<String>) -> Self {
        self.faults.rejected_credentials.insert(credential.into());
        self
    }

    /// Every heatmap layer creation fails with a runtime error
    pub fn fail_layer_creation(mut self) -> Self {
        self.faults.fail_layers = true;
        self
    }

    /// Placing the marker of this incident fails with a runtime error
    pub fn fail_marker_for(mut self, id: impl Into<String>) -> Self {
        self.faults.fail_markers_for.insert(IncidentId::new(id));
        self
    }

    /// The next `count` marker removals on each engine fail with a runtime error
    pub fn fail_marker_removals(mut self, count: usize) -> Self {
        self.faults.fail_removals = count;
        self
    }

    /// `has_source`/`has_layer` always answer `false`, as an engine whose
    /// style is still settling does; the `add_*` calls still see the truth
    pub fn stale_existence_checks(mut self) -> Self {
        self.faults.stale_existence_checks = true;
        self
    }

    pub fn stats(&self) -> Rc<RefCell<EngineStats>> {
        self.stats.clone()
    }

    pub fn created(&self) -> usize {
        self.stats.borrow().created
    }
}

impl EngineFactory for InMemoryEngineFactory {
    type Engine = InMemoryEngine;

    fn create(&self, options: &SurfaceOptions) -> Result<InMemoryEngine, EngineError> {
        if options.container.id.is_empty() {
            return Err(EngineError::Rejected("container has no id".to_string()));
        }
        if self.faults.rejected_credentials.contains(&options.credential) {
            return Err(EngineError::Rejected("invalid access token".to_string()));
        }

        self.stats.borrow_mut().created += 1;
        Ok(InMemoryEngine {
            options: options.clone(),
            loaded: self.loaded_on_create,
            removed: false,
            center: options.center,
            zoom: options.zoom,
            controls: Vec::new(),
            sources: HashMap::default(),
            layers: HashMap::default(),
            markers: BTreeMap::new(),
            listeners: Vec::new(),
            next_id: 1,
            ops: Vec::new(),
            faults: self.faults.clone(),
            stats: self.stats.clone(),
        })
    }
}

/// A map engine living entirely in memory
#[derive(Debug)]
pub struct InMemoryEngine {
    options: SurfaceOptions,
    loaded: bool,
    removed: bool,
    center: LatLng,
    zoom: f64,
    controls: Vec<(ControlKind, ControlPosition)>,
    sources: HashMap<String, FeatureCollection>,
    layers: HashMap<String, HeatmapLayerSpec>,
    markers: BTreeMap<MarkerId, MarkerSpec>,
    listeners: Vec<ListenerId>,
    next_id: u64,
    ops: Vec<EngineOp>,
    faults: FaultPlan,
    stats: Rc<RefCell<EngineStats>>,
}

impl InMemoryEngine {
    fn ensure_live(&self) -> Result<(), EngineError> {
        if self.removed {
            Err(EngineError::Runtime("engine has been removed".to_string()))
        } else {
            Ok(())
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn options(&self) -> &SurfaceOptions {
        &self.options
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn ops(&self) -> &[EngineOp] {
        &self.ops
    }

    pub fn controls(&self) -> &[(ControlKind, ControlPosition)] {
        &self.controls
    }

    pub fn source(&self, id: &str) -> Option<&FeatureCollection> {
        self.sources.get(id)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn layer(&self, id: &str) -> Option<&HeatmapLayerSpec> {
        self.layers.get(id)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Live markers in placement order
    pub fn markers(&self) -> impl Iterator<Item = (&MarkerId, &MarkerSpec)> {
        self.markers.iter()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn selection_markers(&self) -> Vec<&MarkerSpec> {
        self.markers.values().filter(|m| m.is_selection()).collect()
    }

    pub fn incident_markers(&self) -> Vec<&MarkerSpec> {
        self.markers.values().filter(|m| !m.is_selection()).collect()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn view(&self) -> (LatLng, f64) {
        (self.center, self.zoom)
    }
}

impl MapEngine for InMemoryEngine {
    fn is_loaded(&self) -> bool {
        self.loaded && !self.removed
    }

    fn add_control(
        &mut self,
        kind: ControlKind,
        position: ControlPosition,
    ) -> Result<(), EngineError> {
        self.ensure_live()?;
        self.controls.push((kind, position));
        self.ops.push(EngineOp::AddControl(kind, position));
        Ok(())
    }

    fn has_source(&self, id: &str) -> bool {
        !self.faults.stale_existence_checks && self.sources.contains_key(id)
    }

    fn add_geojson_source(
        &mut self,
        id: &str,
        data: &FeatureCollection,
    ) -> Result<(), EngineError> {
        self.ensure_live()?;
        if self.sources.contains_key(id) {
            return Err(EngineError::AlreadyExists(id.to_string()));
        }
        self.sources.insert(id.to_string(), data.clone());
        self.ops.push(EngineOp::AddSource(id.to_string()));
        Ok(())
    }

    fn set_source_data(&mut self, id: &str, data: &FeatureCollection) -> Result<(), EngineError> {
        self.ensure_live()?;
        let source = self
            .sources
            .get_mut(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        *source = data.clone();
        self.ops
            .push(EngineOp::SetSourceData(id.to_string(), data.len()));
        Ok(())
    }

    fn has_layer(&self, id: &str) -> bool {
        !self.faults.stale_existence_checks && self.layers.contains_key(id)
    }

    fn add_heatmap_layer(&mut self, spec: &HeatmapLayerSpec) -> Result<(), EngineError> {
        self.ensure_live()?;
        if self.faults.fail_layers {
            return Err(EngineError::Runtime(format!(
                "heatmap layers unsupported for '{}'",
                spec.id
            )));
        }
        if self.layers.contains_key(&spec.id) {
            return Err(EngineError::AlreadyExists(spec.id.clone()));
        }
        if !self.sources.contains_key(&spec.source_id) {
            return Err(EngineError::NotFound(spec.source_id.clone()));
        }
        self.layers.insert(spec.id.clone(), spec.clone());
        self.ops.push(EngineOp::AddHeatmapLayer(spec.id.clone()));
        Ok(())
    }

    fn add_marker(&mut self, spec: &MarkerSpec) -> Result<MarkerId, EngineError> {
        self.ensure_live()?;
        if let MarkerKind::Incident(id) = &spec.kind {
            if self.faults.fail_markers_for.contains(id) {
                return Err(EngineError::Runtime(format!("cannot place marker for {}", id)));
            }
        }
        let id = MarkerId(self.next_id());
        self.markers.insert(id, spec.clone());
        self.ops.push(EngineOp::AddMarker(id));
        self.stats.borrow_mut().live_markers += 1;
        Ok(id)
    }

    fn remove_marker(&mut self, id: MarkerId) -> Result<(), EngineError> {
        self.ensure_live()?;
        if self.faults.fail_removals > 0 && self.markers.contains_key(&id) {
            self.faults.fail_removals -= 1;
            return Err(EngineError::Runtime(format!("marker {} is busy", id.0)));
        }
        if self.markers.remove(&id).is_none() {
            return Err(EngineError::NotFound(format!("marker {}", id.0)));
        }
        self.ops.push(EngineOp::RemoveMarker(id));
        self.stats.borrow_mut().live_markers -= 1;
        Ok(())
    }

    fn attach_click_listener(&mut self) -> Result<ListenerId, EngineError> {
        self.ensure_live()?;
        let id = ListenerId(self.next_id());
        self.listeners.push(id);
        self.ops.push(EngineOp::AttachClickListener(id));
        self.stats.borrow_mut().live_listeners += 1;
        Ok(id)
    }

    fn detach_listener(&mut self, id: ListenerId) {
        let before = self.listeners.len();
        self.listeners.retain(|l| *l != id);
        if self.listeners.len() < before {
            self.ops.push(EngineOp::DetachListener(id));
            self.stats.borrow_mut().live_listeners -= 1;
        }
    }

    fn fly_to(&mut self, center: LatLng, zoom: Option<f64>) -> Result<(), EngineError> {
        self.ensure_live()?;
        self.center = center;
        if let Some(zoom) = zoom {
            self.zoom = zoom;
        }
        self.ops.push(EngineOp::FlyTo(center, zoom));
        Ok(())
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        let mut stats = self.stats.borrow_mut();
        stats.live_markers -= self.markers.len();
        stats.live_listeners -= self.listeners.len();
        stats.removed += 1;
        drop(stats);

        self.markers.clear();
        self.listeners.clear();
        self.layers.clear();
        self.sources.clear();
        self.removed = true;
        self.ops.push(EngineOp::Remove);
    }
}
