//! Map Surface Adapter.
//!
//! Wraps one live [`MapEngine`] behind the operations the incident map needs:
//! idempotent source/layer upserts, tracked markers, a single click listener
//! and a ready latch. Everything the engine created through this adapter is
//! released by [`MapSurface::destroy`], which also runs on drop.

use crate::{
    core::{constants::MIN_SURFACE_HEIGHT, geo::LatLng},
    data::geojson::FeatureCollection,
    layers::{heatmap::HeatmapLayerSpec, marker::MarkerSpec},
    surface::{
        engine::{
            Container, ControlKind, ControlPosition, EngineError, EngineFactory, ListenerId,
            MapEngine, MarkerId, SurfaceOptions,
        },
        latch::ReadyLatch,
    },
    MapError, Result,
};
use std::collections::BTreeSet;

/// Result of an upsert against the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Initial view of a surface
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceView {
    pub style_url: String,
    pub center: LatLng,
    pub zoom: f64,
}

pub struct MapSurface<E: MapEngine> {
    engine: Option<E>,
    latch: ReadyLatch<MapSurface<E>>,
    markers: BTreeSet<MarkerId>,
    click_listener: Option<ListenerId>,
}

impl<E: MapEngine> MapSurface<E> {
    /// Builds a surface in `container`.
    ///
    /// Fails with [`MapError::CredentialMissing`] for a blank credential and
    /// with [`MapError::SurfaceInit`] when the container is unavailable or the
    /// engine rejects the construction.
    pub fn create<F>(
        factory: &F,
        container: Option<&Container>,
        credential: &str,
        view: &SurfaceView,
    ) -> Result<Self>
    where
        F: EngineFactory<Engine = E>,
    {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(MapError::CredentialMissing);
        }
        let container = container
            .ok_or_else(|| MapError::SurfaceInit("container is not mounted".to_string()))?;

        let options = SurfaceOptions {
            container: Container::new(
                container.id.clone(),
                container.height.max(MIN_SURFACE_HEIGHT),
            ),
            credential: credential.to_string(),
            style_url: view.style_url.clone(),
            center: view.center,
            zoom: view.zoom,
        };

        let engine = factory
            .create(&options)
            .map_err(|e| MapError::SurfaceInit(e.to_string()))?;

        log::info!("map surface created in '{}'", options.container.id);

        let mut surface = Self {
            engine: Some(engine),
            latch: ReadyLatch::new(),
            markers: BTreeSet::new(),
            click_listener: None,
        };

        if surface.engine.as_ref().is_some_and(|e| e.is_loaded()) {
            surface.mark_ready();
        }

        Ok(surface)
    }

    fn engine_mut(&mut self) -> Result<&mut E> {
        self.engine.as_mut().ok_or(MapError::SurfaceDestroyed)
    }

    /// Read access to the underlying engine, `None` once destroyed
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.engine.is_some() && self.latch.is_open()
    }

    pub fn is_destroyed(&self) -> bool {
        self.engine.is_none()
    }

    /// Runs `callback` once the surface is interactive, immediately if it already is
    pub fn on_ready<F>(&mut self, callback: F)
    where
        F: FnOnce(&mut MapSurface<E>) + 'static,
    {
        if self.is_destroyed() {
            return;
        }
        if let Some(callback) = self.latch.register(Box::new(callback)) {
            callback(self);
        }
    }

    /// Records the engine's "became interactive" signal.
    ///
    /// Returns `true` on the first signal only; queued callbacks run then.
    pub fn mark_ready(&mut self) -> bool {
        if self.is_destroyed() {
            return false;
        }
        let first = !self.latch.is_open();
        for callback in self.latch.open() {
            callback(self);
        }
        if first {
            log::info!("map surface ready");
        }
        first
    }

    pub fn add_control(&mut self, kind: ControlKind, position: ControlPosition) -> Result<()> {
        self.engine_mut()?.add_control(kind, position)?;
        Ok(())
    }

    /// Creates the source or replaces its data in place
    pub fn upsert_source(&mut self, id: &str, data: &FeatureCollection) -> Result<UpsertOutcome> {
        let engine = self.engine_mut()?;

        if engine.has_source(id) {
            engine.set_source_data(id, data)?;
            return Ok(UpsertOutcome::Updated);
        }

        match engine.add_geojson_source(id, data) {
            Ok(()) => Ok(UpsertOutcome::Created),
            Err(EngineError::AlreadyExists(_)) => {
                engine.set_source_data(id, data)?;
                Ok(UpsertOutcome::Updated)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Creates the heatmap layer once; later calls are no-ops
    pub fn upsert_heatmap_layer(&mut self, spec: &HeatmapLayerSpec) -> Result<UpsertOutcome> {
        let engine = self.engine_mut()?;

        if engine.has_layer(&spec.id) {
            return Ok(UpsertOutcome::Unchanged);
        }

        match engine.add_heatmap_layer(spec) {
            Ok(()) => Ok(UpsertOutcome::Created),
            Err(EngineError::AlreadyExists(_)) => Ok(UpsertOutcome::Unchanged),
            Err(e) => Err(e.into()),
        }
    }

    pub fn place_marker(&mut self, spec: &MarkerSpec) -> Result<MarkerId> {
        let id = self.engine_mut()?.add_marker(spec)?;
        self.markers.insert(id);
        Ok(id)
    }

    /// Removes a marker placed through this surface. Unknown ids are ignored.
    ///
    /// A marker the engine failed to remove stays tracked, so a later call or
    /// [`destroy`](Self::destroy) still releases it.
    pub fn remove_marker(&mut self, id: MarkerId) -> Result<()> {
        if !self.markers.contains(&id) {
            return Ok(());
        }
        match self.engine_mut()?.remove_marker(id) {
            Ok(()) | Err(EngineError::NotFound(_)) => {
                self.markers.remove(&id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_tracking(&self, id: MarkerId) -> bool {
        self.markers.contains(&id)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Attaches the click listener unless one is already attached.
    ///
    /// Returns `true` if a new listener was attached.
    pub fn attach_click_listener(&mut self) -> Result<bool> {
        if self.click_listener.is_some() {
            return Ok(false);
        }
        let id = self.engine_mut()?.attach_click_listener()?;
        self.click_listener = Some(id);
        log::debug!("click listener attached");
        Ok(true)
    }

    pub fn detach_click_listener(&mut self) {
        if let Some(id) = self.click_listener.take() {
            if let Some(engine) = self.engine.as_mut() {
                engine.detach_listener(id);
            }
            log::debug!("click listener detached");
        }
    }

    /// Whether a click delivered now should reach the picking logic
    pub fn accepts_clicks(&self) -> bool {
        self.engine.is_some() && self.click_listener.is_some()
    }

    pub fn fly_to(&mut self, center: LatLng, zoom: Option<f64>) -> Result<()> {
        if !center.is_valid() {
            return Err(MapError::InvalidCoordinates(center.to_string()));
        }
        self.engine_mut()?.fly_to(center, zoom)?;
        Ok(())
    }

    /// Detaches listeners, removes every tracked marker and tears the engine down.
    /// Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.detach_click_listener();
        self.latch.reset();

        let Some(mut engine) = self.engine.take() else {
            return;
        };

        for id in std::mem::take(&mut self.markers) {
            if let Err(e) = engine.remove_marker(id) {
                log::debug!("marker {:?} already gone during destroy: {}", id, e);
            }
        }
        engine.remove();
        log::info!("map surface destroyed");
    }
}

impl<E: MapEngine> Drop for MapSurface<E> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<E: MapEngine> std::fmt::Debug for MapSurface<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSurface")
            .field("destroyed", &self.is_destroyed())
            .field("latch", &self.latch)
            .field("markers", &self.markers.len())
            .field("click_listener", &self.click_listener)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::memory::{EngineOp, InMemoryEngine, InMemoryEngineFactory};
    use std::cell::Cell;
    use std::rc::Rc;

    fn view() -> SurfaceView {
        SurfaceView {
            style_url: "mapbox://styles/mapbox/dark-v11".to_string(),
            center: LatLng::new(40.7128, -74.0060),
            zoom: 11.0,
        }
    }

    fn surface(factory: &InMemoryEngineFactory) -> MapSurface<InMemoryEngine> {
        let container = Container::new("map", 600);
        MapSurface::create(factory, Some(&container), "pk.test", &view()).unwrap()
    }

    #[test]
    fn test_create_requires_credential_and_container() {
        let factory = InMemoryEngineFactory::new();
        let container = Container::new("map", 600);

        let err = MapSurface::create(&factory, Some(&container), "  ", &view()).unwrap_err();
        assert!(matches!(err, MapError::CredentialMissing));

        let err = MapSurface::create(&factory, None, "pk.test", &view()).unwrap_err();
        assert!(matches!(err, MapError::SurfaceInit(_)));
        assert_eq!(factory.created(), 0);
    }

    #[test]
    fn test_create_rejected_credential() {
        let factory = InMemoryEngineFactory::new().reject_credential("pk.bad");
        let container = Container::new("map", 600);

        let err = MapSurface::create(&factory, Some(&container), "pk.bad", &view()).unwrap_err();
        assert!(matches!(err, MapError::SurfaceInit(_)));
    }

    #[test]
    fn test_create_enforces_min_height() {
        let factory = InMemoryEngineFactory::new();
        let container = Container::new("map", 10);
        let surface = MapSurface::create(&factory, Some(&container), "pk.test", &view()).unwrap();
        let options = surface.engine().unwrap().options().clone();
        assert_eq!(options.container.height, MIN_SURFACE_HEIGHT);
    }

    #[test]
    fn test_on_ready_queued_then_fired_once() {
        let factory = InMemoryEngineFactory::new();
        let mut surface = surface(&factory);
        let fired = Rc::new(Cell::new(0));

        let counter = fired.clone();
        surface.on_ready(move |_| counter.set(counter.get() + 1));
        assert_eq!(fired.get(), 0);

        assert!(surface.mark_ready());
        assert!(!surface.mark_ready());
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_on_ready_fires_immediately_when_ready() {
        let factory = InMemoryEngineFactory::new().loaded_on_create();
        let mut surface = surface(&factory);
        assert!(surface.is_ready());

        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        surface.on_ready(move |s| {
            flag.set(true);
            s.add_control(ControlKind::Navigation, ControlPosition::TopRight)
                .unwrap();
        });
        assert!(fired.get());
        assert_eq!(surface.engine().unwrap().controls().len(), 1);
    }

    #[test]
    fn test_upsert_source_is_idempotent() {
        let factory = InMemoryEngineFactory::new();
        let mut surface = surface(&factory);

        let first = surface
            .upsert_source("incidents", &FeatureCollection::empty())
            .unwrap();
        let second = surface
            .upsert_source("incidents", &FeatureCollection::empty())
            .unwrap();

        assert_eq!(first, UpsertOutcome::Created);
        assert_eq!(second, UpsertOutcome::Updated);
        assert_eq!(surface.engine().unwrap().source_count(), 1);
    }

    #[test]
    fn test_upsert_layer_once() {
        let factory = InMemoryEngineFactory::new();
        let mut surface = surface(&factory);
        let spec = HeatmapLayerSpec::default();

        surface
            .upsert_source(&spec.source_id, &FeatureCollection::empty())
            .unwrap();
        assert_eq!(
            surface.upsert_heatmap_layer(&spec).unwrap(),
            UpsertOutcome::Created
        );
        assert_eq!(
            surface.upsert_heatmap_layer(&spec).unwrap(),
            UpsertOutcome::Unchanged
        );

        let adds = surface
            .engine()
            .unwrap()
            .ops()
            .iter()
            .filter(|op| matches!(op, EngineOp::AddHeatmapLayer(_)))
            .count();
        assert_eq!(adds, 1);
    }

    #[test]
    fn test_click_listener_not_duplicated() {
        let factory = InMemoryEngineFactory::new();
        let mut surface = surface(&factory);

        assert!(surface.attach_click_listener().unwrap());
        assert!(!surface.attach_click_listener().unwrap());
        assert_eq!(surface.engine().unwrap().listener_count(), 1);

        surface.detach_click_listener();
        assert!(!surface.accepts_clicks());
        assert_eq!(surface.engine().unwrap().listener_count(), 0);
    }

    #[test]
    fn test_destroy_releases_everything() {
        let factory = InMemoryEngineFactory::new();
        let mut surface = surface(&factory);
        surface.mark_ready();
        surface.attach_click_listener().unwrap();
        let spec = MarkerSpec::selection(LatLng::new(1.0, 1.0), &Default::default());
        surface.place_marker(&spec).unwrap();

        let stats = factory.stats();
        surface.destroy();
        surface.destroy();

        assert!(surface.is_destroyed());
        assert!(!surface.is_ready());
        assert_eq!(surface.marker_count(), 0);
        assert!(matches!(
            surface.place_marker(&spec),
            Err(MapError::SurfaceDestroyed)
        ));
        let stats = stats.borrow();
        assert_eq!(stats.live_markers, 0);
        assert_eq!(stats.live_listeners, 0);
        assert_eq!(stats.removed, 1);
    }

    #[test]
    fn test_destroy_on_drop() {
        let factory = InMemoryEngineFactory::new();
        {
            let _surface = surface(&factory);
        }
        assert_eq!(factory.stats().borrow().removed, 1);
    }

    #[test]
    fn test_fly_to_validates() {
        let factory = InMemoryEngineFactory::new();
        let mut surface = surface(&factory);
        assert!(surface.fly_to(LatLng::new(95.0, 0.0), None).is_err());
        assert!(surface.fly_to(LatLng::new(40.72, -74.01), Some(14.0)).is_ok());
    }

    #[test]
    fn test_upsert_conflict_is_success() {
        let factory = InMemoryEngineFactory::new().stale_existence_checks();
        let mut surface = surface(&factory);
        let spec = HeatmapLayerSpec::default();
        let data = FeatureCollection::empty();

        assert_eq!(
            surface.upsert_source(&spec.source_id, &data).unwrap(),
            UpsertOutcome::Created
        );
        assert_eq!(
            surface.upsert_source(&spec.source_id, &data).unwrap(),
            UpsertOutcome::Updated
        );
        assert_eq!(
            surface.upsert_heatmap_layer(&spec).unwrap(),
            UpsertOutcome::Created
        );
        assert_eq!(
            surface.upsert_heatmap_layer(&spec).unwrap(),
            UpsertOutcome::Unchanged
        );
        let engine = surface.engine().unwrap();
        assert_eq!(engine.source_count(), 1);
        assert_eq!(engine.layer_count(), 1);
    }

    #[test]
    fn test_failed_removal_stays_tracked() {
        let factory = InMemoryEngineFactory::new().fail_marker_removals(1);
        let mut surface = surface(&factory);
        let spec = MarkerSpec::selection(LatLng::new(1.0, 1.0), &Default::default());
        let id = surface.place_marker(&spec).unwrap();

        assert!(matches!(
            surface.remove_marker(id),
            Err(MapError::Engine(EngineError::Runtime(_)))
        ));
        assert!(surface.is_tracking(id));
        assert_eq!(surface.marker_count(), 1);

        surface.remove_marker(id).unwrap();
        assert!(!surface.is_tracking(id));
        assert_eq!(surface.engine().unwrap().marker_count(), 0);
    }
}
