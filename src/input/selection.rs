//! Selection Controller for picking mode.
//!
//! Keeps at most one selection marker alive: the previous marker is always
//! removed before a new one is placed. A marker the engine refused to remove
//! is retried on the next click.

use crate::{
    core::geo::LatLng,
    layers::marker::{MarkerConfig, MarkerSpec},
    surface::{
        adapter::MapSurface,
        engine::{MapEngine, MarkerId},
    },
    MapError, Result,
};

/// Caller notification for a picked location
pub type SelectionCallback = Box<dyn FnMut(LatLng)>;

pub struct SelectionController {
    active: bool,
    marker_config: MarkerConfig,
    selected: Option<LatLng>,
    marker: Option<MarkerId>,
    /// Old markers whose removal failed
    stale: Vec<MarkerId>,
    callback: Option<SelectionCallback>,
}

impl SelectionController {
    pub fn new(marker_config: MarkerConfig) -> Self {
        Self {
            active: false,
            marker_config,
            selected: None,
            marker: None,
            stale: Vec::new(),
            callback: None,
        }
    }

    pub fn set_callback(&mut self, callback: Option<SelectionCallback>) {
        self.callback = callback;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selected(&self) -> Option<LatLng> {
        self.selected
    }

    pub fn has_marker(&self) -> bool {
        self.marker.is_some()
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Leaves picking mode, removing the selection marker and clearing the selection
    pub fn deactivate<E: MapEngine>(&mut self, surface: Option<&mut MapSurface<E>>) {
        self.active = false;
        if let Some(surface) = surface {
            if let Some(id) = self.marker.take() {
                self.stale.push(id);
            }
            self.release_stale(surface);
        }
        self.selected = None;
    }

    fn release_stale<E: MapEngine>(&mut self, surface: &mut MapSurface<E>) {
        self.stale.retain(|&id| match surface.remove_marker(id) {
            Ok(()) => false,
            Err(e) => {
                log::warn!("failed to remove selection marker {:?}: {}", id, e);
                true
            }
        });
    }

    /// The surface is gone and took the marker with it
    pub fn surface_destroyed(&mut self) {
        self.active = false;
        self.marker = None;
        self.stale.clear();
        self.selected = None;
    }

    /// Handles a click while picking.
    ///
    /// Replaces the selection marker, stores the coordinate and notifies the
    /// callback. Failed removals and placements are logged; the selection
    /// still counts.
    pub fn on_map_clicked<E: MapEngine>(
        &mut self,
        surface: &mut MapSurface<E>,
        coordinate: LatLng,
    ) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        let coordinate = coordinate.wrapped();
        if !coordinate.is_valid() {
            return Err(MapError::InvalidCoordinates(coordinate.to_string()));
        }

        if let Some(id) = self.marker.take() {
            self.stale.push(id);
        }
        self.release_stale(surface);

        let spec = MarkerSpec::selection(coordinate, &self.marker_config);
        match surface.place_marker(&spec) {
            Ok(id) => self.marker = Some(id),
            Err(e) => log::warn!("failed to place selection marker at {}: {}", coordinate, e),
        }

        self.selected = Some(coordinate);
        if let Some(callback) = self.callback.as_mut() {
            callback(coordinate);
        }
        Ok(())
    }
}

impl std::fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionController")
            .field("active", &self.active)
            .field("selected", &self.selected)
            .field("marker", &self.marker)
            .field("stale", &self.stale)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{
        adapter::SurfaceView,
        engine::Container,
        memory::{InMemoryEngine, InMemoryEngineFactory},
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    fn surface(factory: &InMemoryEngineFactory) -> MapSurface<InMemoryEngine> {
        let view = SurfaceView {
            style_url: "style".to_string(),
            center: LatLng::default(),
            zoom: 3.0,
        };
        MapSurface::create(factory, Some(&Container::new("map", 500)), "pk.test", &view).unwrap()
    }

    fn recording_controller() -> (SelectionController, Rc<RefCell<Vec<LatLng>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        let mut controller = SelectionController::new(MarkerConfig::default());
        controller.set_callback(Some(Box::new(move |c| sink.borrow_mut().push(c))));
        (controller, calls)
    }

    #[test]
    fn test_inactive_ignores_clicks() {
        let factory = InMemoryEngineFactory::new();
        let mut surface = surface(&factory);
        let (mut controller, calls) = recording_controller();

        controller
            .on_map_clicked(&mut surface, LatLng::new(1.0, 1.0))
            .unwrap();
        assert!(calls.borrow().is_empty());
        assert_eq!(surface.marker_count(), 0);
    }

    #[test]
    fn test_single_marker_after_many_clicks() {
        let factory = InMemoryEngineFactory::new();
        let mut surface = surface(&factory);
        let (mut controller, calls) = recording_controller();
        controller.activate();

        let clicks: Vec<_> = (0..5)
            .map(|i| LatLng::new(40.0 + i as f64 * 0.01, -74.0))
            .collect();
        for click in &clicks {
            controller.on_map_clicked(&mut surface, *click).unwrap();
        }

        let engine = surface.engine().unwrap();
        let markers = engine.selection_markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].position, clicks[4]);
        assert_eq!(*calls.borrow(), clicks);
        assert_eq!(controller.selected(), Some(clicks[4]));
    }

    #[test]
    fn test_deactivate_removes_marker() {
        let factory = InMemoryEngineFactory::new();
        let mut surface = surface(&factory);
        let (mut controller, _) = recording_controller();
        controller.activate();
        controller
            .on_map_clicked(&mut surface, LatLng::new(1.0, 1.0))
            .unwrap();

        controller.deactivate(Some(&mut surface));
        assert!(!controller.is_active());
        assert!(controller.selected().is_none());
        assert!(!controller.has_marker());
        assert_eq!(surface.engine().unwrap().marker_count(), 0);
    }

    #[test]
    fn test_click_longitude_is_wrapped() {
        let factory = InMemoryEngineFactory::new();
        let mut surface = surface(&factory);
        let (mut controller, calls) = recording_controller();
        controller.activate();

        controller
            .on_map_clicked(&mut surface, LatLng::new(10.0, 190.0))
            .unwrap();
        assert_eq!(calls.borrow()[0], LatLng::new(10.0, -170.0));

        let err = controller
            .on_map_clicked(&mut surface, LatLng::new(100.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, MapError::InvalidCoordinates(_)));
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_failed_removal_does_not_drop_click() {
        let factory = InMemoryEngineFactory::new().fail_marker_removals(1);
        let mut surface = surface(&factory);
        let (mut controller, calls) = recording_controller();
        controller.activate();

        let clicks = [
            LatLng::new(1.0, 1.0),
            LatLng::new(2.0, 2.0),
            LatLng::new(3.0, 3.0),
        ];
        controller.on_map_clicked(&mut surface, clicks[0]).unwrap();
        // The first marker refuses to go; the click still counts
        controller.on_map_clicked(&mut surface, clicks[1]).unwrap();
        assert_eq!(controller.selected(), Some(clicks[1]));
        assert_eq!(calls.borrow().len(), 2);

        // The stuck marker is retried and released on the next click
        controller.on_map_clicked(&mut surface, clicks[2]).unwrap();
        let engine = surface.engine().unwrap();
        let markers = engine.selection_markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].position, clicks[2]);
        assert_eq!(surface.marker_count(), 1);
        assert_eq!(*calls.borrow(), clicks.to_vec());
    }

    #[test]
    fn test_deactivate_after_failed_removal() {
        let factory = InMemoryEngineFactory::new().fail_marker_removals(1);
        let mut surface = surface(&factory);
        let (mut controller, _) = recording_controller();
        controller.activate();
        controller
            .on_map_clicked(&mut surface, LatLng::new(1.0, 1.0))
            .unwrap();

        controller.deactivate(Some(&mut surface));
        assert_eq!(surface.marker_count(), 1);

        // Destroy still releases what the engine held on to
        let stats = factory.stats();
        surface.destroy();
        assert_eq!(stats.borrow().live_markers, 0);
    }
}
