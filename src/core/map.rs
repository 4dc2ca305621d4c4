//! The incident map component.
//!
//! [`IncidentMap`] owns the credential store, at most one [`MapSurface`], the
//! [`LayerSynchronizer`] and the [`SelectionController`]. Hosts drive it with
//! lifecycle calls (`mount`, `submit_credential`, `set_incidents`,
//! `set_picking`) and forward engine events through [`IncidentMap::handle_event`].

use crate::{
    core::config::IncidentMapConfig,
    core::geo::LatLng,
    data::incident::Incident,
    input::{
        events::{EventHandled, SurfaceEvent},
        selection::SelectionController,
    },
    layers::{
        heatmap::HeatmapLayerSpec,
        sync::{LayerSynchronizer, SyncReport, SyncState},
    },
    storage::CredentialStore,
    surface::{
        adapter::MapSurface,
        engine::{Container, EngineFactory},
    },
    MapError, Result,
};
use std::sync::Arc;

/// What the host should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapView {
    /// Credential entry form, with the reason the last attempt failed if any
    CredentialEntry { error: Option<String> },
    /// The map; `ready` once the surface is interactive
    Map { ready: bool },
}

pub struct IncidentMap<F: EngineFactory, S: CredentialStore> {
    config: IncidentMapConfig,
    factory: F,
    store: S,
    credential: Option<String>,
    container: Option<Container>,
    surface: Option<MapSurface<F::Engine>>,
    sync: LayerSynchronizer,
    selection: SelectionController,
    incidents: Arc<[Incident]>,
    picking: bool,
    last_error: Option<String>,
}

impl<F: EngineFactory, S: CredentialStore> IncidentMap<F, S> {
    /// Builds the component and reads the stored credential once
    pub fn new(factory: F, store: S, config: IncidentMapConfig) -> Result<Self> {
        config.validate()?;

        let credential = match store.load(&config.credential_key) {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(e) => {
                log::warn!("could not read stored credential: {}", e);
                None
            }
        };

        let sync = LayerSynchronizer::new(
            HeatmapLayerSpec::new(config.heatmap.clone()),
            config.markers.clone(),
        )
        .with_grid(config.aggregation.grid());
        let selection = SelectionController::new(config.markers.clone());

        Ok(Self {
            config,
            factory,
            store,
            credential,
            container: None,
            surface: None,
            sync,
            selection,
            incidents: Arc::from(Vec::new()),
            picking: false,
            last_error: None,
        })
    }

    pub fn config(&self) -> &IncidentMapConfig {
        &self.config
    }

    pub fn view(&self) -> MapView {
        match (&self.surface, &self.credential) {
            (Some(surface), _) => MapView::Map {
                ready: surface.is_ready(),
            },
            (None, Some(_)) if self.last_error.is_none() => MapView::Map { ready: false },
            _ => MapView::CredentialEntry {
                error: self.last_error.clone(),
            },
        }
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn surface(&self) -> Option<&MapSurface<F::Engine>> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut MapSurface<F::Engine>> {
        self.surface.as_mut()
    }

    pub fn sync_state(&self) -> SyncState {
        self.sync.state()
    }

    pub fn incidents(&self) -> &Arc<[Incident]> {
        &self.incidents
    }

    pub fn is_picking(&self) -> bool {
        self.picking
    }

    pub fn selected_location(&self) -> Option<LatLng> {
        self.selection.selected()
    }

    /// The container became available
    pub fn mount(&mut self, container: Container) -> Result<()> {
        if self.container.as_ref() != Some(&container) {
            self.destroy_surface();
        }
        self.container = Some(container);
        self.ensure_surface()
    }

    /// The container went away; the surface goes with it
    pub fn unmount(&mut self) {
        self.destroy_surface();
        self.container = None;
    }

    /// Stores a user-entered credential and builds the surface with it.
    ///
    /// Blank input is rejected with [`MapError::CredentialMissing`]. A different
    /// credential replaces any existing surface.
    pub fn submit_credential(&mut self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(MapError::CredentialMissing);
        }

        if let Err(e) = self.store.save(&self.config.credential_key, token) {
            log::warn!("credential accepted but not persisted: {}", e);
        }

        if self.credential.as_deref() != Some(token) {
            self.destroy_surface();
        }
        self.credential = Some(token.to_string());
        self.last_error = None;
        self.ensure_surface()
    }

    /// Forgets the credential and tears the surface down
    pub fn clear_credential(&mut self) -> Result<()> {
        self.destroy_surface();
        self.credential = None;
        self.last_error = None;
        self.store.remove(&self.config.credential_key)
    }

    /// Replaces the incident list.
    ///
    /// Passing the same `Arc` again is a no-op. Returns the sync report when the
    /// surface was ready to apply the change.
    pub fn set_incidents(&mut self, incidents: impl Into<Arc<[Incident]>>) -> Option<SyncReport> {
        let incidents = incidents.into();
        if Arc::ptr_eq(&incidents, &self.incidents) {
            return None;
        }
        self.incidents = incidents;

        let surface = self.surface.as_mut()?;
        self.sync.on_incidents_changed(surface, &self.incidents)
    }

    /// Turns picking mode on or off
    pub fn set_picking(&mut self, enabled: bool) {
        if self.picking == enabled {
            return;
        }
        self.picking = enabled;
        self.update_picking();
    }

    /// Callback invoked with every picked coordinate
    pub fn set_on_select<C>(&mut self, callback: C)
    where
        C: FnMut(LatLng) + 'static,
    {
        self.selection.set_callback(Some(Box::new(callback)));
    }

    pub fn clear_on_select(&mut self) {
        self.selection.set_callback(None);
    }

    /// Registers a continuation on the live surface; runs now if it is already ready.
    ///
    /// Returns `false` when there is no surface to register on.
    pub fn on_ready<C>(&mut self, callback: C) -> bool
    where
        C: FnOnce(&mut MapSurface<F::Engine>) + 'static,
    {
        match self.surface.as_mut() {
            Some(surface) => {
                surface.on_ready(callback);
                true
            }
            None => false,
        }
    }

    /// Entry point for engine events
    pub fn handle_event(&mut self, event: SurfaceEvent) -> EventHandled {
        let Some(surface) = self.surface.as_mut() else {
            log::debug!("dropping '{}' event: no surface", event.name());
            return EventHandled::NotHandled;
        };

        match event {
            SurfaceEvent::Loaded => {
                if surface.mark_ready() {
                    self.surface_ready();
                }
                EventHandled::Handled
            }
            SurfaceEvent::Click { lat_lng } => {
                if !self.picking || !surface.accepts_clicks() {
                    return EventHandled::NotHandled;
                }
                if let Err(e) = self.selection.on_map_clicked(surface, lat_lng) {
                    log::warn!("ignoring click at {}: {}", lat_lng, e);
                }
                EventHandled::Handled
            }
            SurfaceEvent::Error { message } => {
                if surface.is_ready() {
                    log::warn!("map engine error: {}", message);
                } else {
                    log::warn!("map surface failed to load: {}", message);
                    self.destroy_surface();
                    self.credential = None;
                    self.last_error = Some(MapError::SurfaceInit(message).to_string());
                }
                EventHandled::Handled
            }
        }
    }

    fn ensure_surface(&mut self) -> Result<()> {
        if self.surface.is_some() {
            return Ok(());
        }
        let Some(credential) = self.credential.clone() else {
            return Ok(());
        };
        if self.container.is_none() {
            return Ok(());
        }

        let created = MapSurface::create(
            &self.factory,
            self.container.as_ref(),
            &credential,
            &self.config.surface.view(),
        );
        let mut surface = match created {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("map surface not created: {}", e);
                self.last_error = Some(e.to_string());
                self.credential = None;
                return Err(e);
            }
        };

        for control in &self.config.surface.controls {
            if let Err(e) = surface.add_control(control.kind, control.position) {
                log::warn!("skipping {:?} control: {}", control.kind, e);
            }
        }

        self.last_error = None;
        self.sync.surface_created();
        let ready = surface.is_ready();
        self.surface = Some(surface);
        if ready {
            self.surface_ready();
        }
        Ok(())
    }

    fn surface_ready(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        self.sync.on_surface_ready(surface, &self.incidents);
        self.update_picking();
    }

    fn update_picking(&mut self) {
        let surface = self.surface.as_mut();
        if !self.picking {
            if let Some(surface) = surface {
                surface.detach_click_listener();
                self.selection.deactivate(Some(surface));
            } else {
                self.selection.deactivate::<F::Engine>(None);
            }
            return;
        }

        let Some(surface) = surface else {
            return;
        };
        if !surface.is_ready() {
            return;
        }
        match surface.attach_click_listener() {
            Ok(_) => self.selection.activate(),
            Err(e) => log::warn!("picking unavailable: {}", e),
        }
    }

    fn destroy_surface(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
        }
        self.sync.surface_destroyed();
        self.selection.surface_destroyed();
    }
}

impl<F: EngineFactory, S: CredentialStore> std::fmt::Debug for IncidentMap<F, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncidentMap")
            .field("view", &self.view())
            .field("sync_state", &self.sync.state())
            .field("incidents", &self.incidents.len())
            .field("picking", &self.picking)
            .field("selection", &self.selection)
            .finish()
    }
}
