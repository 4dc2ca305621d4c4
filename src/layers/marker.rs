use crate::{
    core::{
        constants::{INCIDENT_MARKER_SIZE, SELECTION_MARKER_SIZE},
        geo::LatLng,
    },
    data::incident::{Incident, IncidentId},
    ui::{
        popup::IncidentPopup,
        style::{MarkerStyle, Rgba, SELECTION_COLOR},
    },
};
use serde::{Deserialize, Serialize};

/// Marker appearance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub incident_size: f32,
    pub pulse: bool,
    pub selection_size: f32,
    pub selection_color: Rgba,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            incident_size: INCIDENT_MARKER_SIZE,
            pulse: true,
            selection_size: SELECTION_MARKER_SIZE,
            selection_color: SELECTION_COLOR,
        }
    }
}

/// What a marker stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    Incident(IncidentId),
    Selection,
}

/// A marker to be placed on the surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub kind: MarkerKind,
    pub position: LatLng,
    pub style: MarkerStyle,
    pub popup: Option<IncidentPopup>,
}

impl MarkerSpec {
    /// Pulsing marker colored by severity, with the incident popup
    pub fn incident(incident: &Incident, config: &MarkerConfig) -> Self {
        Self {
            kind: MarkerKind::Incident(incident.id.clone()),
            position: incident.position(),
            style: MarkerStyle::incident(incident.severity.color())
                .with_size(config.incident_size)
                .with_pulse(config.pulse),
            popup: Some(IncidentPopup::for_incident(incident)),
        }
    }

    /// Marker for a picked location; carries no popup
    pub fn selection(position: LatLng, config: &MarkerConfig) -> Self {
        Self {
            kind: MarkerKind::Selection,
            position,
            style: MarkerStyle::selection(config.selection_color).with_size(config.selection_size),
            popup: None,
        }
    }

    pub fn is_selection(&self) -> bool {
        self.kind == MarkerKind::Selection
    }
}
