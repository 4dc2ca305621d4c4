//! Incident records and the fixed lookup tables used to display them.

use crate::{core::geo::LatLng, ui::style::Rgba};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller-assigned incident identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncidentId(pub String);

impl IncidentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IncidentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reported severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Heatmap weight; monotonic in severity
    pub fn weight(self) -> f64 {
        match self {
            Severity::Low => 0.25,
            Severity::Medium => 0.5,
            Severity::High => 0.75,
            Severity::Critical => 1.0,
        }
    }

    /// Marker fill color
    pub fn color(self) -> Rgba {
        match self {
            Severity::Low => Rgba::rgb(0x22, 0xc5, 0x5e),
            Severity::Medium => Rgba::rgb(0xea, 0xb3, 0x08),
            Severity::High => Rgba::rgb(0xf9, 0x73, 0x16),
            Severity::Critical => Rgba::rgb(0xef, 0x44, 0x44),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

/// Kind of incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Theft,
    Assault,
    Vandalism,
    Harassment,
    SuspiciousActivity,
    Traffic,
    Other,
}

impl Category {
    /// Human readable label shown in popups
    pub fn label(self) -> &'static str {
        match self {
            Category::Theft => "Theft",
            Category::Assault => "Assault",
            Category::Vandalism => "Vandalism",
            Category::Harassment => "Harassment",
            Category::SuspiciousActivity => "Suspicious Activity",
            Category::Traffic => "Traffic Incident",
            Category::Other => "Other",
        }
    }
}

/// A single incident report. Owned by the caller; the map only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    pub latitude: f64,
    pub longitude: f64,
    pub severity: Severity,
    pub category: Category,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_description: Option<String>,
}

impl Incident {
    pub fn new(
        id: impl Into<String>,
        position: LatLng,
        severity: Severity,
        category: Category,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: IncidentId::new(id),
            latitude: position.lat,
            longitude: position.lng,
            severity,
            category,
            description: description.into(),
            timestamp,
            location_description: None,
        }
    }

    pub fn with_location_description(mut self, text: impl Into<String>) -> Self {
        self.location_description = Some(text.into());
        self
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}
