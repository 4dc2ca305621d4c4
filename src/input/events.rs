use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Discrete events the engine delivers to the incident map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceEvent {
    /// The style finished loading; the surface is interactive
    Loaded,
    /// Click on the map at a geographic position
    Click { lat_lng: LatLng },
    /// Asynchronous engine error (tile/style failures, revoked token)
    Error { message: String },
}

impl SurfaceEvent {
    pub fn click(lat: f64, lng: f64) -> Self {
        SurfaceEvent::Click {
            lat_lng: LatLng::new(lat, lng),
        }
    }

    /// Event name as the engine reports it
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceEvent::Loaded => "load",
            SurfaceEvent::Click { .. } => "click",
            SurfaceEvent::Error { .. } => "error",
        }
    }
}

/// Whether an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json() {
        let event: SurfaceEvent =
            serde_json::from_str(r#"{"type":"click","lat_lng":{"lat":40.72,"lng":-74.01}}"#)
                .unwrap();
        assert_eq!(event, SurfaceEvent::click(40.72, -74.01));
        assert_eq!(event.name(), "click");

        let loaded: SurfaceEvent = serde_json::from_str(r#"{"type":"loaded"}"#).unwrap();
        assert_eq!(loaded, SurfaceEvent::Loaded);
    }
}
