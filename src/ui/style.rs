//! Colors and marker styles for the incident map

use crate::core::constants::{INCIDENT_MARKER_SIZE, SELECTION_MARKER_SIZE};
use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha in 0.0..=1.0
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba(...)` notation, as understood by style-spec engines
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    /// Linear interpolation between two colors
    pub fn lerp(&self, other: &Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: (self.a as f64 + (other.a as f64 - self.a as f64) * t) as f32,
        }
    }
}

/// Visual style of a point marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    /// Fill color
    pub color: Rgba,
    /// Diameter in pixels
    pub size: f32,
    /// Border color
    pub border_color: Rgba,
    /// Border width in pixels
    pub border_width: f32,
    /// Whether the marker renders the pulsing halo
    pub pulse: bool,
}

impl MarkerStyle {
    /// Pulsing incident marker in the given color
    pub fn incident(color: Rgba) -> Self {
        Self {
            color,
            size: INCIDENT_MARKER_SIZE,
            border_color: Rgba::rgb(255, 255, 255),
            border_width: 2.0,
            pulse: true,
        }
    }

    /// Marker used for the picked location
    pub fn selection(color: Rgba) -> Self {
        Self {
            color,
            size: SELECTION_MARKER_SIZE,
            border_color: Rgba::rgb(255, 255, 255),
            border_width: 3.0,
            pulse: false,
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_pulse(mut self, pulse: bool) -> Self {
        self.pulse = pulse;
        self
    }
}

/// Default color of the selection marker
pub const SELECTION_COLOR: Rgba = Rgba::rgb(59, 130, 246);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_notation() {
        assert_eq!(Rgba::rgba(0, 0, 255, 0.0).to_css(), "rgba(0, 0, 255, 0)");
        assert_eq!(Rgba::rgb(255, 0, 0).to_css(), "rgba(255, 0, 0, 1)");
    }

    #[test]
    fn test_lerp_endpoints() {
        let blue = Rgba::rgba(0, 0, 255, 0.0);
        let red = Rgba::rgb(255, 0, 0);
        assert_eq!(blue.lerp(&red, 0.0), blue);
        assert_eq!(blue.lerp(&red, 1.0), red);
        assert_eq!(blue.lerp(&red, 0.5).r, 128);
    }

    #[test]
    fn test_marker_styles() {
        let incident = MarkerStyle::incident(Rgba::rgb(1, 2, 3));
        assert!(incident.pulse);

        let selection = MarkerStyle::selection(SELECTION_COLOR);
        assert!(!selection.pulse);
        assert!(selection.size > incident.size);
    }
}
