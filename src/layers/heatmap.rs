use crate::{
    core::constants::{
        HEATMAP_LAYER_ID, HEATMAP_MAX_ZOOM, HEATMAP_OPACITY, HEATMAP_RADIUS, HEATMAP_SOURCE_ID,
        INTENSITY_PROPERTY, MAX_ZOOM, MIN_ZOOM,
    },
    ui::style::Rgba,
    Result,
};
use serde::{Deserialize, Serialize};

/// Configuration for the density layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Radius of influence for each data point (in pixels)
    pub radius: f64,
    /// Overall opacity of the heatmap
    pub opacity: f64,
    /// Zoom level past which the layer is hidden
    pub max_zoom: f64,
    /// Gradient stops from density 0 to density 1
    pub gradient: Vec<(f64, Rgba)>,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            radius: HEATMAP_RADIUS,
            opacity: HEATMAP_OPACITY,
            max_zoom: HEATMAP_MAX_ZOOM,
            gradient: vec![
                (0.0, Rgba::rgba(0, 0, 255, 0.0)),   // Transparent blue
                (0.2, Rgba::rgba(0, 0, 255, 0.5)),   // Blue
                (0.4, Rgba::rgba(0, 255, 255, 0.5)), // Cyan
                (0.6, Rgba::rgba(0, 255, 0, 0.5)),   // Green
                (0.8, Rgba::rgba(255, 255, 0, 0.5)), // Yellow
                (1.0, Rgba::rgb(255, 0, 0)),         // Red
            ],
        }
    }
}

impl HeatmapConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(crate::Error::Config(format!(
                "heatmap radius must be positive, got {}",
                self.radius
            )));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(crate::Error::Config(format!(
                "heatmap opacity must be within 0..=1, got {}",
                self.opacity
            )));
        }
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.max_zoom) {
            return Err(crate::Error::Config(format!(
                "heatmap max zoom must be within {}..={}, got {}",
                MIN_ZOOM, MAX_ZOOM, self.max_zoom
            )));
        }
        if self.gradient.len() < 2 {
            return Err(crate::Error::Config(
                "heatmap gradient needs at least two stops".to_string(),
            ));
        }
        if self.gradient.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(crate::Error::Config(
                "heatmap gradient stops must be strictly increasing".to_string(),
            ));
        }
        Ok(())
    }

    /// Map density to color using the gradient
    pub fn color_at(&self, density: f64) -> Rgba {
        let (first, last) = match (self.gradient.first(), self.gradient.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Rgba::rgba(0, 0, 0, 0.0),
        };
        if density <= first.0 {
            return first.1;
        }
        if density >= last.0 {
            return last.1;
        }

        for pair in self.gradient.windows(2) {
            let (t1, color1) = pair[0];
            let (t2, color2) = pair[1];
            if density >= t1 && density <= t2 {
                return color1.lerp(&color2, (density - t1) / (t2 - t1));
            }
        }

        last.1
    }
}

/// Full description of the heatmap layer handed to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapLayerSpec {
    pub id: String,
    pub source_id: String,
    /// Feature property holding the per-point weight
    pub weight_property: String,
    pub paint: HeatmapConfig,
}

impl HeatmapLayerSpec {
    pub fn new(paint: HeatmapConfig) -> Self {
        Self {
            id: HEATMAP_LAYER_ID.to_string(),
            source_id: HEATMAP_SOURCE_ID.to_string(),
            weight_property: INTENSITY_PROPERTY.to_string(),
            paint,
        }
    }

    /// Style-spec layer JSON (`type: heatmap`) for engines that take raw style objects
    pub fn to_style_json(&self) -> serde_json::Value {
        let mut color_expr = vec![
            serde_json::json!("interpolate"),
            serde_json::json!(["linear"]),
            serde_json::json!(["heatmap-density"]),
        ];
        for (stop, color) in &self.paint.gradient {
            color_expr.push(serde_json::json!(stop));
            color_expr.push(serde_json::json!(color.to_css()));
        }

        serde_json::json!({
            "id": self.id,
            "type": "heatmap",
            "source": self.source_id,
            "maxzoom": self.paint.max_zoom,
            "paint": {
                "heatmap-weight": ["get", self.weight_property],
                "heatmap-color": color_expr,
                "heatmap-radius": self.paint.radius,
                "heatmap-opacity": self.paint.opacity,
            }
        })
    }
}

impl Default for HeatmapLayerSpec {
    fn default() -> Self {
        Self::new(HeatmapConfig::default())
    }
}
