use crate::data::incident::Incident;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format used in incident popups, e.g. `Mar 1, 2024 6:30 PM`
pub const TIMESTAMP_FORMAT: &str = "%b %-d, %Y %-I:%M %p";

/// Content of the popup attached to an incident marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentPopup {
    pub title: String,
    pub description: String,
    pub timestamp: String,
    pub location_description: Option<String>,
}

impl IncidentPopup {
    pub fn for_incident(incident: &Incident) -> Self {
        Self {
            title: incident.category.label().to_string(),
            description: incident.description.clone(),
            timestamp: format_timestamp(&incident.timestamp),
            location_description: incident.location_description.clone(),
        }
    }

    /// Renders the popup body as HTML; all caller text is escaped
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(128);
        html.push_str("<div class=\"incident-popup\">");
        html.push_str(&format!("<h3>{}</h3>", escape_html(&self.title)));
        html.push_str(&format!("<p>{}</p>", escape_html(&self.description)));
        html.push_str(&format!(
            "<p class=\"timestamp\">{}</p>",
            escape_html(&self.timestamp)
        ));
        if let Some(location) = &self.location_description {
            html.push_str(&format!(
                "<p class=\"location\">{}</p>",
                escape_html(location)
            ));
        }
        html.push_str("</div>");
        html
    }

    /// Plain-text rendering for engines without HTML popups
    pub fn to_text(&self) -> String {
        let mut lines = vec![
            self.title.clone(),
            self.description.clone(),
            self.timestamp.clone(),
        ];
        if let Some(location) = &self.location_description {
            lines.push(location.clone());
        }
        lines.join("\n")
    }
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::data::incident::{Category, Severity};
    use chrono::TimeZone;

    fn incident() -> Incident {
        Incident::new(
            "1",
            LatLng::new(40.71, -74.0),
            Severity::Medium,
            Category::Vandalism,
            "Graffiti on <wall> & door",
            Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_popup_fields() {
        let popup = IncidentPopup::for_incident(&incident());
        assert_eq!(popup.title, "Vandalism");
        assert_eq!(popup.timestamp, "Mar 1, 2024 6:30 PM");
        assert!(popup.location_description.is_none());
    }

    #[test]
    fn test_html_is_escaped() {
        let html = IncidentPopup::for_incident(&incident()).to_html();
        assert!(html.contains("Graffiti on &lt;wall&gt; &amp; door"));
        assert!(!html.contains("<wall>"));
        assert!(!html.contains("class=\"location\""));
    }

    #[test]
    fn test_location_description_rendered() {
        let popup =
            IncidentPopup::for_incident(&incident().with_location_description("Corner of 5th & Main"));
        assert!(popup.to_html().contains("Corner of 5th &amp; Main"));
        assert!(popup.to_text().ends_with("Corner of 5th & Main"));
    }
}
