pub mod popup;
pub mod style;

pub use popup::{format_timestamp, IncidentPopup};
pub use style::{MarkerStyle, Rgba, SELECTION_COLOR};
