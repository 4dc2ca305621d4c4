pub mod events;
pub mod selection;

// Re-export the essential types
pub use events::{EventHandled, SurfaceEvent};
pub use selection::{SelectionCallback, SelectionController};
