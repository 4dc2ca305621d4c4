//! Rendering surface abstraction.
//!
//! [`engine`] defines the raw primitives a map engine exposes, [`adapter`]
//! layers idempotency and lifecycle tracking on top, and [`memory`] is a
//! headless engine for hosts without a renderer.

pub mod adapter;
pub mod engine;
pub mod latch;
pub mod memory;

pub use adapter::{MapSurface, SurfaceView, UpsertOutcome};
pub use engine::{
    Container, ControlKind, ControlPosition, EngineError, EngineFactory, ListenerId, MapEngine,
    MarkerId, SurfaceOptions,
};
pub use latch::{LatchState, ReadyLatch};
pub use memory::{EngineOp, EngineStats, InMemoryEngine, InMemoryEngineFactory};
