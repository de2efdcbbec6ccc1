//! Obby Runtime - Game loop infrastructure
//!
//! Provides the building blocks every simulation tick relies on:
//! - `GameClock` — frame delta, global elapsed clock and fixed-timestep accumulator
//! - `TimeSource` — wall-clock milliseconds for run timing
//! - `InputState` — key event tracking that samples a `MovementIntent` snapshot
//! - `KeyValueStore` — durable string store used for best-time persistence
//! - `CourseEvent` / `EventBus` — typed event queue drained by the host
//! - `RuntimeSystem` — trait for systems ticked by the game loop

mod clock;
mod event;
mod event_bus;
mod input;
mod persist;
mod system;

pub use clock::{GameClock, ManualTimeSource, SystemTimeSource, TimeSource, MAX_FRAME_DELTA};
pub use event::CourseEvent;
pub use event_bus::EventBus;
pub use input::{
    key_from_name, InputState, MovementIntent, ACTION_BACKWARD, ACTION_FORWARD, ACTION_LEFT,
    ACTION_RIGHT, ACTION_RUN,
};
pub use persist::{FailingStore, KeyValueStore, MemoryStore, TomlFileStore};
pub use system::RuntimeSystem;
