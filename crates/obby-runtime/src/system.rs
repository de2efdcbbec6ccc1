//! Runtime system trait

use obby_core::Result;

/// A system that can be ticked by the game loop
///
/// Fixed update runs at a constant rate, while update runs once per frame
/// with the host's frame delta.
pub trait RuntimeSystem {
    /// Called once before the first tick
    fn initialize(&mut self) -> Result<()>;

    /// Called at a fixed rate (e.g. 60Hz) for deterministic simulation
    fn fixed_update(&mut self, dt: f64) -> Result<()>;

    /// Called once per frame for variable-rate logic
    fn update(&mut self, dt: f64) -> Result<()>;

    /// Called when the system is being torn down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
