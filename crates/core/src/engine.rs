//! Board tick simulation. This file wires the focused phase submodules
//! together: conflict detection, combat resolution, movement-chain
//! extraction, and the tick orchestrator with its environmental effects.

mod chain;
mod combat;
mod conflict;
mod tick;


pub use tick::tick;
