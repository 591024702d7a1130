//=========================================================================
// Core Execution Kernel
//=========================================================================
//
// Platform-independent half of the engine: scheduling, input sampling,
// the state stack and the loop that drives them.
//
// Components:
// - `clock`: fixed-timestep accumulators, throughput metrics, time sources
// - `input`: double-buffered device snapshots and edge queries
// - `state`: the `State` trait, deferred requests and the stack
// - `globals`: context object handed to every state callback
// - `overlay`: throughput readout
// - `kernel`: the outer loop
// - `platform_bridge`: traits and events separating core from platform
//
// Notes:
// Everything here runs on one thread. Stack mutation happens only at the
// per-tick drain point inside `StateStack::process_requests`.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod clock;
pub mod globals;
pub mod input;
pub mod platform_bridge;
pub mod state;

mod kernel;
mod overlay;

//=== Public API ==========================================================

pub use kernel::{Kernel, KernelConfig};
pub use overlay::DebugOverlay;
