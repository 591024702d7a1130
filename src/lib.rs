//=========================================================================
// Fixed Kernel — Library Root
//
// Real-time execution kernel for 2D games: a fixed-timestep scheduler, a
// stack of states with deferred push/pop/swap, and a double-buffered
// input sampler with edge detection.
//
// Responsibilities:
// - Expose the engine facade (`Engine`, `EngineBuilder`)
// - Expose the core types states are written against
// - Keep the Winit integration (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use fixed_kernel::prelude::*;
//
// EngineBuilder::new()
//     .build()
//     .run_windowed(MyState::default(), |window| MyRenderer::new(window))?;
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the platform-independent kernel: clock, input, state
// stack and loop. It is public for embedding and testing; most
// application code only needs the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` wraps Winit (and gilrs with the `gamepad` feature) behind
// the core's `Platform` trait and is not part of the public API.
//
// `engine` defines the builder and the entry points.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineError};

/// Winit, re-exported so render targets can name the window type.
pub use winit;
