//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use fixed_kernel::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine entry points
pub use crate::engine::{Engine, EngineBuilder, EngineError};

// Shared context
pub use crate::core::globals::GlobalContext;

// Input queries
pub use crate::core::input::{InputSampler, JoystickAxis, KeyCode, Modifier, MouseButton};

// State system
pub use crate::core::state::{State, StateId, StateSettings};

// Rendering and platform seams
pub use crate::core::platform_bridge::{Color, Platform, PlatformEvent, RenderTarget};

// Timing
pub use crate::core::clock::{ClockMetrics, ManualTime, TimeSource, WallClock};
