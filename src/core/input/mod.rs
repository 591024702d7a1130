//=========================================================================
// Input System
//=========================================================================
//
// Polled, double-buffered input sampling.
//
// Architecture:
//   Platform ─► InputSampler { current, previous: DeviceSnapshot }
//                  └─ frame queues (pressed, released, text, wheel, ...)
//
// Components:
// - `event`: portable names for keys, buttons, axes and modifiers
// - `snapshot`: point-in-time held state of every device
// - `sampler`: per-frame sampling and the query API states use
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod sampler;
mod snapshot;

//=== Public API ==========================================================

pub use event::{
    JoystickAxis, JoystickId, KeyCode, Modifier, MouseButton, AXIS_RANGE, MAX_JOYSTICKS,
};
pub use sampler::InputSampler;
pub use snapshot::{DeviceSnapshot, JoystickSnapshot};
