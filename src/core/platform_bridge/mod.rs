//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges platform layers (winit, headless, ...) with the kernel.
//
// This module defines the contract between platform implementations and
// the kernel, so backends can be swapped without changing core code.
//
// Components:
// - `interface`: events, the `Platform` and `RenderTarget` traits
// - `event_collector`: bounded channel draining
// - `snapshot_tracker`: held state rebuilt from events
// - `headless`: channel-fed platform without a window
//
//=========================================================================

//=== Module Declarations =================================================

mod event_collector;
mod headless;
mod interface;
mod snapshot_tracker;

//=== Public API ==========================================================

pub use event_collector::{EventCollector, TickControl};
pub use headless::HeadlessPlatform;
pub use interface::{Color, Platform, PlatformEvent, RenderTarget};
pub use snapshot_tracker::SnapshotTracker;
