//=========================================================================
// Clock
//=========================================================================
//
// Fixed-timestep scheduling and the time sources it runs on.
//
// Components:
// - `frame_clock`: update/draw accumulators and throughput metrics
// - `time_source`: wall-clock and manually advanced time
//
//=========================================================================

//=== Module Declarations =================================================

mod frame_clock;
mod time_source;

//=== Public API ==========================================================

pub use frame_clock::{ClockMetrics, FrameClock};
pub use time_source::{ManualTime, TimeSource, WallClock};
