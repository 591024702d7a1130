//=========================================================================
// Frame Clock
//=========================================================================
//
// Fixed-timestep scheduling with separate update and draw accumulators.
//
// Architecture:
// ```text
//   begin_frame(now) ──► update_lag += elapsed, draw_lag += elapsed
//        │
//        ├─ while tick_due():  tick … end_tick(spent)   (lag -= T_update)
//        ├─ if draw_due():     draw(interpolation()) … end_draw(spent)
//        └─ idle_time():       power-saving sleep hint
// ```
//
// Catch-up ticks per frame are unbounded: after a stall every missed
// tick runs. Draws never catch up; at most one per frame.
//
// Throughput (ups/fps) and strain are resampled once per sampling window.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, warn};

//=== ClockMetrics ========================================================

/// Throughput measured over the last completed sampling window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClockMetrics {
    /// Ticks per second.
    pub ups: f64,

    /// Draw passes per second.
    pub fps: f64,

    /// Time spent ticking and drawing as a percentage of wall time.
    pub strain: f64,

    /// Index of the window these values come from (0 before the first).
    pub window: u64,
}

//=== FrameClock ==========================================================

/// Decides when ticks and draw passes are due.
#[derive(Debug)]
pub struct FrameClock {
    //--- Targets ------------------------------------------------------------
    update_interval: Duration,
    draw_interval: Duration,
    power_saving: bool,

    //--- Accumulators -------------------------------------------------------
    update_lag: Duration,
    draw_lag: Duration,
    last_frame: Option<Duration>,

    //--- Sampling Window ----------------------------------------------------
    sampling_window: Duration,
    window_elapsed: Duration,
    window_ticks: u32,
    window_draws: u32,
    window_busy: Duration,
    metrics: ClockMetrics,

    //--- Totals -------------------------------------------------------------
    total_ticks: u64,
    total_draws: u64,
}

impl FrameClock {
    /// Default length of a throughput sampling window.
    pub const DEFAULT_SAMPLING_WINDOW: Duration = Duration::from_millis(250);

    /// Time left unslept before the next due event.
    pub const SLEEP_MARGIN: Duration = Duration::from_millis(2);

    /// Lowest accepted rate; smaller values are clamped up to it.
    pub const MIN_RATE: f64 = 1.0;

    /// Highest accepted rate (a 1 µs interval); larger values are clamped
    /// down to it.
    pub const MAX_RATE: f64 = 1_000_000.0;

    /// Creates a clock ticking at `update_hz` and drawing at `draw_hz`.
    pub fn new(update_hz: f64, draw_hz: f64) -> Self {
        Self {
            update_interval: interval_for(update_hz),
            draw_interval: interval_for(draw_hz),
            power_saving: true,
            update_lag: Duration::ZERO,
            draw_lag: Duration::ZERO,
            last_frame: None,
            sampling_window: Self::DEFAULT_SAMPLING_WINDOW,
            window_elapsed: Duration::ZERO,
            window_ticks: 0,
            window_draws: 0,
            window_busy: Duration::ZERO,
            metrics: ClockMetrics::default(),
            total_ticks: 0,
            total_draws: 0,
        }
    }

    //--- Configuration ----------------------------------------------------

    pub fn set_update_rate(&mut self, hz: f64) {
        self.update_interval = interval_for(hz);
        debug!(target: "kernel", "Update rate set to {:.2} Hz", self.update_rate());
    }

    pub fn set_draw_rate(&mut self, hz: f64) {
        self.draw_interval = interval_for(hz);
        debug!(target: "kernel", "Draw rate set to {:.2} Hz", self.draw_rate());
    }

    /// Target ticks per second.
    pub fn update_rate(&self) -> f64 {
        1.0 / self.update_interval.as_secs_f64()
    }

    /// Target draws per second.
    pub fn draw_rate(&self) -> f64 {
        1.0 / self.draw_interval.as_secs_f64()
    }

    /// Fixed simulation step.
    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    pub fn draw_interval(&self) -> Duration {
        self.draw_interval
    }

    pub fn set_power_saving(&mut self, enabled: bool) {
        self.power_saving = enabled;
    }

    pub fn power_saving(&self) -> bool {
        self.power_saving
    }

    /// Sets the resampling window; zero is replaced by the default.
    pub fn set_sampling_window(&mut self, window: Duration) {
        self.sampling_window = if window.is_zero() {
            warn!(target: "kernel", "Zero sampling window ignored, using default");
            Self::DEFAULT_SAMPLING_WINDOW
        } else {
            window
        };
    }

    pub fn sampling_window(&self) -> Duration {
        self.sampling_window
    }

    //--- Frame Processing -------------------------------------------------

    /// Feeds the wall time of a new outer-loop iteration.
    ///
    /// Returns the elapsed time since the previous call (zero on the first).
    pub fn begin_frame(&mut self, now: Duration) -> Duration {
        let elapsed = match self.last_frame {
            Some(last) => now.saturating_sub(last),
            None => Duration::ZERO,
        };
        self.last_frame = Some(now);

        self.update_lag += elapsed;
        self.draw_lag += elapsed;
        self.window_elapsed += elapsed;

        if self.window_elapsed >= self.sampling_window {
            self.resample();
        }

        elapsed
    }

    /// Whether another tick must run this iteration.
    pub fn tick_due(&self) -> bool {
        self.update_lag >= self.update_interval
    }

    /// Consumes one tick's worth of lag and records its duration.
    pub fn end_tick(&mut self, spent: Duration) {
        self.update_lag = self.update_lag.saturating_sub(self.update_interval);
        self.window_ticks += 1;
        self.window_busy += spent;
        self.total_ticks += 1;
    }

    /// Drops every whole tick still owed, keeping the fractional remainder.
    ///
    /// Returns how many ticks were dropped.
    pub fn skip_pending_ticks(&mut self) -> u32 {
        let interval = self.update_interval.as_nanos();
        let owed = self.update_lag.as_nanos() / interval;
        if owed == 0 {
            return 0;
        }

        let remainder = self.update_lag.as_nanos() % interval;
        self.update_lag = Duration::from_nanos(remainder as u64);
        u32::try_from(owed).unwrap_or(u32::MAX)
    }

    /// Whether a draw pass is due this iteration.
    pub fn draw_due(&self) -> bool {
        self.draw_lag >= self.draw_interval
    }

    /// Fraction of the way into the next tick, in `[0, 1)` once all due
    /// ticks have run.
    pub fn interpolation(&self) -> f64 {
        self.update_lag.as_secs_f64() / self.update_interval.as_secs_f64()
    }

    /// Consumes one draw interval and records the pass duration.
    ///
    /// Draws missed during a stall are dropped, not replayed.
    pub fn end_draw(&mut self, spent: Duration) {
        self.draw_lag = self.draw_lag.saturating_sub(self.draw_interval);
        if self.draw_lag >= self.draw_interval {
            let remainder = self.draw_lag.as_nanos() % self.draw_interval.as_nanos();
            self.draw_lag = Duration::from_nanos(remainder as u64);
        }
        self.window_draws += 1;
        self.window_busy += spent;
        self.total_draws += 1;
    }

    /// Sleep the loop may take before the next due event, if power saving
    /// is on and the slack exceeds [`SLEEP_MARGIN`](Self::SLEEP_MARGIN).
    pub fn idle_time(&self) -> Option<Duration> {
        if !self.power_saving {
            return None;
        }

        let update_slack = self.update_interval.saturating_sub(self.update_lag);
        let draw_slack = self.draw_interval.saturating_sub(self.draw_lag);
        let slack = update_slack.min(draw_slack);

        (slack > Self::SLEEP_MARGIN).then(|| slack - Self::SLEEP_MARGIN)
    }

    //--- Metrics ----------------------------------------------------------

    pub fn metrics(&self) -> ClockMetrics {
        self.metrics
    }

    /// Measured ticks per second over the last window.
    pub fn ups(&self) -> f64 {
        self.metrics.ups
    }

    /// Measured draws per second over the last window.
    pub fn fps(&self) -> f64 {
        self.metrics.fps
    }

    /// Busy time as a percentage of wall time over the last window.
    pub fn strain(&self) -> f64 {
        self.metrics.strain
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn total_draws(&self) -> u64 {
        self.total_draws
    }

    //--- Internal Helpers -------------------------------------------------

    fn resample(&mut self) {
        let seconds = self.window_elapsed.as_secs_f64();

        self.metrics = ClockMetrics {
            ups: f64::from(self.window_ticks) / seconds,
            fps: f64::from(self.window_draws) / seconds,
            strain: self.window_busy.as_secs_f64() / seconds * 100.0,
            window: self.metrics.window + 1,
        };

        self.window_elapsed = Duration::ZERO;
        self.window_ticks = 0;
        self.window_draws = 0;
        self.window_busy = Duration::ZERO;
    }
}

//--- Helpers --------------------------------------------------------------

fn interval_for(hz: f64) -> Duration {
    let hz = if hz.is_nan() || hz < FrameClock::MIN_RATE {
        warn!(target: "kernel", "Rate {} Hz out of range, clamped to {} Hz", hz, FrameClock::MIN_RATE);
        FrameClock::MIN_RATE
    } else if hz > FrameClock::MAX_RATE {
        warn!(target: "kernel", "Rate {} Hz out of range, clamped to {} Hz", hz, FrameClock::MAX_RATE);
        FrameClock::MAX_RATE
    } else {
        hz
    };
    Duration::from_nanos((1e9 / hz).round() as u64)
}

//=========================================================================
// Unit Tests
//=========================================================================
