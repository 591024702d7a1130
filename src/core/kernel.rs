//=========================================================================
// Kernel
//=========================================================================
//
// The single-threaded outer loop tying clock, input, states and drawing
// together.
//
// Flow per iteration:
//   1. Feed wall time to the FrameClock
//   2. While a tick is due:
//        sample input → layout/resize → close/F3 handling →
//        top.handle_input() → top.update() → end input frame →
//        drain stack requests
//   3. If a draw is due: clear, draw top (and below), overlay, present
//   4. Power-saving sleep when caught up
//
// The quit flag is checked once per iteration. A quitting loop finishes
// the iteration it is in, then tears the stack down.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use crate::core::clock::{FrameClock, TimeSource};
use crate::core::globals::GlobalContext;
use crate::core::input::KeyCode;
use crate::core::overlay::DebugOverlay;
use crate::core::platform_bridge::{Platform, RenderTarget};
use crate::core::state::{State, StateStack};

//=== KernelConfig ========================================================

/// Loop settings resolved by the engine builder.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelConfig {
    pub update_rate: f64,
    pub draw_rate: f64,
    pub power_saving: bool,
    pub sampling_window: Duration,
    pub key_repeat: bool,
    pub joystick_dead_zone: f32,
    pub debug_overlay: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            update_rate: 60.0,
            draw_rate: 60.0,
            power_saving: true,
            sampling_window: FrameClock::DEFAULT_SAMPLING_WINDOW,
            key_repeat: false,
            joystick_dead_zone: 10.0,
            debug_overlay: false,
        }
    }
}

//=== Kernel ==============================================================

/// Owns the loop's components and runs it one iteration at a time.
pub struct Kernel {
    clock: FrameClock,
    context: GlobalContext,
    stack: StateStack,
    overlay: DebugOverlay,
    torn_down: bool,
}

impl Kernel {
    /// Key that toggles the debug overlay.
    pub const OVERLAY_TOGGLE_KEY: KeyCode = KeyCode::F3;

    //--- Construction -----------------------------------------------------

    pub fn new(config: &KernelConfig, window_size: (u32, u32)) -> Self {
        let mut clock = FrameClock::new(config.update_rate, config.draw_rate);
        clock.set_power_saving(config.power_saving);
        clock.set_sampling_window(config.sampling_window);

        let mut context = GlobalContext::new(window_size);
        context.input_mut().set_key_repeat(config.key_repeat);
        context.input_mut().set_dead_zone(config.joystick_dead_zone);

        Self {
            clock,
            context,
            stack: StateStack::new(),
            overlay: DebugOverlay::new(config.debug_overlay),
            torn_down: false,
        }
    }

    /// Pushes the initial state and applies it immediately.
    pub fn start(&mut self, initial: Box<dyn State>) {
        let id = self.context.request_push_boxed(initial);
        self.stack.process_requests(&mut self.context);
        info!(target: "kernel", "Kernel started with initial state {:?}", id);
    }

    //--- Accessors --------------------------------------------------------

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Runtime access to rates and power saving.
    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    pub fn context(&self) -> &GlobalContext {
        &self.context
    }

    pub fn stack(&self) -> &StateStack {
        &self.stack
    }

    pub fn overlay(&self) -> &DebugOverlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut DebugOverlay {
        &mut self.overlay
    }

    /// Whether the loop should keep iterating.
    pub fn is_running(&self) -> bool {
        !self.torn_down && !self.context.quit_requested() && !self.stack.is_empty()
    }

    //--- Loop -------------------------------------------------------------

    /// Runs iterations until quit is requested, then tears down.
    pub fn run<P, T>(&mut self, platform: &mut P, target: &mut dyn RenderTarget, time: &T)
    where
        P: Platform + ?Sized,
        T: TimeSource + ?Sized,
    {
        while self.is_running() {
            self.iterate(platform, target, time);
        }
        self.shutdown();
    }

    /// Runs one outer-loop iteration: due ticks, an optional draw pass and
    /// the power-saving sleep. Returns whether the loop should continue.
    pub fn iterate<P, T>(&mut self, platform: &mut P, target: &mut dyn RenderTarget, time: &T) -> bool
    where
        P: Platform + ?Sized,
        T: TimeSource + ?Sized,
    {
        if !self.is_running() {
            return false;
        }

        self.clock.begin_frame(time.now());

        //--- Step 1: Catch up on ticks ------------------------------------
        while self.clock.tick_due() {
            let started = time.now();
            self.tick(platform);
            self.clock.end_tick(time.now().saturating_sub(started));

            if self.stack.top_settings().is_some_and(|s| s.can_skip_updates) {
                let skipped = self.clock.skip_pending_ticks();
                if skipped > 0 {
                    debug!(target: "kernel", "Skipped {} pending ticks", skipped);
                }
            }
        }

        //--- Step 2: Draw -------------------------------------------------
        if self.clock.draw_due() {
            let started = time.now();
            self.draw(target);
            self.clock.end_draw(time.now().saturating_sub(started));
        }

        //--- Step 3: Idle -------------------------------------------------
        if self.context.quit_requested() {
            return false;
        }
        if let Some(idle) = self.clock.idle_time() {
            trace!(target: "kernel", "Sleeping {:?}", idle);
            time.sleep(idle);
        }
        true
    }

    /// Tears the stack down LIFO. Idempotent.
    pub fn shutdown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.stack.teardown(&mut self.context);
        info!(
            target: "kernel",
            "Kernel stopped after {} ticks and {} draws",
            self.clock.total_ticks(),
            self.clock.total_draws()
        );
    }

    //--- Internal Helpers -------------------------------------------------

    fn tick<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        self.context.set_clock(self.clock.metrics(), self.clock.update_interval());
        self.context.input_mut().begin_frame(platform);

        if let Some((width, height)) = self.context.refresh_layout() {
            debug!(target: "kernel", "Window resized to {}x{}", width, height);
            self.stack.notify_resize(&self.context, width, height);
        }

        if self.context.input().close_requested() && self.stack.handle_close_request(&mut self.context) {
            self.context.request_quit();
        }

        if self.context.input().key_descending(Self::OVERLAY_TOGGLE_KEY) {
            self.overlay.toggle();
        }

        self.stack.handle_input(&mut self.context);
        self.stack.update(&mut self.context, self.clock.update_interval());

        self.context.input_mut().end_frame();
        self.stack.process_requests(&mut self.context);
    }

    fn draw(&mut self, target: &mut dyn RenderTarget) {
        let interpolation = self.clock.interpolation();

        self.stack.draw(target, &self.context, interpolation);

        self.overlay.refresh(&self.clock.metrics());
        self.overlay.draw(target);

        target.present();
    }
}

impl Drop for Kernel {
    fn drop(&mut self) {
        self.shutdown();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
