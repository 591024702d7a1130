//=========================================================================
// Global Context
//=========================================================================
//
// Shared data container handed to every state callback.
//
// Contains data that states read and write:
// - input: this tick's sampled input
// - layout: window size and pointer position, refreshed on change only
// - requests: deferred stack mutations, drained once per tick
// - clock metrics and the quit flag
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::clock::ClockMetrics;
use crate::core::input::InputSampler;
use crate::core::state::{RequestQueue, State, StateId};

//=== GlobalContext =======================================================

/// Shared context passed to states during their lifecycle methods.
///
/// States receive `&GlobalContext` (or `&mut` where they may issue
/// requests). Stack changes made through it are deferred until the tick's
/// drain point.
pub struct GlobalContext {
    input: InputSampler,
    window_size: (u32, u32),
    pointer: (f32, f32),
    requests: RequestQueue,
    metrics: ClockMetrics,
    tick_interval: Duration,
    quit: bool,
}

impl GlobalContext {
    /// Creates a context for a window of the given size.
    pub fn new(window_size: (u32, u32)) -> Self {
        Self {
            input: InputSampler::new(),
            window_size,
            pointer: (0.0, 0.0),
            requests: RequestQueue::new(),
            metrics: ClockMetrics::default(),
            tick_interval: Duration::ZERO,
            quit: false,
        }
    }

    //--- Read Access ------------------------------------------------------

    /// Input sampled for the current tick.
    pub fn input(&self) -> &InputSampler {
        &self.input
    }

    /// Window size in physical pixels.
    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Pointer position in window space.
    pub fn pointer_position(&self) -> (f32, f32) {
        self.pointer
    }

    /// Throughput figures from the last completed sampling window.
    pub fn clock_metrics(&self) -> ClockMetrics {
        self.metrics
    }

    /// Length of one fixed update step.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    //--- Stack Requests ---------------------------------------------------

    /// Queues `state` to be pushed on top of the stack.
    pub fn request_push<S: State + 'static>(&mut self, state: S) -> StateId {
        self.requests.push(Box::new(state))
    }

    /// Queues an already boxed state to be pushed.
    pub fn request_push_boxed(&mut self, state: Box<dyn State>) -> StateId {
        self.requests.push(state)
    }

    /// Queues removal of `count` states from the top. The bottom state is
    /// never removed.
    pub fn request_pop(&mut self, count: usize) {
        self.requests.pop(count);
    }

    /// Queues replacement of the top state with `state`.
    pub fn request_swap<S: State + 'static>(&mut self, state: S) -> StateId {
        self.requests.swap(Box::new(state))
    }

    pub fn request_swap_boxed(&mut self, state: Box<dyn State>) -> StateId {
        self.requests.swap(state)
    }

    /// Asks the engine to stop after the current iteration.
    pub fn request_quit(&mut self) {
        if !self.quit {
            info!(target: "kernel", "Quit requested");
        }
        self.quit = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    //--- Kernel Access ----------------------------------------------------

    pub(crate) fn input_mut(&mut self) -> &mut InputSampler {
        &mut self.input
    }

    pub(crate) fn requests_mut(&mut self) -> &mut RequestQueue {
        &mut self.requests
    }

    pub(crate) fn set_clock(&mut self, metrics: ClockMetrics, tick_interval: Duration) {
        self.metrics = metrics;
        self.tick_interval = tick_interval;
    }

    /// Copies layout values from the sampler when this frame reported a
    /// resize or pointer motion. Returns the new size on resize.
    pub(crate) fn refresh_layout(&mut self) -> Option<(u32, u32)> {
        if self.input.pointer_moved() {
            self.pointer = self.input.pointer_position();
        }

        let resized = self.input.resized();
        if let Some(size) = resized {
            self.window_size = size;
        }
        resized
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
