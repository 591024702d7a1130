//=========================================================================
// State Stack
//=========================================================================
//
// Owns the execution contexts and applies deferred requests.
//
// States never touch the stack directly. They queue requests on the
// GlobalContext, and the stack applies them at its drain point, after
// the tick's input and update calls have returned. This keeps the slot
// list stable while any state callback is running.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{StackRequest, StateId, StateSettings, StateSlot};
use crate::core::globals::GlobalContext;
use crate::core::platform_bridge::RenderTarget;

//=== StateStack ==========================================================

/// Ordered stack of states; the last slot is the top.
pub struct StateStack {
    slots: Vec<StateSlot>,
}

impl StateStack {
    /// Upper bound on drain rounds when lifecycle hooks keep queueing.
    const MAX_DRAIN_ROUNDS: usize = 16;

    //--- Construction -----------------------------------------------------

    /// Creates an empty stack. Push the first state through the context's
    /// request queue and drain.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    //--- Inspection -------------------------------------------------------

    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Ids bottom to top.
    pub fn ids(&self) -> Vec<StateId> {
        self.slots.iter().map(|slot| slot.id).collect()
    }

    pub fn top_id(&self) -> Option<StateId> {
        self.slots.last().map(|slot| slot.id)
    }

    pub fn top_settings(&self) -> Option<StateSettings> {
        self.slots.last().map(|slot| slot.state.settings())
    }

    //--- Dispatch ---------------------------------------------------------

    /// Forwards input handling to the top state.
    pub fn handle_input(&mut self, ctx: &mut GlobalContext) {
        if let Some(top) = self.slots.last_mut() {
            top.state.handle_input(ctx);
        }
    }

    /// Advances the top state by one fixed step.
    pub fn update(&mut self, ctx: &mut GlobalContext, dt: Duration) {
        if let Some(top) = self.slots.last_mut() {
            top.state.update(ctx, dt);
        }
    }

    /// Clears the target with the top state's background and draws the
    /// top state, preceded by the one beneath it when requested.
    pub fn draw(&mut self, target: &mut dyn RenderTarget, ctx: &GlobalContext, interpolation: f64) {
        let Some(top_index) = self.slots.len().checked_sub(1) else {
            return;
        };

        let top = &self.slots[top_index].state;
        target.clear(top.settings().background_color);

        if top.draws_state_below() && top_index > 0 {
            self.slots[top_index - 1].state.draw(target, ctx, interpolation);
        }
        self.slots[top_index].state.draw(target, ctx, interpolation);
    }

    /// Tells every state, bottom to top, about a new window size.
    pub fn notify_resize(&mut self, ctx: &GlobalContext, width: u32, height: u32) {
        for slot in &mut self.slots {
            slot.state.on_resize(ctx, width, height);
        }
    }

    /// Routes a platform close request.
    ///
    /// Returns `true` if the engine should quit: the stack is empty or the
    /// top state is closeable. Otherwise the top state is notified.
    pub fn handle_close_request(&mut self, ctx: &mut GlobalContext) -> bool {
        match self.slots.last_mut() {
            Some(top) if !top.state.settings().is_closeable => {
                debug!(
                    target: "kernel::stack",
                    "Close request forwarded to non-closeable {}",
                    top.state.name()
                );
                top.state.on_close_requested(ctx);
                false
            }
            _ => true,
        }
    }

    //--- Request Processing -----------------------------------------------

    /// Applies every queued request in FIFO order.
    ///
    /// Requests queued by pause/resume hooks during the drain are applied
    /// in the same call. Returns the number of requests applied.
    pub fn process_requests(&mut self, ctx: &mut GlobalContext) -> usize {
        let mut applied = 0;

        for _ in 0..Self::MAX_DRAIN_ROUNDS {
            let requests = ctx.requests_mut().take();
            if requests.is_empty() {
                return applied;
            }

            for request in requests {
                match request {
                    StackRequest::Push(slot) => self.push_internal(slot, ctx),
                    StackRequest::Pop(count) => self.pop_internal(count, ctx),
                    StackRequest::Swap(slot) => self.swap_internal(slot),
                }
                applied += 1;
            }
        }

        if !ctx.requests_mut().is_empty() {
            warn!(
                target: "kernel::stack",
                "Lifecycle hooks still queueing after {} rounds, deferring {} requests",
                Self::MAX_DRAIN_ROUNDS,
                ctx.requests_mut().len()
            );
        }
        applied
    }

    /// Closes the request queue and destroys every state, top first,
    /// without resume calls.
    pub fn teardown(&mut self, ctx: &mut GlobalContext) {
        ctx.requests_mut().close();

        info!(target: "kernel::stack", "Tearing down {} states", self.slots.len());
        while let Some(slot) = self.slots.pop() {
            debug!(target: "kernel::stack", "Destroying {} ({:?})", slot.state.name(), slot.id);
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn push_internal(&mut self, slot: StateSlot, ctx: &mut GlobalContext) {
        if let Some(top) = self.slots.last_mut() {
            top.state.pause(ctx);
        }

        debug!(target: "kernel::stack", "Pushing {} ({:?})", slot.state.name(), slot.id);
        self.slots.push(slot);
    }

    fn pop_internal(&mut self, count: usize, ctx: &mut GlobalContext) {
        let allowed = self.slots.len().saturating_sub(1);
        let popped = count.min(allowed);

        if popped < count {
            warn!(
                target: "kernel::stack",
                "Pop of {} clamped to {} (depth {})",
                count,
                popped,
                self.slots.len()
            );
        }

        for _ in 0..popped {
            if let Some(slot) = self.slots.pop() {
                debug!(target: "kernel::stack", "Popping {} ({:?})", slot.state.name(), slot.id);
            }
        }

        if popped > 0 {
            if let Some(top) = self.slots.last_mut() {
                top.state.resume(ctx);
            }
        }
    }

    fn swap_internal(&mut self, slot: StateSlot) {
        if let Some(old) = self.slots.pop() {
            debug!(
                target: "kernel::stack",
                "Swapping {} ({:?}) for {} ({:?})",
                old.state.name(),
                old.id,
                slot.state.name(),
                slot.id
            );
        }
        self.slots.push(slot);
    }
}

impl Default for StateStack {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
