//=========================================================================
// State System
//=========================================================================
//
// Stack of polymorphic execution contexts ("states") with deferred
// structural mutation.
//
// Architecture:
//   StateStack
//     └─ slots: Vec<StateSlot { id, Box<dyn State> }>   (bottom → top)
//   GlobalContext
//     └─ requests: RequestQueue   (drained by StateStack once per tick)
//
// Flow per tick:
//   top.handle_input() → top.update() → process_requests()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::globals::GlobalContext;
use crate::core::platform_bridge::{Color, RenderTarget};

//=== Module Declarations =================================================

mod request_queue;
mod state_stack;

//=== Public API ==========================================================

pub use request_queue::{RequestQueue, StackRequest, StateSlot};
pub use state_stack::StateStack;

//=== StateId =============================================================

/// Creation-order identifier, assigned when a state is handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub(crate) u64);

impl StateId {
    pub fn get(self) -> u64 {
        self.0
    }
}

//=== StateSettings =======================================================

/// Per-state behaviour flags read by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSettings {
    /// A platform close request quits the engine while this state is on
    /// top. When `false` the request goes to
    /// [`State::on_close_requested`] instead.
    pub is_closeable: bool,

    /// After a stall, run one tick and drop the rest of the backlog
    /// instead of catching up tick by tick.
    pub can_skip_updates: bool,

    /// Colour the target is cleared to before this state draws.
    pub background_color: Color,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            is_closeable: true,
            can_skip_updates: false,
            background_color: Color::BLACK,
        }
    }
}

//=== State Trait =========================================================

/// One screen or mode occupying a slot in the [`StateStack`].
///
/// Only `update()` and `draw()` are required; lifecycle hooks default to
/// doing nothing.
///
/// ```rust
/// # use std::time::Duration;
/// # use fixed_kernel::prelude::*;
/// struct Splash {
///     shown_for: Duration,
/// }
///
/// impl State for Splash {
///     fn update(&mut self, ctx: &mut GlobalContext, dt: Duration) {
///         self.shown_for += dt;
///         if self.shown_for >= Duration::from_secs(2) {
///             ctx.request_quit();
///         }
///     }
///
///     fn draw(&mut self, _target: &mut dyn RenderTarget, _ctx: &GlobalContext, _alpha: f64) {}
/// }
/// ```
pub trait State {
    /// Behaviour flags. Read every tick, so they may change over time.
    fn settings(&self) -> StateSettings {
        StateSettings::default()
    }

    /// Reacts to this tick's input. Only called on the top state.
    fn handle_input(&mut self, _ctx: &mut GlobalContext) {}

    /// Advances the simulation by one fixed step. Only called on the top
    /// state.
    fn update(&mut self, ctx: &mut GlobalContext, dt: Duration);

    /// Renders into `target`. `interpolation` is the fraction of the way
    /// into the next tick, in `[0, 1)`.
    fn draw(&mut self, target: &mut dyn RenderTarget, ctx: &GlobalContext, interpolation: f64);

    /// Called when a state is pushed directly above this one.
    fn pause(&mut self, _ctx: &mut GlobalContext) {}

    /// Called when this state becomes the top again after a pop.
    fn resume(&mut self, _ctx: &mut GlobalContext) {}

    /// Called on every state when the window changes size.
    fn on_resize(&mut self, _ctx: &GlobalContext, _width: u32, _height: u32) {}

    /// Called on a non-closeable top state when the platform asks to close.
    fn on_close_requested(&mut self, _ctx: &mut GlobalContext) {}

    /// Whether the state directly beneath should be drawn first.
    ///
    /// Pure compositing for overlays; does not change who gets updates.
    fn draws_state_below(&self) -> bool {
        false
    }

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
