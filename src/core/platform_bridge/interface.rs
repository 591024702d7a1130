//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Contract between the kernel and its external collaborators.
//
// Defines:
// - `PlatformEvent`: discrete notifications reported once per frame
// - `Platform`: the device/window layer polled once per frame
// - `RenderTarget`: the abstract surface a draw pass renders into
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use crate::core::input::{DeviceSnapshot, JoystickId, KeyCode, MouseButton};

//=== PlatformEvent =======================================================

/// Discrete notification queued by the platform during one frame.
///
/// The sampler fills its per-frame queues strictly from these events.
/// Held state comes from [`Platform::read_device_state`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Key went down. `repeat` is set for OS auto-repeat.
    KeyPressed { key: KeyCode, repeat: bool },

    /// Key went up.
    KeyReleased { key: KeyCode },

    /// Printable character produced by the keyboard layout or IME.
    TextEntered(char),

    MouseButtonPressed(MouseButton),
    MouseButtonReleased(MouseButton),

    /// Scroll amount in lines (positive y scrolls up).
    MouseWheel { dx: f32, dy: f32 },

    /// Pointer moved to a window-space position.
    CursorMoved { x: f32, y: f32 },

    /// Touch began or moved; drives the shared pointer position.
    Touch { id: u64, x: f32, y: f32 },

    /// Touch ended or was cancelled.
    TouchEnded { id: u64 },

    JoystickButtonPressed { joystick: JoystickId, button: u32 },
    JoystickButtonReleased { joystick: JoystickId, button: u32 },
    JoystickConnected(JoystickId),
    JoystickDisconnected(JoystickId),

    /// Window client area changed size (pixels).
    Resized { width: u32, height: u32 },

    FocusGained,
    FocusLost,

    /// User or OS asked the window to close.
    CloseRequested,
}

//=== Platform ============================================================

/// Device and window layer polled by the kernel once per frame.
pub trait Platform {
    /// Appends every event queued since the previous call to `events`.
    fn poll_frame_events(&mut self, events: &mut Vec<PlatformEvent>);

    /// Writes the current held/continuous device state into `snapshot`.
    fn read_device_state(&mut self, snapshot: &mut DeviceSnapshot);

    /// Current client-area size in pixels.
    fn window_size(&self) -> (u32, u32);
}

//=== Color ===============================================================

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque colour from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

//=== RenderTarget ========================================================

/// Abstract surface receiving one draw pass per rendered frame.
///
/// The kernel only clears, presents, and places overlay text. Everything
/// else is drawn by states, which reach the concrete renderer through
/// [`as_any_mut`](Self::as_any_mut).
pub trait RenderTarget {
    /// Fills the whole target with `color`.
    fn clear(&mut self, color: Color);

    /// Draws a line of diagnostic text at a window-space position.
    fn draw_debug_text(&mut self, _text: &str, _position: (f32, f32)) {}

    /// Finishes the pass and shows it.
    fn present(&mut self);

    /// Downcasts to the concrete renderer.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=========================================================================
// Unit Tests
//=========================================================================
