//=========================================================================
// Input Vocabulary
//
// Defines the engine's portable names for physical controls.
//
// This module abstracts away platform-specific identifiers (e.g. Winit,
// gilrs) into stable, engine-friendly enums used by the snapshot, the
// platform bridge and the sampler.
//
// Responsibilities:
// - Name keyboard keys by physical location, mouse buttons and joystick
//   axes in a portable way
// - Group left/right modifier keys so queries can OR both sides
// - Fix the joystick slot count and axis range shared by all platforms
//
//=========================================================================

//=== Joystick Constants ==================================================

/// Number of joystick slots tracked by every snapshot.
///
/// Indices at or above this value are treated as absent devices.
pub const MAX_JOYSTICKS: usize = 8;

/// Magnitude of a fully deflected joystick axis.
///
/// Axis values are reported in `[-AXIS_RANGE, AXIS_RANGE]`.
pub const AXIS_RANGE: f32 = 100.0;

/// Joystick slot index.
pub type JoystickId = usize;

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// Platform mapping typically:
/// - Winit: `MouseButton::Left` → `winit::event::MouseButton::Left`
///
/// The `Other` variant keeps the platform's raw index for side buttons,
/// macro buttons, and any non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Thumb button, "back" direction.
    Back,

    /// Thumb button, "forward" direction.
    Forward,

    /// Any other button, by raw platform index.
    Other(u16),
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// Characters arrive separately through the sampler's entered-text queue.
///
/// Modifier keys keep their side (`ShiftLeft` vs `ShiftRight`); use
/// [`Modifier`] to query either side at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Function Keys ----------------------------------------------------

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Navigation -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,

    //--- Editing ----------------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Minus,
    Equal,
    Comma,
    Period,
    Slash,
    Backquote,

    //--- Modifiers --------------------------------------------------------

    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,

    /// Windows / Command / Super key, left side.
    SuperLeft,

    /// Windows / Command / Super key, right side.
    SuperRight,

    /// Fallback for keys not explicitly mapped by the input layer.
    Unidentified,
}

//=== Modifier ============================================================

/// Modifier group whose queries OR the left and right physical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Shift,
    Control,
    Alt,

    /// Windows / Command / Super.
    System,
}

impl Modifier {
    /// Returns the `[left, right]` physical keys of this modifier.
    pub const fn keys(self) -> [KeyCode; 2] {
        match self {
            Self::Shift => [KeyCode::ShiftLeft, KeyCode::ShiftRight],
            Self::Control => [KeyCode::ControlLeft, KeyCode::ControlRight],
            Self::Alt => [KeyCode::AltLeft, KeyCode::AltRight],
            Self::System => [KeyCode::SuperLeft, KeyCode::SuperRight],
        }
    }
}

//=== JoystickAxis ========================================================

/// Analog joystick axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoystickAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,

    /// Left analog trigger.
    LeftZ,

    /// Right analog trigger.
    RightZ,
    DPadX,
    DPadY,
}

impl JoystickAxis {
    /// Number of axes stored per joystick.
    pub const COUNT: usize = 8;

    /// Every axis, in storage order.
    pub const ALL: [JoystickAxis; Self::COUNT] = [
        Self::LeftX,
        Self::LeftY,
        Self::RightX,
        Self::RightY,
        Self::LeftZ,
        Self::RightZ,
        Self::DPadX,
        Self::DPadY,
    ];

    /// Storage slot of this axis inside a joystick snapshot.
    pub const fn index(self) -> usize {
        self as usize
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
