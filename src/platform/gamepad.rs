//=========================================================================
// Gamepad Polling
//=========================================================================
//
// Joystick support through gilrs (feature `gamepad`).
//
// Button presses and connections arrive as gilrs events and are turned
// into PlatformEvents. Axes are polled state and are written straight
// into the device snapshot, scaled from [-1, 1] to the engine's axis
// range.
//
//=========================================================================

//=== External Dependencies ===============================================

use gilrs::{Axis, Button, EventType, Gilrs};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::input::{DeviceSnapshot, JoystickAxis, JoystickId, AXIS_RANGE, MAX_JOYSTICKS};
use crate::core::platform_bridge::PlatformEvent;

//=== GamepadPoller =======================================================

pub(crate) struct GamepadPoller {
    gilrs: Gilrs,
}

impl GamepadPoller {
    /// Initialises gilrs. Returns `None` (logged) if the backend is
    /// unavailable; the engine then runs without joysticks.
    pub(crate) fn new() -> Option<Self> {
        match Gilrs::new() {
            Ok(gilrs) => {
                info!(target: "platform", "Gamepad backend ready");
                Some(Self { gilrs })
            }
            Err(err) => {
                warn!(target: "platform", "Gamepad backend unavailable: {}", err);
                None
            }
        }
    }

    /// Appends every pending gamepad event.
    ///
    /// Pads already connected at startup show up on the first call.
    pub(crate) fn poll(&mut self, events: &mut Vec<PlatformEvent>) {
        while let Some(gilrs::Event { id, event, .. }) = self.gilrs.next_event() {
            let joystick: JoystickId = usize::from(id);
            if joystick >= MAX_JOYSTICKS {
                debug!(target: "platform::input", "Ignoring gamepad {} past slot limit", joystick);
                continue;
            }

            match event {
                EventType::Connected => events.push(PlatformEvent::JoystickConnected(joystick)),
                EventType::Disconnected => events.push(PlatformEvent::JoystickDisconnected(joystick)),
                EventType::ButtonPressed(button, _) => {
                    if let Some(button) = button_code(button) {
                        events.push(PlatformEvent::JoystickButtonPressed { joystick, button });
                    }
                }
                EventType::ButtonReleased(button, _) => {
                    if let Some(button) = button_code(button) {
                        events.push(PlatformEvent::JoystickButtonReleased { joystick, button });
                    }
                }
                _ => {}
            }
        }
    }

    /// Writes the current axis values of connected pads into `snapshot`.
    pub(crate) fn read_axes(&self, snapshot: &mut DeviceSnapshot) {
        for (id, gamepad) in self.gilrs.gamepads() {
            let Some(slot) = snapshot.joystick_mut(usize::from(id)) else {
                continue;
            };
            if !slot.connected {
                continue;
            }

            for axis in JoystickAxis::ALL {
                slot.set_axis(axis, gamepad.value(gilrs_axis(axis)) * AXIS_RANGE);
            }
        }
    }
}

//=== Mapping =============================================================

/// Engine button index for a gilrs button, following the common
/// south/east/north/west face layout.
fn button_code(button: Button) -> Option<u32> {
    let code = match button {
        Button::South => 0,
        Button::East => 1,
        Button::North => 2,
        Button::West => 3,
        Button::LeftTrigger => 4,
        Button::RightTrigger => 5,
        Button::LeftTrigger2 => 6,
        Button::RightTrigger2 => 7,
        Button::Select => 8,
        Button::Start => 9,
        Button::Mode => 10,
        Button::LeftThumb => 11,
        Button::RightThumb => 12,
        Button::DPadUp => 13,
        Button::DPadDown => 14,
        Button::DPadLeft => 15,
        Button::DPadRight => 16,
        _ => return None,
    };
    Some(code)
}

fn gilrs_axis(axis: JoystickAxis) -> Axis {
    match axis {
        JoystickAxis::LeftX => Axis::LeftStickX,
        JoystickAxis::LeftY => Axis::LeftStickY,
        JoystickAxis::RightX => Axis::RightStickX,
        JoystickAxis::RightY => Axis::RightStickY,
        JoystickAxis::LeftZ => Axis::LeftZ,
        JoystickAxis::RightZ => Axis::RightZ,
        JoystickAxis::DPadX => Axis::DPadX,
        JoystickAxis::DPadY => Axis::DPadY,
    }
}

//=========================================================================
// Tests
//=========================================================================
