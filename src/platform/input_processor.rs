//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit window events into engine PlatformEvents.
//
// Architecture:
//   Winit WindowEvent → InputProcessor → PlatformEvent → channel
//
// The channel is bounded and read on the same thread, so events are
// offered with `try_send`. A full channel drops the event and counts it.
// Held state is folded into the SnapshotTracker before the send, so a
// dropped release never leaves a control stuck down.
// Unmapped keys (F13-F24, numpad, media keys) are filtered.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Sender, TrySendError};
use log::{trace, warn};
use winit::{
    event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, TouchPhase, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{KeyCode, MouseButton};
use crate::core::platform_bridge::{PlatformEvent, SnapshotTracker};

//=== InputProcessor ======================================================

/// Feeds converted Winit events into the held-state tracker and the
/// platform channel.
pub(crate) struct InputProcessor {
    sender: Sender<PlatformEvent>,
    tracker: SnapshotTracker,
    dropped: u64,
}

impl InputProcessor {
    /// Pixels treated as one wheel line for touchpads reporting pixels.
    pub(crate) const PIXELS_PER_LINE: f32 = 20.0;

    //--- Construction -----------------------------------------------------

    pub(crate) fn new(sender: Sender<PlatformEvent>) -> Self {
        Self { sender, tracker: SnapshotTracker::new(), dropped: 0 }
    }

    pub(crate) fn tracker(&self) -> &SnapshotTracker {
        &self.tracker
    }

    pub(crate) fn tracker_mut(&mut self) -> &mut SnapshotTracker {
        &mut self.tracker
    }

    /// Events lost to a full channel so far.
    pub(crate) fn dropped(&self) -> u64 {
        self.dropped
    }

    //--- Event Processing -------------------------------------------------

    /// Converts one Winit event and queues the result, if any.
    pub(crate) fn process(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match key_event_for(key_event.physical_key, key_event.state, key_event.repeat) {
                    Some(mapped) => self.emit(mapped),
                    None => trace!(target: "platform::input", "Unmapped key ignored"),
                }

                if key_event.state == ElementState::Pressed {
                    if let Some(text) = &key_event.text {
                        for ch in text.chars().filter(|c| !c.is_control()) {
                            self.emit(PlatformEvent::TextEntered(ch));
                        }
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from(*button);
                self.emit(match state {
                    ElementState::Pressed => PlatformEvent::MouseButtonPressed(button),
                    ElementState::Released => PlatformEvent::MouseButtonReleased(button),
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = wheel_lines(*delta);
                self.emit(PlatformEvent::MouseWheel { dx, dy });
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.emit(PlatformEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::Touch(touch) => {
                let (x, y) = (touch.location.x as f32, touch.location.y as f32);
                self.emit(match touch.phase {
                    TouchPhase::Started | TouchPhase::Moved => PlatformEvent::Touch { id: touch.id, x, y },
                    TouchPhase::Ended | TouchPhase::Cancelled => PlatformEvent::TouchEnded { id: touch.id },
                });
            }

            WindowEvent::Resized(size) => {
                self.emit(PlatformEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
            }

            WindowEvent::Focused(true) => self.emit(PlatformEvent::FocusGained),
            WindowEvent::Focused(false) => self.emit(PlatformEvent::FocusLost),
            WindowEvent::CloseRequested => self.emit(PlatformEvent::CloseRequested),

            _ => {}
        }
    }

    /// Tracks and queues an already converted event.
    pub(crate) fn emit(&mut self, event: PlatformEvent) {
        self.tracker.apply(&event);

        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                self.dropped += 1;
                warn!(
                    target: "platform::input",
                    "Event channel full, dropping {:?} ({} dropped so far)",
                    event,
                    self.dropped
                );
            }
            Err(TrySendError::Disconnected(_)) => {
                trace!(target: "platform::input", "Event channel closed");
            }
        }
    }
}

//=== Conversions =========================================================

/// Builds a key event, or `None` for keys the engine does not map.
pub(crate) fn key_event_for(physical: PhysicalKey, state: ElementState, repeat: bool) -> Option<PlatformEvent> {
    let key = match physical {
        PhysicalKey::Code(code) => KeyCode::from(code),
        PhysicalKey::Unidentified(_) => return None,
    };

    if key == KeyCode::Unidentified {
        return None;
    }

    Some(match state {
        ElementState::Pressed => PlatformEvent::KeyPressed { key, repeat },
        ElementState::Released => PlatformEvent::KeyReleased { key },
    })
}

/// Wheel motion in lines, positive up and right.
pub(crate) fn wheel_lines(delta: MouseScrollDelta) -> (f32, f32) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (x, y),
        MouseScrollDelta::PixelDelta(pos) => (
            pos.x as f32 / InputProcessor::PIXELS_PER_LINE,
            pos.y as f32 / InputProcessor::PIXELS_PER_LINE,
        ),
    }
}

/// Converts Winit physical key codes to engine key codes.
///
/// Unmapped keys return `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode as W;
        match code {
            //--- Digits -------------------------------------------------------
            W::Digit0 => KeyCode::Digit0, W::Digit1 => KeyCode::Digit1,
            W::Digit2 => KeyCode::Digit2, W::Digit3 => KeyCode::Digit3,
            W::Digit4 => KeyCode::Digit4, W::Digit5 => KeyCode::Digit5,
            W::Digit6 => KeyCode::Digit6, W::Digit7 => KeyCode::Digit7,
            W::Digit8 => KeyCode::Digit8, W::Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------
            W::KeyA => KeyCode::KeyA, W::KeyB => KeyCode::KeyB, W::KeyC => KeyCode::KeyC,
            W::KeyD => KeyCode::KeyD, W::KeyE => KeyCode::KeyE, W::KeyF => KeyCode::KeyF,
            W::KeyG => KeyCode::KeyG, W::KeyH => KeyCode::KeyH, W::KeyI => KeyCode::KeyI,
            W::KeyJ => KeyCode::KeyJ, W::KeyK => KeyCode::KeyK, W::KeyL => KeyCode::KeyL,
            W::KeyM => KeyCode::KeyM, W::KeyN => KeyCode::KeyN, W::KeyO => KeyCode::KeyO,
            W::KeyP => KeyCode::KeyP, W::KeyQ => KeyCode::KeyQ, W::KeyR => KeyCode::KeyR,
            W::KeyS => KeyCode::KeyS, W::KeyT => KeyCode::KeyT, W::KeyU => KeyCode::KeyU,
            W::KeyV => KeyCode::KeyV, W::KeyW => KeyCode::KeyW, W::KeyX => KeyCode::KeyX,
            W::KeyY => KeyCode::KeyY, W::KeyZ => KeyCode::KeyZ,

            //--- Function Keys ------------------------------------------------
            W::F1 => KeyCode::F1, W::F2 => KeyCode::F2, W::F3 => KeyCode::F3,
            W::F4 => KeyCode::F4, W::F5 => KeyCode::F5, W::F6 => KeyCode::F6,
            W::F7 => KeyCode::F7, W::F8 => KeyCode::F8, W::F9 => KeyCode::F9,
            W::F10 => KeyCode::F10, W::F11 => KeyCode::F11, W::F12 => KeyCode::F12,

            //--- Navigation ---------------------------------------------------
            W::ArrowDown => KeyCode::ArrowDown, W::ArrowLeft => KeyCode::ArrowLeft,
            W::ArrowRight => KeyCode::ArrowRight, W::ArrowUp => KeyCode::ArrowUp,
            W::Home => KeyCode::Home, W::End => KeyCode::End,
            W::PageUp => KeyCode::PageUp, W::PageDown => KeyCode::PageDown,
            W::Insert => KeyCode::Insert,

            //--- Editing ------------------------------------------------------
            W::Space => KeyCode::Space, W::Enter => KeyCode::Enter,
            W::Escape => KeyCode::Escape, W::Tab => KeyCode::Tab,
            W::Backspace => KeyCode::Backspace, W::Delete => KeyCode::Delete,
            W::Minus => KeyCode::Minus, W::Equal => KeyCode::Equal,
            W::Comma => KeyCode::Comma, W::Period => KeyCode::Period,
            W::Slash => KeyCode::Slash, W::Backquote => KeyCode::Backquote,

            //--- Modifiers ----------------------------------------------------
            W::ShiftLeft => KeyCode::ShiftLeft, W::ShiftRight => KeyCode::ShiftRight,
            W::ControlLeft => KeyCode::ControlLeft, W::ControlRight => KeyCode::ControlRight,
            W::AltLeft => KeyCode::AltLeft, W::AltRight => KeyCode::AltRight,
            W::SuperLeft => KeyCode::SuperLeft, W::SuperRight => KeyCode::SuperRight,

            _ => KeyCode::Unidentified,
        }
    }
}

/// Converts Winit mouse buttons to engine buttons.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            WinitMouseButton::Back => MouseButton::Back,
            WinitMouseButton::Forward => MouseButton::Forward,
            WinitMouseButton::Other(code) => MouseButton::Other(code),
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
