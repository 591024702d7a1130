//=========================================================================
// Snapshot Tracker
//=========================================================================
//
// Folds discrete platform events into a held-state snapshot.
//
// Event-driven backends (winit) expose no "is this key down right now"
// query. The tracker rebuilds that answer from the event stream so the
// sampler can keep polling a snapshot like on any other platform.
//
// Architecture:
//   PlatformEvent ─► apply() ─► DeviceSnapshot (held keys, buttons, pointer)
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::DeviceSnapshot;

//=== SnapshotTracker =====================================================

/// Maintains the held-state snapshot implied by a stream of events.
#[derive(Debug, Default)]
pub struct SnapshotTracker {
    snapshot: DeviceSnapshot,
}

impl SnapshotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event to the held state.
    pub fn apply(&mut self, event: &PlatformEvent) {
        let snapshot = &mut self.snapshot;

        match *event {
            PlatformEvent::KeyPressed { key, .. } => {
                snapshot.keys.insert(key);
            }
            PlatformEvent::KeyReleased { key } => {
                snapshot.keys.remove(&key);
            }
            PlatformEvent::MouseButtonPressed(button) => {
                snapshot.mouse_buttons.insert(button);
            }
            PlatformEvent::MouseButtonReleased(button) => {
                snapshot.mouse_buttons.remove(&button);
            }
            PlatformEvent::CursorMoved { x, y } | PlatformEvent::Touch { x, y, .. } => {
                snapshot.pointer = (x, y);
            }
            PlatformEvent::JoystickConnected(id) => {
                if let Some(js) = snapshot.joystick_mut(id) {
                    js.connected = true;
                }
            }
            PlatformEvent::JoystickDisconnected(id) => snapshot.disconnect_joystick(id),
            PlatformEvent::JoystickButtonPressed { joystick, button } => {
                if let Some(js) = snapshot.joystick_mut(joystick) {
                    js.buttons.insert(button);
                }
            }
            PlatformEvent::JoystickButtonReleased { joystick, button } => {
                if let Some(js) = snapshot.joystick_mut(joystick) {
                    js.buttons.remove(&button);
                }
            }

            // Releases that happen while unfocused are never reported
            PlatformEvent::FocusLost => {
                snapshot.keys.clear();
                snapshot.mouse_buttons.clear();
            }

            PlatformEvent::TextEntered(_)
            | PlatformEvent::MouseWheel { .. }
            | PlatformEvent::TouchEnded { .. }
            | PlatformEvent::Resized { .. }
            | PlatformEvent::FocusGained
            | PlatformEvent::CloseRequested => {}
        }
    }

    /// Applies every event in order.
    pub fn apply_all(&mut self, events: &[PlatformEvent]) {
        for event in events {
            self.apply(event);
        }
    }

    pub fn snapshot(&self) -> &DeviceSnapshot {
        &self.snapshot
    }

    /// Direct access for state that arrives by polling (joystick axes).
    pub fn snapshot_mut(&mut self) -> &mut DeviceSnapshot {
        &mut self.snapshot
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, MouseButton};

    #[test]
    fn key_press_then_release_clears_held_state() {
        let mut tracker = SnapshotTracker::new();

        tracker.apply(&PlatformEvent::KeyPressed { key: KeyCode::KeyW, repeat: false });
        assert!(tracker.snapshot().key(KeyCode::KeyW));

        tracker.apply(&PlatformEvent::KeyReleased { key: KeyCode::KeyW });
        assert!(!tracker.snapshot().key(KeyCode::KeyW));
    }

    #[test]
    fn fast_tap_ends_released() {
        let mut tracker = SnapshotTracker::new();

        tracker.apply_all(&[
            PlatformEvent::MouseButtonPressed(MouseButton::Left),
            PlatformEvent::MouseButtonReleased(MouseButton::Left),
        ]);

        assert!(!tracker.snapshot().mouse_button(MouseButton::Left));
    }

    #[test]
    fn touch_moves_pointer() {
        let mut tracker = SnapshotTracker::new();

        tracker.apply(&PlatformEvent::Touch { id: 1, x: 5.0, y: 6.0 });

        assert_eq!(tracker.snapshot().pointer, (5.0, 6.0));
    }

    #[test]
    fn joystick_buttons_require_connection() {
        let mut tracker = SnapshotTracker::new();

        tracker.apply(&PlatformEvent::JoystickButtonPressed { joystick: 1, button: 0 });
        assert!(!tracker.snapshot().joystick_button(1, 0));

        tracker.apply(&PlatformEvent::JoystickConnected(1));
        tracker.apply(&PlatformEvent::JoystickButtonPressed { joystick: 1, button: 0 });
        assert!(tracker.snapshot().joystick_button(1, 0));

        tracker.apply(&PlatformEvent::JoystickDisconnected(1));
        assert!(!tracker.snapshot().joystick_button(1, 0));
    }

    #[test]
    fn focus_lost_releases_everything() {
        let mut tracker = SnapshotTracker::new();

        tracker.apply_all(&[
            PlatformEvent::KeyPressed { key: KeyCode::ShiftLeft, repeat: false },
            PlatformEvent::MouseButtonPressed(MouseButton::Right),
            PlatformEvent::FocusLost,
        ]);

        assert!(tracker.snapshot().keys.is_empty());
        assert!(tracker.snapshot().mouse_buttons.is_empty());
    }

    #[test]
    fn out_of_range_joystick_events_are_ignored() {
        let mut tracker = SnapshotTracker::new();

        tracker.apply(&PlatformEvent::JoystickConnected(500));
        tracker.apply(&PlatformEvent::JoystickButtonPressed { joystick: 500, button: 2 });

        assert!(tracker.snapshot().joysticks.iter().all(|js| !js.connected));
    }
}
