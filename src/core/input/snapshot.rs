//=========================================================================
// Device Snapshot
//=========================================================================
//
// Point-in-time copy of every polled device control.
//
// Architecture:
//   Platform::read_device_state() → DeviceSnapshot (current)
//   InputSampler keeps { current, previous } and compares them
//
// A snapshot carries only held/continuous state. Discrete events
// (press lists, text) never live here.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{JoystickAxis, JoystickId, KeyCode, MouseButton, AXIS_RANGE, MAX_JOYSTICKS};

//=== JoystickSnapshot ====================================================

/// Held buttons and axis positions of one joystick slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoystickSnapshot {
    /// Whether a device currently occupies this slot.
    pub connected: bool,

    /// Held button indices.
    pub buttons: HashSet<u32>,

    /// Raw axis values in `[-AXIS_RANGE, AXIS_RANGE]`, indexed by
    /// [`JoystickAxis::index`].
    pub axes: [f32; JoystickAxis::COUNT],
}

impl JoystickSnapshot {
    /// Stores an axis value, clamped to the portable range. Non-finite
    /// readings store as centered.
    pub fn set_axis(&mut self, axis: JoystickAxis, value: f32) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.axes[axis.index()] = value.clamp(-AXIS_RANGE, AXIS_RANGE);
    }

    /// Returns the raw (not dead-zoned) axis value.
    pub fn axis(&self, axis: JoystickAxis) -> f32 {
        self.axes[axis.index()]
    }

    fn reset(&mut self) {
        self.connected = false;
        self.buttons.clear();
        self.axes = [0.0; JoystickAxis::COUNT];
    }
}

//=== DeviceSnapshot ======================================================

/// Held state of keyboard, mouse and joysticks at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSnapshot {
    pub keys: HashSet<KeyCode>,
    pub mouse_buttons: HashSet<MouseButton>,

    /// Pointer position in window space (pixels, top-left origin).
    pub pointer: (f32, f32),

    /// One slot per joystick index, always `MAX_JOYSTICKS` long.
    pub joysticks: Vec<JoystickSnapshot>,
}

impl DeviceSnapshot {
    /// Creates a snapshot with nothing held and no joysticks connected.
    pub fn new() -> Self {
        Self {
            keys: HashSet::with_capacity(32),
            mouse_buttons: HashSet::with_capacity(4),
            pointer: (0.0, 0.0),
            joysticks: vec![JoystickSnapshot::default(); MAX_JOYSTICKS],
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn key(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    pub fn mouse_button(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Returns the joystick in `id`'s slot if one is connected.
    pub fn joystick(&self, id: JoystickId) -> Option<&JoystickSnapshot> {
        self.joysticks.get(id).filter(|js| js.connected)
    }

    pub fn joystick_button(&self, id: JoystickId, button: u32) -> bool {
        self.joystick(id).is_some_and(|js| js.buttons.contains(&button))
    }

    pub fn joystick_axis(&self, id: JoystickId, axis: JoystickAxis) -> f32 {
        self.joystick(id).map_or(0.0, |js| js.axis(axis))
    }

    //--- Mutation ---------------------------------------------------------

    /// Returns a mutable joystick slot, or `None` past `MAX_JOYSTICKS`.
    pub fn joystick_mut(&mut self, id: JoystickId) -> Option<&mut JoystickSnapshot> {
        self.joysticks.get_mut(id)
    }

    /// Marks a joystick slot disconnected and zeroes its controls.
    pub fn disconnect_joystick(&mut self, id: JoystickId) {
        if let Some(js) = self.joysticks.get_mut(id) {
            js.reset();
        }
    }

    /// Copies `other` into `self`, reusing allocated capacity.
    pub fn copy_from(&mut self, other: &DeviceSnapshot) {
        self.keys.clone_from(&other.keys);
        self.mouse_buttons.clone_from(&other.mouse_buttons);
        self.pointer = other.pointer;
        self.joysticks.clone_from(&other.joysticks);
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for DeviceSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_snapshot_has_all_joystick_slots_disconnected() {
        let snapshot = DeviceSnapshot::new();
        assert_eq!(snapshot.joysticks.len(), MAX_JOYSTICKS);
        assert!(snapshot.joysticks.iter().all(|js| !js.connected));
    }

    #[test]
    fn disconnected_joystick_reads_as_default() {
        let mut snapshot = DeviceSnapshot::new();
        let js = snapshot.joystick_mut(2).unwrap();
        js.buttons.insert(1);
        js.set_axis(JoystickAxis::LeftX, 50.0);

        // Slot written but never marked connected
        assert!(!snapshot.joystick_button(2, 1));
        assert_eq!(snapshot.joystick_axis(2, JoystickAxis::LeftX), 0.0);
    }

    #[test]
    fn out_of_range_joystick_is_absent() {
        let mut snapshot = DeviceSnapshot::new();
        assert!(snapshot.joystick(MAX_JOYSTICKS).is_none());
        assert!(snapshot.joystick_mut(MAX_JOYSTICKS + 3).is_none());
        assert!(!snapshot.joystick_button(99, 0));
    }

    #[test]
    fn set_axis_clamps_to_range() {
        let mut js = JoystickSnapshot::default();
        js.set_axis(JoystickAxis::RightY, 250.0);
        assert_eq!(js.axis(JoystickAxis::RightY), AXIS_RANGE);
        js.set_axis(JoystickAxis::RightY, -250.0);
        assert_eq!(js.axis(JoystickAxis::RightY), -AXIS_RANGE);
    }

    #[test]
    fn non_finite_axis_reads_centered() {
        let mut snapshot = DeviceSnapshot::new();
        let js = snapshot.joystick_mut(0).unwrap();
        js.connected = true;
        js.set_axis(JoystickAxis::LeftX, f32::NAN);
        js.set_axis(JoystickAxis::LeftY, f32::INFINITY);

        assert_eq!(snapshot.joystick_axis(0, JoystickAxis::LeftX), 0.0);
        assert_eq!(snapshot.joystick_axis(0, JoystickAxis::LeftY), 0.0);
    }

    #[test]
    fn disconnect_zeroes_controls() {
        let mut snapshot = DeviceSnapshot::new();
        let js = snapshot.joystick_mut(0).unwrap();
        js.connected = true;
        js.buttons.insert(3);
        js.set_axis(JoystickAxis::DPadX, -100.0);

        snapshot.disconnect_joystick(0);

        assert_eq!(snapshot.joysticks[0], JoystickSnapshot::default());
    }

    #[test]
    fn copy_from_matches_source() {
        let mut source = DeviceSnapshot::new();
        source.keys.insert(KeyCode::KeyQ);
        source.mouse_buttons.insert(MouseButton::Middle);
        source.pointer = (12.0, 34.0);

        let mut target = DeviceSnapshot::new();
        target.keys.insert(KeyCode::KeyZ);
        target.copy_from(&source);

        assert_eq!(target, source);
    }
}
