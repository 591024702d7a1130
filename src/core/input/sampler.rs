//=========================================================================
// Input Sampler
//=========================================================================
//
// Double-buffered input sampling with per-frame edge detection.
//
// Architecture:
//   Platform ─► begin_frame() ─► { current snapshot, frame queues } ─► query
//                                  previous snapshot ◄── end_frame()
//
// Frame lifecycle: begin_frame() → queries (one tick) → end_frame()
//
// Held/descending/ascending come from comparing the two snapshots.
// Press/release lists and text come strictly from the platform's event
// list for the frame, never from snapshot diffing.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{JoystickAxis, JoystickId, KeyCode, Modifier, MouseButton, AXIS_RANGE};
use super::snapshot::DeviceSnapshot;
use crate::core::platform_bridge::{Platform, PlatformEvent};

//=== InputSampler ========================================================

/// Samples device state once per frame and answers input queries.
pub struct InputSampler {
    //--- Snapshots ---------------------------------------------------------
    current: DeviceSnapshot,
    previous: DeviceSnapshot,

    //--- Frame Queues (reset by begin_frame()) ----------------------------
    frame_events: Vec<PlatformEvent>,
    keys_pressed: Vec<KeyCode>,
    keys_released: Vec<KeyCode>,
    keys_repeated: Vec<KeyCode>,
    text: String,
    mouse_pressed: Vec<MouseButton>,
    mouse_released: Vec<MouseButton>,
    joystick_pressed: Vec<(JoystickId, u32)>,
    joystick_released: Vec<(JoystickId, u32)>,
    wheel_delta: (f32, f32),
    pointer_delta: (f32, f32),
    pointer_moved: bool,
    resized: Option<(u32, u32)>,
    close_requested: bool,

    //--- Persistent Flags ---------------------------------------------------
    has_focus: bool,
    frame: u64,

    //--- Configuration ------------------------------------------------------
    key_repeat: bool,
    dead_zone: f32,
}

impl InputSampler {
    /// Default joystick dead zone, in raw axis units.
    pub const DEFAULT_DEAD_ZONE: f32 = 10.0;

    /// Creates a sampler with nothing held, repeat suppressed and the
    /// default dead zone.
    pub fn new() -> Self {
        Self {
            current: DeviceSnapshot::new(),
            previous: DeviceSnapshot::new(),
            frame_events: Vec::with_capacity(32),
            keys_pressed: Vec::new(),
            keys_released: Vec::new(),
            keys_repeated: Vec::new(),
            text: String::new(),
            mouse_pressed: Vec::new(),
            mouse_released: Vec::new(),
            joystick_pressed: Vec::new(),
            joystick_released: Vec::new(),
            wheel_delta: (0.0, 0.0),
            pointer_delta: (0.0, 0.0),
            pointer_moved: false,
            resized: None,
            close_requested: false,
            has_focus: true,
            frame: 0,
            key_repeat: false,
            dead_zone: Self::DEFAULT_DEAD_ZONE,
        }
    }

    //--- Configuration ----------------------------------------------------

    /// Whether OS auto-repeat counts as a renewed descending event.
    pub fn set_key_repeat(&mut self, enabled: bool) {
        self.key_repeat = enabled;
    }

    pub fn key_repeat(&self) -> bool {
        self.key_repeat
    }

    /// Sets the joystick dead zone (clamped to `[0, AXIS_RANGE]`).
    pub fn set_dead_zone(&mut self, dead_zone: f32) {
        self.dead_zone = dead_zone.clamp(0.0, AXIS_RANGE);
    }

    pub fn dead_zone(&self) -> f32 {
        self.dead_zone
    }

    //--- Frame Processing -------------------------------------------------

    /// Starts a frame: resets the queues, polls the platform's events and
    /// reads its current device state.
    pub fn begin_frame<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        self.clear_queues();

        platform.poll_frame_events(&mut self.frame_events);
        platform.read_device_state(&mut self.current);

        let events = std::mem::take(&mut self.frame_events);
        for event in &events {
            self.digest_event(event);
        }
        self.frame_events = events;

        self.pointer_delta = (
            self.current.pointer.0 - self.previous.pointer.0,
            self.current.pointer.1 - self.previous.pointer.1,
        );
        self.frame += 1;

        if !self.frame_events.is_empty() {
            trace!(
                target: "kernel::input",
                "Frame {}: {} events, {} keys held",
                self.frame,
                self.frame_events.len(),
                self.current.keys.len()
            );
        }
    }

    /// Ends a frame: the current snapshot becomes the previous one.
    ///
    /// Must run after every query of the frame has been answered.
    pub fn end_frame(&mut self) {
        self.previous.copy_from(&self.current);
    }

    //--- Internal Helpers -------------------------------------------------

    fn clear_queues(&mut self) {
        self.frame_events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.keys_repeated.clear();
        self.text.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
        self.joystick_pressed.clear();
        self.joystick_released.clear();
        self.wheel_delta = (0.0, 0.0);
        self.pointer_moved = false;
        self.resized = None;
        self.close_requested = false;
    }

    fn digest_event(&mut self, event: &PlatformEvent) {
        match *event {
            PlatformEvent::KeyPressed { key, repeat: false } => self.keys_pressed.push(key),
            PlatformEvent::KeyPressed { key, repeat: true } => {
                if self.key_repeat {
                    self.keys_pressed.push(key);
                    self.keys_repeated.push(key);
                }
            }
            PlatformEvent::KeyReleased { key } => self.keys_released.push(key),
            PlatformEvent::TextEntered(ch) => self.text.push(ch),
            PlatformEvent::MouseButtonPressed(button) => self.mouse_pressed.push(button),
            PlatformEvent::MouseButtonReleased(button) => self.mouse_released.push(button),
            PlatformEvent::MouseWheel { dx, dy } => {
                self.wheel_delta.0 += dx;
                self.wheel_delta.1 += dy;
            }
            PlatformEvent::CursorMoved { .. } | PlatformEvent::Touch { .. } => {
                self.pointer_moved = true;
            }
            PlatformEvent::JoystickButtonPressed { joystick, button } => {
                self.joystick_pressed.push((joystick, button));
            }
            PlatformEvent::JoystickButtonReleased { joystick, button } => {
                self.joystick_released.push((joystick, button));
            }
            PlatformEvent::Resized { width, height } => self.resized = Some((width, height)),
            PlatformEvent::FocusGained => self.has_focus = true,
            PlatformEvent::FocusLost => self.has_focus = false,
            PlatformEvent::CloseRequested => self.close_requested = true,
            PlatformEvent::TouchEnded { .. }
            | PlatformEvent::JoystickConnected(_)
            | PlatformEvent::JoystickDisconnected(_) => {}
        }
    }

    //=====================================================================
    // Query API - Keyboard
    //=====================================================================

    /// Returns `true` while the key is held in the current snapshot.
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.current.key(key)
    }

    /// Returns `true` on the frame the key went from released to held.
    ///
    /// With key repeat enabled, an OS auto-repeat also counts.
    pub fn key_descending(&self, key: KeyCode) -> bool {
        let edge = self.current.key(key) && !self.previous.key(key);
        edge || (self.key_repeat && self.keys_repeated.contains(&key))
    }

    /// Returns `true` on the frame the key went from held to released.
    pub fn key_ascending(&self, key: KeyCode) -> bool {
        !self.current.key(key) && self.previous.key(key)
    }

    /// Keys the platform reported pressed this frame, in order.
    pub fn keys_pressed(&self) -> &[KeyCode] {
        &self.keys_pressed
    }

    /// Keys the platform reported released this frame, in order.
    pub fn keys_released(&self) -> &[KeyCode] {
        &self.keys_released
    }

    /// Text entered this frame.
    pub fn text(&self) -> &str {
        &self.text
    }

    //=====================================================================
    // Query API - Modifiers
    //=====================================================================

    pub fn modifier_held(&self, modifier: Modifier) -> bool {
        modifier.keys().into_iter().any(|key| self.key_held(key))
    }

    pub fn modifier_descending(&self, modifier: Modifier) -> bool {
        modifier.keys().into_iter().any(|key| self.key_descending(key))
    }

    pub fn modifier_ascending(&self, modifier: Modifier) -> bool {
        modifier.keys().into_iter().any(|key| self.key_ascending(key))
    }

    /// Returns `true` if either Shift is held.
    pub fn shift_held(&self) -> bool {
        self.modifier_held(Modifier::Shift)
    }

    /// Returns `true` if either Control is held.
    pub fn control_held(&self) -> bool {
        self.modifier_held(Modifier::Control)
    }

    /// Returns `true` if either Alt is held.
    pub fn alt_held(&self) -> bool {
        self.modifier_held(Modifier::Alt)
    }

    /// Returns `true` if either System (Super / Command) key is held.
    pub fn system_held(&self) -> bool {
        self.modifier_held(Modifier::System)
    }

    //=====================================================================
    // Query API - Mouse
    //=====================================================================

    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.current.mouse_button(button)
    }

    pub fn mouse_descending(&self, button: MouseButton) -> bool {
        self.current.mouse_button(button) && !self.previous.mouse_button(button)
    }

    pub fn mouse_ascending(&self, button: MouseButton) -> bool {
        !self.current.mouse_button(button) && self.previous.mouse_button(button)
    }

    pub fn mouse_pressed(&self) -> &[MouseButton] {
        &self.mouse_pressed
    }

    pub fn mouse_released(&self) -> &[MouseButton] {
        &self.mouse_released
    }

    /// Accumulated wheel movement this frame, in lines.
    pub fn wheel_delta(&self) -> (f32, f32) {
        self.wheel_delta
    }

    /// Pointer position in window space (pixels, top-left origin).
    pub fn pointer_position(&self) -> (f32, f32) {
        self.current.pointer
    }

    /// Pointer movement since the previous frame.
    pub fn pointer_delta(&self) -> (f32, f32) {
        self.pointer_delta
    }

    /// Whether a cursor or touch movement was reported this frame.
    pub fn pointer_moved(&self) -> bool {
        self.pointer_moved
    }

    //=====================================================================
    // Query API - Joysticks
    //=====================================================================

    pub fn joystick_connected(&self, joystick: JoystickId) -> bool {
        self.current.joystick(joystick).is_some()
    }

    pub fn joystick_button_held(&self, joystick: JoystickId, button: u32) -> bool {
        self.current.joystick_button(joystick, button)
    }

    pub fn joystick_button_descending(&self, joystick: JoystickId, button: u32) -> bool {
        self.current.joystick_button(joystick, button)
            && !self.previous.joystick_button(joystick, button)
    }

    pub fn joystick_button_ascending(&self, joystick: JoystickId, button: u32) -> bool {
        !self.current.joystick_button(joystick, button)
            && self.previous.joystick_button(joystick, button)
    }

    /// Axis value in `[-100, 100]`, or `0.0` inside the dead zone.
    ///
    /// Values outside the dead zone pass through unscaled.
    pub fn joystick_axis(&self, joystick: JoystickId, axis: JoystickAxis) -> f32 {
        let value = self.current.joystick_axis(joystick, axis);
        if value.abs() < self.dead_zone {
            0.0
        } else {
            value
        }
    }

    /// Joystick buttons the platform reported pressed this frame.
    pub fn joystick_pressed(&self) -> &[(JoystickId, u32)] {
        &self.joystick_pressed
    }

    /// Joystick buttons the platform reported released this frame.
    pub fn joystick_released(&self) -> &[(JoystickId, u32)] {
        &self.joystick_released
    }

    //=====================================================================
    // Query API - Window
    //=====================================================================

    /// New client size if the window was resized this frame.
    pub fn resized(&self) -> Option<(u32, u32)> {
        self.resized
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Every platform event received this frame, in order.
    pub fn frame_events(&self) -> &[PlatformEvent] {
        &self.frame_events
    }

    /// Number of frames sampled so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for InputSampler {
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
    use crate::core::platform_bridge::HeadlessPlatform;
    use crossbeam_channel::Sender;

    //--- Test Helpers -----------------------------------------------------

    struct Rig {
        platform: HeadlessPlatform,
        tx: Sender<PlatformEvent>,
        sampler: InputSampler,
    }

    impl Rig {
        fn new() -> Self {
            let (platform, tx) = HeadlessPlatform::new(800, 600);
            Self { platform, tx, sampler: InputSampler::new() }
        }

        /// Runs one full frame; `check` sees the sampler mid-frame.
        fn frame<R>(&mut self, events: &[PlatformEvent], check: impl FnOnce(&InputSampler) -> R) -> R {
            for event in events {
                self.tx.send(event.clone()).unwrap();
            }
            self.sampler.begin_frame(&mut self.platform);
            let result = check(&self.sampler);
            self.sampler.end_frame();
            result
        }
    }

    fn key_down(key: KeyCode) -> PlatformEvent {
        PlatformEvent::KeyPressed { key, repeat: false }
    }

    fn key_repeat(key: KeyCode) -> PlatformEvent {
        PlatformEvent::KeyPressed { key, repeat: true }
    }

    fn key_up(key: KeyCode) -> PlatformEvent {
        PlatformEvent::KeyReleased { key }
    }

    //=====================================================================
    // Edge Detection
    //=====================================================================

    /// Held across 1..k, released at k+1: one descending, one ascending.
    #[test]
    fn held_key_produces_exactly_one_edge_each_way() {
        for k in [1usize, 2, 5, 30] {
            let mut rig = Rig::new();
            let mut descending = Vec::new();
            let mut ascending = Vec::new();

            for frame in 1..=k + 1 {
                let events = if frame == 1 {
                    vec![key_down(KeyCode::KeyA)]
                } else if frame == k + 1 {
                    vec![key_up(KeyCode::KeyA)]
                } else {
                    vec![]
                };
                let (down, up) = rig.frame(&events, |s| {
                    (s.key_descending(KeyCode::KeyA), s.key_ascending(KeyCode::KeyA))
                });
                if down {
                    descending.push(frame);
                }
                if up {
                    ascending.push(frame);
                }
            }

            assert_eq!(descending, vec![1], "k = {}", k);
            assert_eq!(ascending, vec![k + 1], "k = {}", k);
        }
    }

    #[test]
    fn held_reflects_current_snapshot() {
        let mut rig = Rig::new();

        assert!(rig.frame(&[key_down(KeyCode::KeyW)], |s| s.key_held(KeyCode::KeyW)));
        assert!(rig.frame(&[], |s| s.key_held(KeyCode::KeyW)));
        assert!(!rig.frame(&[key_up(KeyCode::KeyW)], |s| s.key_held(KeyCode::KeyW)));
    }

    #[test]
    fn repeat_suppressed_by_default() {
        let mut rig = Rig::new();
        rig.frame(&[key_down(KeyCode::Backspace)], |_| ());

        let (descending, pressed) = rig.frame(&[key_repeat(KeyCode::Backspace)], |s| {
            (s.key_descending(KeyCode::Backspace), s.keys_pressed().to_vec())
        });

        assert!(!descending);
        assert!(pressed.is_empty());
    }

    #[test]
    fn repeat_counts_as_descending_when_enabled() {
        let mut rig = Rig::new();
        rig.sampler.set_key_repeat(true);
        rig.frame(&[key_down(KeyCode::Backspace)], |_| ());

        let (descending, pressed) = rig.frame(&[key_repeat(KeyCode::Backspace)], |s| {
            (s.key_descending(KeyCode::Backspace), s.keys_pressed().to_vec())
        });

        assert!(descending);
        assert_eq!(pressed, vec![KeyCode::Backspace]);
    }

    #[test]
    fn mouse_edges_follow_snapshots() {
        let mut rig = Rig::new();
        let press = PlatformEvent::MouseButtonPressed(MouseButton::Left);
        let release = PlatformEvent::MouseButtonReleased(MouseButton::Left);

        assert!(rig.frame(&[press], |s| s.mouse_descending(MouseButton::Left)));
        assert!(rig.frame(&[], |s| s.mouse_held(MouseButton::Left)
            && !s.mouse_descending(MouseButton::Left)));
        assert!(rig.frame(&[release], |s| s.mouse_ascending(MouseButton::Left)));
    }

    //=====================================================================
    // Discrete Queues
    //=====================================================================

    #[test]
    fn queues_empty_without_platform_events() {
        let mut rig = Rig::new();
        rig.frame(&[key_down(KeyCode::KeyA), PlatformEvent::TextEntered('a')], |_| ());

        rig.frame(&[], |s| {
            assert!(s.keys_pressed().is_empty());
            assert!(s.keys_released().is_empty());
            assert!(s.text().is_empty());
            assert!(s.mouse_pressed().is_empty());
            assert!(s.mouse_released().is_empty());
            assert!(s.joystick_pressed().is_empty());
            assert_eq!(s.wheel_delta(), (0.0, 0.0));
            assert!(s.frame_events().is_empty());
        });
    }

    #[test]
    fn queues_contain_exactly_reported_events() {
        let mut rig = Rig::new();
        let events = [
            key_down(KeyCode::KeyH),
            PlatformEvent::TextEntered('h'),
            PlatformEvent::TextEntered('i'),
            PlatformEvent::MouseButtonPressed(MouseButton::Right),
            PlatformEvent::MouseWheel { dx: 0.0, dy: 1.0 },
            PlatformEvent::MouseWheel { dx: 0.5, dy: 2.0 },
            key_up(KeyCode::KeyH),
        ];

        rig.frame(&events, |s| {
            assert_eq!(s.keys_pressed(), &[KeyCode::KeyH]);
            assert_eq!(s.keys_released(), &[KeyCode::KeyH]);
            assert_eq!(s.text(), "hi");
            assert_eq!(s.mouse_pressed(), &[MouseButton::Right]);
            assert_eq!(s.wheel_delta(), (0.5, 3.0));
            assert_eq!(s.frame_events().len(), events.len());
        });
    }

    /// Press and release inside one frame shows in the queues but not in
    /// the snapshot edges.
    #[test]
    fn fast_tap_visible_only_in_queues() {
        let mut rig = Rig::new();

        rig.frame(&[key_down(KeyCode::KeyJ), key_up(KeyCode::KeyJ)], |s| {
            assert_eq!(s.keys_pressed(), &[KeyCode::KeyJ]);
            assert_eq!(s.keys_released(), &[KeyCode::KeyJ]);
            assert!(!s.key_held(KeyCode::KeyJ));
            assert!(!s.key_descending(KeyCode::KeyJ));
        });
    }

    //=====================================================================
    // Continuous Values
    //=====================================================================

    #[test]
    fn pointer_delta_against_previous_frame() {
        let mut rig = Rig::new();

        let first = rig.frame(&[PlatformEvent::CursorMoved { x: 100.0, y: 100.0 }], |s| {
            (s.pointer_delta(), s.pointer_moved())
        });
        assert_eq!(first, ((100.0, 100.0), true));

        let second = rig.frame(&[PlatformEvent::CursorMoved { x: 150.0, y: 120.0 }], |s| s.pointer_delta());
        assert_eq!(second, (50.0, 20.0));

        let still = rig.frame(&[], |s| (s.pointer_delta(), s.pointer_moved()));
        assert_eq!(still, ((0.0, 0.0), false));
    }

    #[test]
    fn joystick_axis_dead_zone_passes_through_unscaled() {
        let mut rig = Rig::new();
        rig.sampler.set_dead_zone(10.0);
        rig.frame(&[PlatformEvent::JoystickConnected(0)], |_| ());

        rig.platform.set_joystick_axis(0, JoystickAxis::LeftX, 0.0);
        assert_eq!(rig.frame(&[], |s| s.joystick_axis(0, JoystickAxis::LeftX)), 0.0);

        rig.platform.set_joystick_axis(0, JoystickAxis::LeftX, 60.0);
        assert_eq!(rig.frame(&[], |s| s.joystick_axis(0, JoystickAxis::LeftX)), 60.0);

        rig.platform.set_joystick_axis(0, JoystickAxis::LeftX, -9.5);
        assert_eq!(rig.frame(&[], |s| s.joystick_axis(0, JoystickAxis::LeftX)), 0.0);
    }

    #[test]
    fn dead_zone_is_clamped() {
        let mut sampler = InputSampler::new();
        sampler.set_dead_zone(-5.0);
        assert_eq!(sampler.dead_zone(), 0.0);
        sampler.set_dead_zone(500.0);
        assert_eq!(sampler.dead_zone(), AXIS_RANGE);
    }

    #[test]
    fn joystick_button_edges() {
        let mut rig = Rig::new();
        rig.frame(&[PlatformEvent::JoystickConnected(1)], |_| ());

        let pressed = PlatformEvent::JoystickButtonPressed { joystick: 1, button: 3 };
        rig.frame(&[pressed], |s| {
            assert!(s.joystick_button_descending(1, 3));
            assert_eq!(s.joystick_pressed(), &[(1, 3)]);
        });

        let released = PlatformEvent::JoystickButtonReleased { joystick: 1, button: 3 };
        rig.frame(&[released], |s| {
            assert!(s.joystick_button_ascending(1, 3));
            assert_eq!(s.joystick_released(), &[(1, 3)]);
        });
    }

    #[test]
    fn absent_joystick_yields_defaults() {
        let mut rig = Rig::new();

        rig.frame(&[], |s| {
            assert!(!s.joystick_connected(5));
            assert!(!s.joystick_button_held(5, 0));
            assert!(!s.joystick_button_descending(42, 0));
            assert_eq!(s.joystick_axis(42, JoystickAxis::RightX), 0.0);
        });
    }

    //=====================================================================
    // Modifiers
    //=====================================================================

    #[test]
    fn modifiers_or_left_and_right() {
        let mut rig = Rig::new();

        rig.frame(&[key_down(KeyCode::ShiftRight)], |s| {
            assert!(s.shift_held());
            assert!(s.modifier_descending(Modifier::Shift));
            assert!(!s.control_held());
        });

        rig.frame(&[key_down(KeyCode::ShiftLeft), key_down(KeyCode::SuperLeft)], |s| {
            assert!(s.shift_held());
            assert!(s.system_held());
            // Left side went down this frame
            assert!(s.modifier_descending(Modifier::Shift));
        });

        rig.frame(&[key_up(KeyCode::ShiftRight)], |s| {
            assert!(s.shift_held(), "left shift still down");
            assert!(s.modifier_ascending(Modifier::Shift));
        });
    }

    //=====================================================================
    // Window Signals
    //=====================================================================

    #[test]
    fn window_signals_last_one_frame() {
        let mut rig = Rig::new();

        rig.frame(
            &[PlatformEvent::Resized { width: 1024, height: 768 }, PlatformEvent::CloseRequested],
            |s| {
                assert_eq!(s.resized(), Some((1024, 768)));
                assert!(s.close_requested());
            },
        );

        rig.frame(&[], |s| {
            assert_eq!(s.resized(), None);
            assert!(!s.close_requested());
        });
    }

    #[test]
    fn focus_persists_until_changed() {
        let mut rig = Rig::new();
        assert!(rig.frame(&[], |s| s.has_focus()));
        assert!(!rig.frame(&[PlatformEvent::FocusLost], |s| s.has_focus()));
        assert!(!rig.frame(&[], |s| s.has_focus()));
        assert!(rig.frame(&[PlatformEvent::FocusGained], |s| s.has_focus()));
    }

    #[test]
    fn frame_counter_advances() {
        let mut rig = Rig::new();
        rig.frame(&[], |_| ());
        rig.frame(&[], |_| ());
        assert_eq!(rig.sampler.frame(), 2);
    }
}
