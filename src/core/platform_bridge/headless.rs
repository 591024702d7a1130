//=========================================================================
// Headless Platform
//=========================================================================
//
// Window-less platform fed through a channel.
//
// Used by tests, replays and server-side runs. Events are pushed through
// the returned `Sender`; held state is rebuilt by a `SnapshotTracker`,
// joystick axes are set directly since they are polled, not evented.
//
// Dropping every sender reads as a close request.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Sender};
use log::info;

//=== Internal Dependencies ===============================================

use super::{EventCollector, Platform, PlatformEvent, SnapshotTracker, TickControl};
use crate::core::input::{DeviceSnapshot, JoystickAxis, JoystickId};

//=== HeadlessPlatform ====================================================

/// Channel-driven [`Platform`] without a window.
pub struct HeadlessPlatform {
    collector: EventCollector,
    tracker: SnapshotTracker,
    window_size: (u32, u32),
    source_closed: bool,
}

impl HeadlessPlatform {
    /// Creates the platform and the sender that feeds it.
    pub fn new(width: u32, height: u32) -> (Self, Sender<PlatformEvent>) {
        let (tx, rx) = unbounded();
        let platform = Self {
            collector: EventCollector::new(rx),
            tracker: SnapshotTracker::new(),
            window_size: (width, height),
            source_closed: false,
        };
        (platform, tx)
    }

    /// Sets a polled joystick axis (raw units, clamped to the axis range).
    ///
    /// Has no visible effect until the joystick is connected.
    pub fn set_joystick_axis(&mut self, joystick: JoystickId, axis: JoystickAxis, value: f32) {
        if let Some(js) = self.tracker.snapshot_mut().joystick_mut(joystick) {
            js.set_axis(axis, value);
        }
    }
}

impl Platform for HeadlessPlatform {
    fn poll_frame_events(&mut self, events: &mut Vec<PlatformEvent>) {
        let first_new = events.len();
        let control = self.collector.collect_frame(events);

        self.tracker.apply_all(&events[first_new..]);
        for event in &events[first_new..] {
            if let PlatformEvent::Resized { width, height } = *event {
                self.window_size = (width, height);
            }
        }

        if control == TickControl::Exit && !self.source_closed {
            info!(target: "platform", "Headless event source closed");
            self.source_closed = true;
            events.push(PlatformEvent::CloseRequested);
        }
    }

    fn read_device_state(&mut self, snapshot: &mut DeviceSnapshot) {
        snapshot.copy_from(self.tracker.snapshot());
    }

    fn window_size(&self) -> (u32, u32) {
        self.window_size
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;

    #[test]
    fn events_reach_poll_and_snapshot() {
        let (mut platform, tx) = HeadlessPlatform::new(640, 480);
        tx.send(PlatformEvent::KeyPressed { key: KeyCode::Space, repeat: false }).unwrap();

        let mut events = Vec::new();
        platform.poll_frame_events(&mut events);
        let mut snapshot = DeviceSnapshot::new();
        platform.read_device_state(&mut snapshot);

        assert_eq!(events.len(), 1);
        assert!(snapshot.key(KeyCode::Space));
    }

    #[test]
    fn resize_updates_window_size() {
        let (mut platform, tx) = HeadlessPlatform::new(640, 480);
        tx.send(PlatformEvent::Resized { width: 800, height: 600 }).unwrap();

        platform.poll_frame_events(&mut Vec::new());

        assert_eq!(platform.window_size(), (800, 600));
    }

    #[test]
    fn dropping_sender_requests_close_once() {
        let (mut platform, tx) = HeadlessPlatform::new(1, 1);
        drop(tx);

        let mut events = Vec::new();
        platform.poll_frame_events(&mut events);
        assert_eq!(events, vec![PlatformEvent::CloseRequested]);

        events.clear();
        platform.poll_frame_events(&mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn joystick_axis_is_polled_state() {
        let (mut platform, tx) = HeadlessPlatform::new(1, 1);
        tx.send(PlatformEvent::JoystickConnected(0)).unwrap();
        platform.poll_frame_events(&mut Vec::new());

        platform.set_joystick_axis(0, JoystickAxis::LeftY, -40.0);

        let mut snapshot = DeviceSnapshot::new();
        platform.read_device_state(&mut snapshot);
        assert_eq!(snapshot.joystick_axis(0, JoystickAxis::LeftY), -40.0);
    }
}
