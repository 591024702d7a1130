//=========================================================================
// Event Collector
//=========================================================================
//
// Channel-side event collection with bounded draining and disconnect
// detection.
//
// Architecture:
//   Sender<PlatformEvent> ─► Receiver ─► collect_frame() ─► Vec<PlatformEvent>
//
// Bounded draining prevents one flooded frame from starving the tick.
// Whatever is left stays queued for the next frame, in order.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;

//=== TickControl =========================================================

/// Whether the event source is still alive after a collection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,

    /// Every sender was dropped; no further events will ever arrive.
    Exit,
}

//=== EventCollector ======================================================

/// Drains queued platform events once per frame.
pub struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    max_per_frame: usize,
}

impl EventCollector {
    /// Default per-frame drain cap.
    pub const MAX_EVENTS_PER_FRAME: usize = 512;

    pub fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self::with_limit(receiver, Self::MAX_EVENTS_PER_FRAME)
    }

    /// Creates a collector draining at most `max_per_frame` events per pass.
    pub fn with_limit(receiver: Receiver<PlatformEvent>, max_per_frame: usize) -> Self {
        Self {
            receiver,
            max_per_frame: max_per_frame.max(1),
        }
    }

    /// Appends pending events to `events`, up to the per-frame cap.
    pub fn collect_frame(&mut self, events: &mut Vec<PlatformEvent>) -> TickControl {
        let mut drained = 0;

        while drained < self.max_per_frame {
            match self.receiver.try_recv() {
                Ok(event) => {
                    events.push(event);
                    drained += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
            }
        }

        if drained >= self.max_per_frame {
            warn!(
                target: "platform::input",
                "Event queue backlog: drained {} events this frame, {} still queued",
                drained,
                self.receiver.len()
            );
        } else if drained > 0 {
            trace!(target: "platform::input", "Collected {} events", drained);
        }

        TickControl::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;
    use crossbeam_channel::unbounded;

    #[test]
    fn collect_handles_empty_queue() {
        let (_tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);
        let mut events = Vec::new();

        let result = collector.collect_frame(&mut events);

        assert_eq!(result, TickControl::Continue);
        assert!(events.is_empty());
    }

    #[test]
    fn collect_preserves_order() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::KeyPressed { key: KeyCode::KeyA, repeat: false }).unwrap();
        tx.send(PlatformEvent::CursorMoved { x: 10.0, y: 20.0 }).unwrap();
        tx.send(PlatformEvent::KeyReleased { key: KeyCode::KeyA }).unwrap();

        let mut events = Vec::new();
        assert_eq!(collector.collect_frame(&mut events), TickControl::Continue);

        assert_eq!(
            events,
            vec![
                PlatformEvent::KeyPressed { key: KeyCode::KeyA, repeat: false },
                PlatformEvent::CursorMoved { x: 10.0, y: 20.0 },
                PlatformEvent::KeyReleased { key: KeyCode::KeyA },
            ]
        );
    }

    #[test]
    fn collect_respects_cap_and_keeps_rest_for_next_frame() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::with_limit(rx, 2);

        for _ in 0..3 {
            tx.send(PlatformEvent::FocusGained).unwrap();
        }

        let mut events = Vec::new();
        collector.collect_frame(&mut events);
        assert_eq!(events.len(), 2);

        events.clear();
        collector.collect_frame(&mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn collect_returns_exit_on_disconnect() {
        let (tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        drop(tx);

        let mut events = Vec::new();
        assert_eq!(collector.collect_frame(&mut events), TickControl::Exit);
    }

    #[test]
    fn events_sent_before_disconnect_are_still_delivered() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::CloseRequested).unwrap();
        drop(tx);

        let mut events = Vec::new();
        let result = collector.collect_frame(&mut events);

        assert_eq!(events, vec![PlatformEvent::CloseRequested]);
        assert_eq!(result, TickControl::Exit);
    }
}
