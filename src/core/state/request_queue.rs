//=========================================================================
// Request Queue
//=========================================================================
//
// Deferred structural changes to the state stack.
//
// States queue requests here while the stack is executing them. The
// stack applies the queue at its drain point, once per tick, in FIFO
// order. Once teardown begins the queue is closed and further requests
// are dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{State, StateId};

//=== StateSlot ===========================================================

/// A state paired with its creation-order id.
pub struct StateSlot {
    pub(super) id: StateId,
    pub(super) state: Box<dyn State>,
}

impl StateSlot {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn state(&self) -> &dyn State {
        self.state.as_ref()
    }
}

impl fmt::Debug for StateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSlot")
            .field("id", &self.id)
            .field("name", &self.state.name())
            .finish()
    }
}

//=== StackRequest ========================================================

/// One deferred stack operation.
#[derive(Debug)]
pub enum StackRequest {
    /// Pauses the current top, then places the state above it.
    Push(StateSlot),

    /// Removes up to `n` states from the top, never the last one.
    Pop(usize),

    /// Replaces the top state in one step.
    Swap(StateSlot),
}

//=== RequestQueue ========================================================

/// FIFO of pending stack requests.
pub struct RequestQueue {
    queue: Vec<StackRequest>,
    next_id: u64,
    closed: bool,
}

impl RequestQueue {
    /// Creates a new empty, open queue.
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            next_id: 0,
            closed: false,
        }
    }

    //--- Requests ---------------------------------------------------------

    /// Queues a push and returns the id assigned to `state`.
    pub fn push(&mut self, state: Box<dyn State>) -> StateId {
        let slot = self.make_slot(state);
        let id = slot.id;
        self.enqueue(StackRequest::Push(slot));
        id
    }

    /// Queues a pop of `count` states.
    pub fn pop(&mut self, count: usize) {
        self.enqueue(StackRequest::Pop(count));
    }

    /// Queues a swap and returns the id assigned to `state`.
    pub fn swap(&mut self, state: Box<dyn State>) -> StateId {
        let slot = self.make_slot(state);
        let id = slot.id;
        self.enqueue(StackRequest::Swap(slot));
        id
    }

    //--- Queue Access -----------------------------------------------------

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued requests.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all requests from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<StackRequest> {
        std::mem::take(&mut self.queue)
    }

    //--- Teardown ---------------------------------------------------------

    /// Stops accepting requests and drops anything still queued.
    pub fn close(&mut self) {
        if !self.queue.is_empty() {
            debug!(
                target: "kernel::stack",
                "Discarding {} pending requests at teardown",
                self.queue.len()
            );
        }
        self.queue.clear();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    //--- Internal Helpers -------------------------------------------------

    fn make_slot(&mut self, state: Box<dyn State>) -> StateSlot {
        let id = StateId(self.next_id);
        self.next_id += 1;
        StateSlot { id, state }
    }

    fn enqueue(&mut self, request: StackRequest) {
        if self.closed {
            debug!(target: "kernel::stack", "Ignoring {:?} after teardown began", request);
            return;
        }
        self.queue.push(request);
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
