//! Not-ready/ready latch with queued continuations.
//!
//! Continuations registered before the latch opens are queued and handed back
//! exactly once by [`ReadyLatch::open`]. Continuations registered after it is
//! open are handed straight back so the owner runs them immediately.

/// A queued continuation receiving the latch owner
pub type ReadyCallback<T> = Box<dyn FnOnce(&mut T)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatchState {
    NotReady,
    Ready,
}

pub struct ReadyLatch<T> {
    state: LatchState,
    pending: Vec<ReadyCallback<T>>,
}

impl<T> ReadyLatch<T> {
    pub fn new() -> Self {
        Self {
            state: LatchState::NotReady,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> LatchState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == LatchState::Ready
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queues `callback`, or returns it when the latch is already open
    pub fn register(&mut self, callback: ReadyCallback<T>) -> Option<ReadyCallback<T>> {
        match self.state {
            LatchState::Ready => Some(callback),
            LatchState::NotReady => {
                self.pending.push(callback);
                None
            }
        }
    }

    /// Opens the latch and drains the queue. A second call returns nothing.
    pub fn open(&mut self) -> Vec<ReadyCallback<T>> {
        self.state = LatchState::Ready;
        std::mem::take(&mut self.pending)
    }

    /// Back to not-ready; queued continuations are dropped unrun
    pub fn reset(&mut self) {
        self.state = LatchState::NotReady;
        self.pending.clear();
    }
}

impl<T> Default for ReadyLatch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ReadyLatch<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadyLatch")
            .field("state", &self.state)
            .field("pending", &self.pending.len())
            .finish()
    }
}
