//! Generation-counted slot for one asynchronous loader.
//!
//! Every request captures a [`RequestToken`] when it is issued. Only the
//! response carrying the latest token may settle the slot; anything older is
//! rejected, whatever order the responses come back in.

use tokio::task::AbortHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

#[derive(Debug)]
pub struct Loader<T> {
    generation: u64,
    pending: bool,
    in_flight: Option<AbortHandle>,
    current: Option<T>,
}

impl<T> Default for Loader<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            pending: false,
            in_flight: None,
            current: None,
        }
    }
}

impl<T> Loader<T> {
    /// Start a new request, superseding any outstanding one. The previous
    /// value stays readable until the new request settles.
    pub fn issue(&mut self, abort_previous: bool) -> RequestToken {
        if let Some(previous) = self.in_flight.take() {
            if abort_previous {
                previous.abort();
            }
        }
        self.generation += 1;
        self.pending = true;
        RequestToken(self.generation)
    }

    /// Remember the task serving the latest token so it can be aborted later.
    pub fn track(&mut self, handle: AbortHandle) {
        self.in_flight = Some(handle);
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.generation
    }

    /// Commit a response. `None` clears the slot. Returns false for a
    /// superseded token, leaving the slot untouched.
    pub fn settle(&mut self, token: RequestToken, value: Option<T>) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.pending = false;
        self.in_flight = None;
        self.current = value;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.pending
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }
}
