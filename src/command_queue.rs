use crossbeam::channel::{self, Receiver, Sender};
use std::time::Duration;

/// FIFO hand-off buffer between the line source and the command workers.
///
/// Cloning yields another handle to the same buffer, so any number of
/// producers and consumers can share it. Lines come out in push order and
/// each line is delivered to exactly one consumer.
#[derive(Debug, Clone)]
pub struct CommandQueue {
    sender: Sender<String>,
    receiver: Receiver<String>,
}

impl CommandQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        let (sender, receiver) = channel::unbounded();
        Self { sender, receiver }
    }

    /// Append a line at the tail
    pub fn push(&self, line: String) {
        // Cannot fail: every handle owns a receiver for the same channel
        let _ = self.sender.send(line);
    }

    /// Remove the head line, waiting at most `timeout` for one to arrive.
    ///
    /// `None` means the queue stayed empty for the whole wait. That is the
    /// signal workers use to recheck the lifecycle flag, not an error.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<String> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Number of lines currently buffered
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
