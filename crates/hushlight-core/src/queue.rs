//! Multi-producer, single-consumer FIFO of display commands.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::sequence::DisplayCommand;

/// Unbounded, internally synchronized command queue.
///
/// Any thread may push; the scheduler loop is the only consumer. Sequences
/// pushed through [`CommandQueue::extend`] land contiguously.
#[derive(Debug, Default)]
pub struct CommandQueue {
    entries: Mutex<VecDeque<DisplayCommand>>,
}

impl CommandQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single command.
    pub fn push(&self, command: DisplayCommand) {
        self.entries.lock().push_back(command);
    }

    /// Append a whole sequence without interleaving other producers.
    pub fn extend(&self, commands: impl IntoIterator<Item = DisplayCommand>) {
        self.entries.lock().extend(commands);
    }

    /// Remove the oldest command.
    pub fn pop(&self) -> Option<DisplayCommand> {
        self.entries.lock().pop_front()
    }

    /// Number of pending commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Copy of the pending commands, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DisplayCommand> {
        self.entries.lock().iter().copied().collect()
    }
}
