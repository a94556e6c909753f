use crate::types::Message;
use std::collections::VecDeque;

/// Pending tasks of one session, in execution order. Entries are the
/// `Started` messages that introduced each task.
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    pending: VecDeque<Message>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task at the tail and return its `Started` message.
    pub fn push_task(&mut self, description: impl Into<String>) -> Message {
        let message = Message::task(description);
        self.pending.push_back(message.clone());
        message
    }

    pub fn front(&self) -> Option<&Message> {
        self.pending.front()
    }

    pub fn pop_front(&mut self) -> Option<Message> {
        self.pending.pop_front()
    }

    /// Descriptions in queue order. Readers render from this copy.
    pub fn snapshot(&self) -> Vec<String> {
        self.pending.iter().map(|m| m.value().to_string()).collect()
    }

    /// Descriptions after the head, i.e. what remains once the head is taken.
    pub fn remaining_after_front(&self) -> Vec<String> {
        self.pending
            .iter()
            .skip(1)
            .map(|m| m.value().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
