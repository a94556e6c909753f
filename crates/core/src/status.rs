//! Pure classification over messages. Nothing here mutates a message.

use crate::types::{Message, TaskStatus};

/// Lifecycle status of `message`, or `None` when it is not a task.
pub fn classify(message: &Message) -> Option<TaskStatus> {
    message.status()
}

/// Whether `message` carries a non-empty rich-text payload, in which case
/// renderers show `info` rather than `value` as the primary content.
pub fn is_action(message: &Message) -> bool {
    message.info().is_some_and(|info| !info.trim().is_empty())
}

/// Transitions only move forward; staying in place is not a transition.
pub fn can_transition(from: TaskStatus, to: TaskStatus) -> bool {
    to > from
}
