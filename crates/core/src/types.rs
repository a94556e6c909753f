//! Message model shared by the session, the presentation adapter and renderers.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of agent output a message represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Goal,
    Thinking,
    Task,
    System,
}

/// Lifecycle of a task message. Variants are declared in lifecycle order so
/// the derived `Ord` is the transition order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Started,
    Executing,
    Completed,
    Final,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskStatus::Started => "started",
            TaskStatus::Executing => "executing",
            TaskStatus::Completed => "completed",
            TaskStatus::Final => "final",
        };
        f.write_str(name)
    }
}

/// Contract violations on the message model. These indicate a programming
/// error in the caller and are never repaired.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("{0:?} message cannot carry a task status")]
    StatusOnNonTask(MessageType),
    #[error("task message requires a status")]
    MissingTaskStatus,
    #[error("illegal task transition {from} -> {to}")]
    BackwardTransition { from: TaskStatus, to: TaskStatus },
}

/// One unit of agent-visible activity.
///
/// Messages are immutable once built: a status change produces a new message
/// through [`Message::advance`], which keeps the message log append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMessage", rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "type")]
    kind: MessageType,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    kind: MessageType,
    value: String,
    #[serde(default)]
    info: Option<String>,
    #[serde(default)]
    status: Option<TaskStatus>,
}

impl TryFrom<RawMessage> for Message {
    type Error = InvariantViolation;

    fn try_from(raw: RawMessage) -> Result<Self, Self::Error> {
        Message::new(raw.kind, raw.value, raw.status, raw.info)
    }
}

impl Message {
    /// Build a message, checking that `status` is present iff `kind` is `Task`.
    pub fn new(
        kind: MessageType,
        value: impl Into<String>,
        status: Option<TaskStatus>,
        info: Option<String>,
    ) -> Result<Self, InvariantViolation> {
        match (kind, status) {
            (MessageType::Task, None) => return Err(InvariantViolation::MissingTaskStatus),
            (MessageType::Task, Some(_)) | (_, None) => {}
            (other, Some(_)) => return Err(InvariantViolation::StatusOnNonTask(other)),
        }

        Ok(Self {
            kind,
            value: value.into(),
            info,
            status,
        })
    }

    pub fn goal(value: impl Into<String>) -> Self {
        Self::untracked(MessageType::Goal, value)
    }

    pub fn thinking(value: impl Into<String>) -> Self {
        Self::untracked(MessageType::Thinking, value)
    }

    pub fn system(value: impl Into<String>) -> Self {
        Self::untracked(MessageType::System, value)
    }

    /// A freshly created task, in `Started`.
    pub fn task(value: impl Into<String>) -> Self {
        Self {
            kind: MessageType::Task,
            value: value.into(),
            info: None,
            status: Some(TaskStatus::Started),
        }
    }

    fn untracked(kind: MessageType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            info: None,
            status: None,
        }
    }

    /// Attach the rich-text payload. Only meant for use while building.
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Produce the next lifecycle message for this task. The receiver is
    /// left untouched; `info` is not carried over.
    pub fn advance(&self, next: TaskStatus) -> Result<Message, InvariantViolation> {
        let current = match self.status {
            Some(status) => status,
            None => return Err(InvariantViolation::StatusOnNonTask(self.kind)),
        };

        if !crate::status::can_transition(current, next) {
            return Err(InvariantViolation::BackwardTransition {
                from: current,
                to: next,
            });
        }

        Ok(Self {
            kind: MessageType::Task,
            value: self.value.clone(),
            info: None,
            status: Some(next),
        })
    }

    pub fn kind(&self) -> MessageType {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    pub fn status(&self) -> Option<TaskStatus> {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_kind() -> impl Strategy<Value = MessageType> {
        prop_oneof![
            Just(MessageType::Goal),
            Just(MessageType::Thinking),
            Just(MessageType::Task),
            Just(MessageType::System),
        ]
    }

    fn any_status() -> impl Strategy<Value = TaskStatus> {
        prop_oneof![
            Just(TaskStatus::Started),
            Just(TaskStatus::Executing),
            Just(TaskStatus::Completed),
            Just(TaskStatus::Final),
        ]
    }

    proptest! {
        #[test]
        fn status_present_iff_task(
            kind in any_kind(),
            status in prop::option::of(any_status()),
            value in ".*",
            info in prop::option::of(".*"),
        ) {
            match Message::new(kind, value, status, info) {
                Ok(msg) => prop_assert_eq!(msg.status().is_some(), msg.kind() == MessageType::Task),
                Err(_) => prop_assert_ne!(status.is_some(), kind == MessageType::Task),
            }
        }
    }

    #[test]
    fn test_typed_constructors() {
        assert_eq!(Message::goal("g").status(), None);
        assert_eq!(Message::thinking("t").status(), None);
        assert_eq!(Message::system("s").status(), None);
        assert_eq!(Message::task("x").status(), Some(TaskStatus::Started));
    }

    #[test]
    fn test_status_on_goal_is_rejected() {
        let result = Message::new(MessageType::Goal, "g", Some(TaskStatus::Started), None);
        assert_eq!(
            result,
            Err(InvariantViolation::StatusOnNonTask(MessageType::Goal))
        );
    }

    #[test]
    fn test_task_without_status_is_rejected() {
        let result = Message::new(MessageType::Task, "t", None, None);
        assert_eq!(result, Err(InvariantViolation::MissingTaskStatus));
    }

    #[test]
    fn test_advance_produces_new_message() {
        let started = Message::task("Buy milk");
        let executing = started.advance(TaskStatus::Executing).unwrap();

        assert_eq!(started.status(), Some(TaskStatus::Started));
        assert_eq!(executing.status(), Some(TaskStatus::Executing));
        assert_eq!(executing.value(), "Buy milk");
    }

    #[test]
    fn test_advance_drops_info() {
        let completed = Message::task("a")
            .advance(TaskStatus::Completed)
            .unwrap()
            .with_info("done");
        let last = completed.advance(TaskStatus::Final).unwrap();
        assert!(last.info().is_none());
    }

    #[test]
    fn test_backward_transition_is_rejected() {
        let completed = Message::task("a").advance(TaskStatus::Completed).unwrap();
        assert_eq!(
            completed.advance(TaskStatus::Started),
            Err(InvariantViolation::BackwardTransition {
                from: TaskStatus::Completed,
                to: TaskStatus::Started,
            })
        );
        assert!(completed.advance(TaskStatus::Completed).is_err());
    }

    #[test]
    fn test_restart_after_executing_is_rejected() {
        let executing = Message::task("a").advance(TaskStatus::Executing).unwrap();
        assert!(executing.advance(TaskStatus::Started).is_err());
    }

    #[test]
    fn test_advance_on_non_task_is_rejected() {
        let result = Message::system("hello").advance(TaskStatus::Executing);
        assert_eq!(
            result,
            Err(InvariantViolation::StatusOnNonTask(MessageType::System))
        );
    }

    #[test]
    fn test_wire_format() {
        let msg = Message::task("Walk dog")
            .advance(TaskStatus::Completed)
            .unwrap()
            .with_info("Walked **twice**");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "task");
        assert_eq!(json["value"], "Walk dog");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["info"], "Walked **twice**");

        let goal = serde_json::to_value(Message::goal("g")).unwrap();
        assert!(goal.get("status").is_none());
        assert!(goal.get("info").is_none());
    }

    #[test]
    fn test_deserialization_enforces_invariant() {
        let bad = r#"{"type": "goal", "value": "g", "status": "started"}"#;
        assert!(serde_json::from_str::<Message>(bad).is_err());

        let good = r#"{"type": "task", "value": "t", "status": "executing"}"#;
        let msg: Message = serde_json::from_str(good).unwrap();
        assert_eq!(msg.status(), Some(TaskStatus::Executing));
    }
}
