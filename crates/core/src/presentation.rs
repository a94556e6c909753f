//! Display classification for messages.
//!
//! [`present`] is a total function over (type, status): every message maps to
//! exactly one directive, and renderers never inspect status themselves.

use crate::status::{classify, is_action};
use crate::types::{Message, MessageType, TaskStatus};
use serde::Serialize;

pub const THINKING_HINT: &str = "(Redeploy if this takes more than 30 seconds)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Star,
    Spinner,
    ListItem,
    Check,
    None,
}

/// Primary body of a rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum Content {
    Text(String),
    Markdown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayDirective {
    pub visible: bool,
    pub icon: Icon,
    pub prefix: String,
    pub content: Content,
    /// Secondary note shown after the prefix.
    pub hint: Option<&'static str>,
    /// Link to troubleshooting help, set on shutdown notices.
    pub show_help_link: bool,
}

pub fn present(message: &Message) -> DisplayDirective {
    let status = classify(message);

    let visible = status != Some(TaskStatus::Executing);

    let icon = match (message.kind(), status) {
        (MessageType::Goal, _) => Icon::Star,
        (MessageType::Thinking, _) => Icon::Spinner,
        (MessageType::System, _) => Icon::None,
        (MessageType::Task, Some(TaskStatus::Started)) => Icon::ListItem,
        (MessageType::Task, Some(TaskStatus::Executing)) => Icon::Spinner,
        (MessageType::Task, Some(TaskStatus::Completed | TaskStatus::Final)) => Icon::Check,
        (MessageType::Task, None) => Icon::None,
    };

    let prefix = match (message.kind(), status) {
        (MessageType::Goal, _) => "Embarking on a new goal:".to_string(),
        (MessageType::Thinking, _) => "Thinking...".to_string(),
        (_, Some(TaskStatus::Started)) => "Added task:".to_string(),
        (_, Some(TaskStatus::Completed)) => format!("Completing: {}", message.value()),
        (_, Some(TaskStatus::Final)) => "No more subtasks for:".to_string(),
        _ => String::new(),
    };

    let content = match message.info() {
        Some(info) if is_action(message) => Content::Markdown(info.to_string()),
        _ => Content::Text(message.value().to_string()),
    };

    let hint = (message.kind() == MessageType::Thinking).then_some(THINKING_HINT);

    let show_help_link = message.kind() == MessageType::System
        && message.value().to_lowercase().contains("shut");

    DisplayDirective {
        visible,
        icon,
        prefix,
        content,
        hint,
        show_help_link,
    }
}

/// The rendered sequence: visible messages paired with their directives, in
/// log order.
pub fn visible_log(messages: &[Message]) -> Vec<(&Message, DisplayDirective)> {
    messages
        .iter()
        .map(|message| (message, present(message)))
        .filter(|(_, directive)| directive.visible)
        .collect()
}

/// Notices shown in place of an empty log.
pub fn placeholder_messages() -> Vec<Message> {
    vec![
        Message::system("👉 Create an agent by adding a name / goal, and hitting deploy!"),
        Message::system("📢 You can provide your own OpenAI API key for a higher rate limit."),
    ]
}
