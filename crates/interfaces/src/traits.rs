use crate::view::ViewState;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use goalforge_core::Message;

/// Line-oriented operator channel used by the interactive driver.
#[async_trait]
pub trait Interface: Send + Sync {
    async fn receive_input(&self) -> Option<String>;
    async fn send_output(&self, message: &str);
    async fn show_status(&self, status: &str);
}

/// Turns a message log into display output. Implementations re-render from
/// the snapshot they are given and keep no state of their own.
pub trait Renderer {
    fn render(&self, messages: &[Message], view: &ViewState) -> String;
}

/// A saved copy of the log.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
    pub generated_at: DateTime<Utc>,
}

pub trait Exporter {
    fn export(&self, messages: &[Message]) -> Artifact;
}
