use crate::traits::{Interface, Renderer};
use crate::view::ViewState;
use async_trait::async_trait;
use goalforge_core::presentation::{placeholder_messages, present};
use goalforge_core::{Content, Icon, Message};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

const HELP_LINE: &str = "If you are facing any issues, please check the troubleshooting FAQ.";

pub struct TerminalInterface;

impl TerminalInterface {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalInterface {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Interface for TerminalInterface {
    async fn receive_input(&self) -> Option<String> {
        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut line = String::new();

        match reader.read_line(&mut line).await {
            Ok(0) => None, // EOF
            Ok(_) => Some(line.trim().to_string()),
            Err(_) => None,
        }
    }

    async fn send_output(&self, message: &str) {
        let mut stdout = tokio::io::stdout();
        let _ = stdout.write_all(message.as_bytes()).await;
        let _ = stdout.write_all(b"\n").await;
        let _ = stdout.flush().await;
    }

    async fn show_status(&self, status: &str) {
        self.send_output(&format!("ℹ️  {}", status)).await;
    }
}

fn icon_glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::Star => "⭐",
        Icon::Spinner => "⏳",
        Icon::ListItem => "📝",
        Icon::Check => "✅",
        Icon::None => "",
    }
}

/// Plain-text renderer for terminals.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render one message, or `None` when it is hidden from the log.
    pub fn render_message(&self, message: &Message) -> Option<String> {
        let directive = present(message);
        if !directive.visible {
            return None;
        }

        let mut head: Vec<&str> = Vec::new();
        let glyph = icon_glyph(directive.icon);
        if !glyph.is_empty() {
            head.push(glyph);
        }
        if !directive.prefix.is_empty() {
            head.push(&directive.prefix);
        }
        if let Some(hint) = directive.hint {
            head.push(hint);
        }

        let mut out = head.join(" ");
        match &directive.content {
            Content::Text(text) if !text.is_empty() => {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(text);
            }
            Content::Text(_) => {}
            Content::Markdown(markdown) => {
                out.push_str("\n  ---");
                for line in markdown.lines() {
                    out.push_str("\n  ");
                    out.push_str(line);
                }
            }
        }

        if directive.show_help_link {
            out.push('\n');
            out.push_str(HELP_LINE);
        }
        Some(out)
    }
}

impl Renderer for TerminalRenderer {
    fn render(&self, messages: &[Message], view: &ViewState) -> String {
        let mut lines = Vec::new();
        if let Some(title) = &view.title {
            lines.push(format!("== {} ==", title));
        }

        if messages.is_empty() {
            lines.extend(
                placeholder_messages()
                    .iter()
                    .filter_map(|m| self.render_message(m)),
            );
        } else {
            lines.extend(messages.iter().filter_map(|m| self.render_message(m)));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalforge_core::TaskStatus;

    #[test]
    fn test_started_task_line() {
        let renderer = TerminalRenderer::new();
        assert_eq!(
            renderer.render_message(&Message::task("Buy milk")).unwrap(),
            "📝 Added task: Buy milk"
        );
    }

    #[test]
    fn test_executing_is_not_rendered() {
        let renderer = TerminalRenderer::new();
        let executing = Message::task("x").advance(TaskStatus::Executing).unwrap();
        assert!(renderer.render_message(&executing).is_none());
    }

    #[test]
    fn test_completed_action_renders_markdown_block() {
        let renderer = TerminalRenderer::new();
        let completed = Message::task("Pick a venue")
            .advance(TaskStatus::Completed)
            .unwrap()
            .with_info("Booked **Hall A**\nDeposit paid");
        let out = renderer.render_message(&completed).unwrap();
        assert_eq!(
            out,
            "✅ Completing: Pick a venue\n  ---\n  Booked **Hall A**\n  Deposit paid"
        );
    }

    #[test]
    fn test_thinking_line_has_hint() {
        let renderer = TerminalRenderer::new();
        let out = renderer.render_message(&Message::thinking("")).unwrap();
        assert!(out.starts_with("⏳ Thinking..."));
        assert!(out.contains("Redeploy"));
    }

    #[test]
    fn test_shutdown_notice_has_help_line() {
        let renderer = TerminalRenderer::new();
        let out = renderer
            .render_message(&Message::system("Shutting down."))
            .unwrap();
        assert_eq!(out, format!("Shutting down.\n{}", HELP_LINE));
    }

    #[test]
    fn test_empty_log_renders_placeholders() {
        let renderer = TerminalRenderer::new();
        let out = renderer.render(&[], &ViewState::titled("Agent"));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "== Agent ==");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = TerminalRenderer::new();
        let log = vec![Message::goal("g"), Message::task("a")];
        let view = ViewState::default();
        assert_eq!(renderer.render(&log, &view), renderer.render(&log, &view));
    }
}
