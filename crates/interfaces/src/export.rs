//! Save/copy capabilities over a message log.

use crate::traits::{Artifact, Exporter};
use chrono::Utc;
use goalforge_core::presentation::visible_log;
use goalforge_core::{Content, Message};

/// Plain text, one entry per visible message, as a clipboard copy would see it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export(&self, messages: &[Message]) -> Artifact {
        let entries: Vec<String> = visible_log(messages)
            .into_iter()
            .map(|(_, directive)| {
                let body = match directive.content {
                    Content::Text(text) | Content::Markdown(text) => text,
                };
                [directive.prefix, body]
                    .into_iter()
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        Artifact {
            file_name: "goalforge-output.txt".to_string(),
            mime_type: "text/plain",
            content: entries.join("\n"),
            generated_at: Utc::now(),
        }
    }
}

/// Markdown document. Plain entries become bullets, executed results keep
/// their own markdown under a heading.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn export(&self, messages: &[Message]) -> Artifact {
        let generated_at = Utc::now();
        let mut out = String::from("# GoalForge run\n");
        out.push_str(&format!(
            "\n_Exported {}_\n",
            generated_at.format("%Y-%m-%d %H:%M UTC")
        ));

        for (_, directive) in visible_log(messages) {
            out.push('\n');
            match directive.content {
                Content::Markdown(markdown) => {
                    out.push_str(&format!("### {}\n\n{}\n", directive.prefix, markdown));
                }
                Content::Text(text) if directive.prefix.is_empty() => {
                    out.push_str(&format!("> {}\n", text));
                }
                Content::Text(text) => {
                    out.push_str(&format!("- **{}** {}\n", directive.prefix, text));
                }
            }
        }

        Artifact {
            file_name: "goalforge-output.md".to_string(),
            mime_type: "text/markdown",
            content: out,
            generated_at,
        }
    }
}
