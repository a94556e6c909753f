use anyhow::{Context, Result};
use goalforge_core::{AgentSession, Message};
use goalforge_interfaces::{
    Exporter, Interface, MarkdownExporter, TaskPanel, TerminalInterface, TerminalRenderer,
    TextExporter,
};
use std::path::Path;
use tracing::{info, warn};

use crate::config::Config;

/// Drive one goal to completion in the terminal.
pub async fn run(
    config: &Config,
    goal: Option<&str>,
    max_loops: Option<usize>,
    export: Option<&Path>,
) -> Result<()> {
    let provider = crate::provider_from_config(config);
    let (orchestrator, executor) = crate::build_agent(provider, config.provider.temperature);
    let metrics = orchestrator.metrics();

    let interface = TerminalInterface::new();
    let goal = match goal {
        Some(goal) => goal.to_string(),
        None => {
            interface.send_output("Enter a goal for the agent:").await;
            interface.receive_input().await.unwrap_or_default()
        }
    };

    let mut session = AgentSession::new(goal, orchestrator, executor)
        .context("Cannot start agent")?
        .with_max_loops(max_loops.unwrap_or(config.agent.max_loops));

    let renderer = TerminalRenderer::new();
    let mut shown = 0;

    while !session.is_finished() {
        tokio::select! {
            outcome = session.run_round() => {
                if let Err(err) = outcome {
                    print_new(&interface, &renderer, session.messages(), shown).await;
                    interface.show_status(&format!("Round failed: {}", err)).await;
                    warn!(error = %err, loops = session.loops(), "agent round failed");
                    return Err(err).context("Agent stopped after a failed round");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                session.stop();
            }
        }

        shown = print_new(&interface, &renderer, session.messages(), shown).await;
        if !session.is_finished() {
            interface
                .send_output(&TaskPanel.render(&session.pending_tasks()))
                .await;
        }
    }

    let snapshot = metrics.snapshot();
    info!(
        rounds = snapshot.rounds,
        tasks_completed = snapshot.tasks_completed,
        success_rate = snapshot.completion_success_rate(),
        state = ?session.state(),
        "agent finished"
    );

    if let Some(path) = export {
        write_export(path, session.messages())?;
        interface
            .show_status(&format!("Saved log to {}", path.display()))
            .await;
    }

    Ok(())
}

/// Print messages appended since `shown`; returns the new high-water mark.
async fn print_new(
    interface: &TerminalInterface,
    renderer: &TerminalRenderer,
    messages: &[Message],
    shown: usize,
) -> usize {
    for message in messages.iter().skip(shown) {
        if let Some(line) = renderer.render_message(message) {
            interface.send_output(&line).await;
        }
    }
    messages.len()
}

fn write_export(path: &Path, messages: &[Message]) -> Result<()> {
    let artifact = match path.extension().and_then(|ext| ext.to_str()) {
        Some("md") | Some("markdown") => MarkdownExporter.export(messages),
        _ => TextExporter.export(messages),
    };
    std::fs::write(path, artifact.content)
        .with_context(|| format!("Failed to write {}", path.display()))
}
