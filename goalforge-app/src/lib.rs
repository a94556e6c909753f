//! GoalForge application: configuration, HTTP surface and CLI commands.

pub mod commands;
pub mod config;
pub mod http;
pub mod logging;

use goalforge_core::{Metrics, ModelTaskExecutor, TaskExecutor, TaskOrchestrator};
use goalforge_providers::{CompletionProvider, OpenAICompatibleProvider};
use std::sync::Arc;

use crate::config::Config;

/// Orchestrator and executor sharing one provider and one metrics registry.
pub fn build_agent(
    provider: Arc<dyn CompletionProvider>,
    temperature: f32,
) -> (TaskOrchestrator, Arc<dyn TaskExecutor>) {
    let metrics = Metrics::new();
    let orchestrator = TaskOrchestrator::new(Arc::clone(&provider))
        .with_metrics(Arc::clone(&metrics))
        .with_temperature(temperature);
    let executor: Arc<dyn TaskExecutor> =
        Arc::new(ModelTaskExecutor::new(provider).with_metrics(metrics));
    (orchestrator, executor)
}

pub fn provider_from_config(config: &Config) -> Arc<dyn CompletionProvider> {
    Arc::new(OpenAICompatibleProvider::new(
        config.provider.base_url.clone(),
        config.provider.api_key(),
        config.provider.model.clone(),
    ))
}
