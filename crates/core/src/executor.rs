use crate::metrics::Metrics;
use crate::prompts;
use async_trait::async_trait;
use goalforge_providers::{CompletionProvider, CompletionRequest, ProviderError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(#[from] ProviderError),
    #[error("Task execution failed: {0}")]
    Failed(String),
}

/// Works a single task and reports its textual result.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    async fn execute(
        &self,
        goal: &str,
        task: &str,
        api_key: Option<&str>,
    ) -> Result<String, ExecutorError>;
}

/// Executes a task by asking the model to carry it out.
pub struct ModelTaskExecutor {
    provider: Arc<dyn CompletionProvider>,
    metrics: Arc<Metrics>,
}

impl ModelTaskExecutor {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            metrics: Metrics::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }
}

#[async_trait]
impl TaskExecutor for ModelTaskExecutor {
    async fn execute(
        &self,
        goal: &str,
        task: &str,
        api_key: Option<&str>,
    ) -> Result<String, ExecutorError> {
        let request = CompletionRequest::new(prompts::execute_task(goal, task))
            .with_api_key(api_key.map(str::to_string));

        self.metrics.inc_completion_requests();
        let result = self.provider.complete(&request).await.map_err(|e| {
            self.metrics.inc_completion_failures();
            warn!(task = %task, error = %e, "task execution call failed");
            ExecutorError::from(e)
        })?;

        info!(task = %task, "task executed");
        Ok(result.trim().to_string())
    }
}
