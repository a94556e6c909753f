//! Task creation: one model call per round, parsed into new tasks.

use crate::metrics::Metrics;
use crate::parser::parse_completion;
use crate::prompts;
use goalforge_providers::{ChatMessage, CompletionProvider, CompletionRequest, ProviderError};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(#[from] ProviderError),
}

/// Everything a round needs to know about the session so far. On the first
/// round `existing_tasks` is empty and `last_task`/`last_result` are "".
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundContext<'a> {
    pub goal: &'a str,
    pub existing_tasks: &'a [String],
    pub last_task: &'a str,
    pub last_result: &'a str,
    pub api_key: Option<&'a str>,
}

impl<'a> RoundContext<'a> {
    pub fn first(goal: &'a str) -> Self {
        Self {
            goal,
            ..Self::default()
        }
    }

    fn is_first_round(&self) -> bool {
        self.existing_tasks.is_empty() && self.last_task.is_empty() && self.last_result.is_empty()
    }
}

/// Stateless request/response step. Holds no session state; failures are
/// surfaced to the caller without retrying.
#[derive(Clone)]
pub struct TaskOrchestrator {
    provider: Arc<dyn CompletionProvider>,
    metrics: Arc<Metrics>,
    temperature: Option<f32>,
}

impl TaskOrchestrator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            metrics: Metrics::new(),
            temperature: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    pub async fn start_goal(
        &self,
        goal: &str,
        api_key: Option<&str>,
    ) -> Result<Vec<String>, OrchestratorError> {
        self.create_tasks(&RoundContext {
            api_key,
            ..RoundContext::first(goal)
        })
        .await
    }

    /// Propose the next tasks for `context.goal`. An empty result means the
    /// current line of work needs no further subtasks.
    pub async fn create_tasks(
        &self,
        context: &RoundContext<'_>,
    ) -> Result<Vec<String>, OrchestratorError> {
        let messages = if context.is_first_round() {
            prompts::start_goal(context.goal)
        } else {
            prompts::create_tasks(
                context.goal,
                context.existing_tasks,
                context.last_task,
                context.last_result,
            )
        };

        let completion = self.complete(messages, context.api_key).await?;
        let parsed = parse_completion(&completion);
        if parsed.is_empty() && !completion.trim().is_empty() {
            debug!(completion = %completion, "completion contained no recognisable tasks");
        }

        let tasks = dedup_against(parsed, context.existing_tasks);
        self.metrics.add_tasks_created(tasks.len());
        info!(goal = %context.goal, created = tasks.len(), "task creation round finished");
        Ok(tasks)
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        api_key: Option<&str>,
    ) -> Result<String, OrchestratorError> {
        let mut request =
            CompletionRequest::new(messages).with_api_key(api_key.map(str::to_string));
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        self.metrics.inc_completion_requests();
        match self.provider.complete(&request).await {
            Ok(text) => Ok(text),
            Err(e) => {
                self.metrics.inc_completion_failures();
                warn!(provider = self.provider.name(), error = %e, "task creation call failed");
                Err(e.into())
            }
        }
    }
}

/// Drop tasks already queued (exact match) and repeats within the batch.
fn dedup_against(tasks: Vec<String>, existing: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = existing.iter().map(String::as_str).collect();
    let mut kept = Vec::with_capacity(tasks.len());
    for task in &tasks {
        if seen.insert(task.as_str()) {
            kept.push(task.clone());
        }
    }
    kept
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned completions in order and records every request.
    pub(crate) struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<String, ProviderError>>>,
        pub(crate) requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        pub(crate) fn new(replies: Vec<Result<String, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn ok(replies: &[&str]) -> Arc<Self> {
            Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::Http("script exhausted".to_string())))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_first_round_uses_start_prompt() {
        let provider = ScriptedProvider::ok(&[r#"["Pick a venue", "Create guest list"]"#]);
        let orchestrator = TaskOrchestrator::new(provider.clone());

        let tasks = orchestrator
            .start_goal("Plan a birthday party", None)
            .await
            .unwrap();
        assert_eq!(tasks, vec!["Pick a venue", "Create guest list"]);

        let requests = provider.requests.lock().unwrap();
        assert!(requests[0].messages[0].content.contains("task creation AI"));
        assert!(!requests[0].messages[1].content.contains("just executed"));
    }

    #[tokio::test]
    async fn test_dedup_against_existing_tasks() {
        let provider = ScriptedProvider::ok(&["1. Buy milk\n2. Walk dog"]);
        let orchestrator = TaskOrchestrator::new(provider);
        let existing = vec!["Buy milk".to_string()];

        let tasks = orchestrator
            .create_tasks(&RoundContext {
                goal: "Chores",
                existing_tasks: &existing,
                last_task: "Do laundry",
                last_result: "Done",
                api_key: None,
            })
            .await
            .unwrap();
        assert_eq!(tasks, vec!["Walk dog"]);
    }

    #[tokio::test]
    async fn test_repeats_within_batch_are_dropped() {
        let provider = ScriptedProvider::ok(&[r#"["Walk dog", "Walk dog", "Feed cat"]"#]);
        let orchestrator = TaskOrchestrator::new(provider);
        let tasks = orchestrator.start_goal("Pets", None).await.unwrap();
        assert_eq!(tasks, vec!["Walk dog", "Feed cat"]);
    }

    #[tokio::test]
    async fn test_malformed_completion_yields_no_tasks() {
        let provider = ScriptedProvider::ok(&["I cannot think of any tasks."]);
        let orchestrator = TaskOrchestrator::new(provider);
        let tasks = orchestrator.start_goal("Anything", None).await.unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_is_model_unavailable() {
        let provider = ScriptedProvider::new(vec![Err(ProviderError::Http(
            "connection refused".to_string(),
        ))]);
        let orchestrator = TaskOrchestrator::new(provider.clone());

        let result = orchestrator.start_goal("Anything", None).await;
        assert!(matches!(result, Err(OrchestratorError::ModelUnavailable(_))));
        // No retry.
        assert_eq!(provider.requests.lock().unwrap().len(), 1);

        let snapshot = orchestrator.metrics().snapshot();
        assert_eq!(snapshot.completion_requests, 1);
        assert_eq!(snapshot.completion_failures, 1);
    }

    #[tokio::test]
    async fn test_api_key_and_temperature_are_passed_through() {
        let provider = ScriptedProvider::ok(&["[]"]);
        let orchestrator = TaskOrchestrator::new(provider.clone()).with_temperature(0.5);

        orchestrator
            .start_goal("Anything", Some("sk-caller"))
            .await
            .unwrap();

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].api_key.as_deref(), Some("sk-caller"));
        assert_eq!(requests[0].temperature, Some(0.5));
    }
}
